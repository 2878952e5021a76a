//! Derivative visualizer engine.
//!
//! Evaluates one of a few closed-form curves, their exact derivatives and the
//! secant line between `x` and `x + Δx`. Everything here is direct formula
//! evaluation over a fixed sampling range; the chart itself is drawn by the
//! caller.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest selectable point and left edge of the default plot.
pub const MIN_X: f64 = -3.0;

/// Highest selectable point and right edge of the default plot.
pub const MAX_X: f64 = 3.0;

/// Smallest allowed Δx.
pub const MIN_DELTA: f64 = 0.1;

/// Largest allowed Δx.
pub const MAX_DELTA: f64 = 2.0;

/// Default spacing between plotted samples.
pub const DEFAULT_STEP: f64 = 0.1;

/// Upper bound on the number of plotted samples.
pub const MAX_SAMPLES: usize = 10_000;

/// A curve the learner can pick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// f(x) = x²
    #[default]
    Quadratic,
    /// f(x) = x³
    Cubic,
    /// f(x) = sin(x)
    Sine,
}

impl CurveKind {
    /// Every selectable curve, in menu order.
    pub const ALL: [Self; 3] = [Self::Quadratic, Self::Cubic, Self::Sine];

    /// Resolves a menu name; unknown names fall back to the quadratic.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "cubic" => Self::Cubic,
            "sine" => Self::Sine,
            _ => Self::Quadratic,
        }
    }

    /// Menu name of the curve.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Quadratic => "quadratic",
            Self::Cubic => "cubic",
            Self::Sine => "sine",
        }
    }

    /// f(x)
    #[must_use]
    pub fn value(self, x: f64) -> f64 {
        match self {
            Self::Quadratic => x * x,
            Self::Cubic => x * x * x,
            Self::Sine => x.sin(),
        }
    }

    /// f'(x)
    #[must_use]
    pub fn derivative(self, x: f64) -> f64 {
        match self {
            Self::Quadratic => 2.0 * x,
            Self::Cubic => 3.0 * x * x,
            Self::Sine => x.cos(),
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quadratic => write!(f, "f(x) = x²"),
            Self::Cubic => write!(f, "f(x) = x³"),
            Self::Sine => write!(f, "f(x) = sin(x)"),
        }
    }
}

/// A chart point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// Inclusive sampling range for the curve plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRange {
    /// First x value.
    pub start: f64,
    /// Last x value (inclusive, up to rounding).
    pub end: f64,
    /// Spacing between samples.
    pub step: f64,
}

impl Default for SampleRange {
    fn default() -> Self {
        Self {
            start: MIN_X,
            end: MAX_X,
            step: DEFAULT_STEP,
        }
    }
}

impl SampleRange {
    /// Number of samples in the range; zero for an empty or degenerate range.
    ///
    /// Never more than [`MAX_SAMPLES`].
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn len(&self) -> usize {
        let bounds_nan = self.start.is_nan() || self.end.is_nan();
        if bounds_nan || self.step.is_nan() || self.step <= 0.0 || self.end < self.start {
            return 0;
        }
        // Slack absorbs the representation error of steps like 0.1.
        let intervals = ((self.end - self.start) / self.step + 1e-9).floor();
        if !intervals.is_finite() || intervals >= (MAX_SAMPLES - 1) as f64 {
            return MAX_SAMPLES;
        }
        intervals as usize + 1
    }

    /// Returns `true` if the range holds more points than [`MAX_SAMPLES`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn exceeds_limit(&self) -> bool {
        let intervals = (self.end - self.start) / self.step;
        intervals.is_nan() || intervals.floor() + 1.0 > MAX_SAMPLES as f64
    }

    /// Returns `true` if the range yields no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The i-th sample position.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn x_at(&self, index: usize) -> f64 {
        self.step.mul_add(index as f64, self.start)
    }
}

/// Plots `kind` across `range`.
///
/// Positions are computed as `start + i * step` rather than by repeated
/// addition, so the last sample does not drift.
#[must_use]
pub fn sample(kind: CurveKind, range: SampleRange) -> Vec<Point> {
    (0..range.len())
        .map(|i| {
            let x = range.x_at(i);
            Point {
                x,
                y: kind.value(x),
            }
        })
        .collect()
}

/// The secant through `(x, f(x))` and `(x + dx, f(x + dx))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Secant {
    /// Slope of the secant line.
    pub slope: f64,
    /// Left end of the drawn segment, one unit left of `x`.
    pub start: Point,
    /// Right end of the drawn segment, one unit right of `x + dx`.
    pub end: Point,
}

/// Computes the secant for `kind` at `x` with width `dx`.
///
/// A zero `dx` yields a NaN slope; [`DerivativeView`] keeps `dx` in range.
#[must_use]
pub fn secant(kind: CurveKind, x: f64, dx: f64) -> Secant {
    let x2 = x + dx;
    let (y1, y2) = (kind.value(x), kind.value(x2));
    let slope = (y2 - y1) / dx;
    Secant {
        slope,
        start: Point {
            x: x - 1.0,
            y: y1 - slope,
        },
        end: Point {
            x: x2 + 1.0,
            y: y2 + slope,
        },
    }
}

/// Control state of the visualizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivativeView {
    /// Selected curve.
    pub curve: CurveKind,
    point_x: f64,
    delta_x: f64,
}

impl Default for DerivativeView {
    fn default() -> Self {
        Self {
            curve: CurveKind::default(),
            point_x: 0.0,
            delta_x: 1.0,
        }
    }
}

impl DerivativeView {
    /// Creates a view, clamping both sliders into range.
    #[must_use]
    pub fn new(curve: CurveKind, point_x: f64, delta_x: f64) -> Self {
        Self::default()
            .with_curve(curve)
            .with_point(point_x)
            .with_delta(delta_x)
    }

    /// Returns the view with another curve selected.
    #[must_use]
    pub const fn with_curve(mut self, curve: CurveKind) -> Self {
        self.curve = curve;
        self
    }

    /// Returns the view with the point moved, clamped to `[-3, 3]`.
    #[must_use]
    pub fn with_point(mut self, x: f64) -> Self {
        self.point_x = clamp_or(x, MIN_X, MAX_X, self.point_x);
        self
    }

    /// Returns the view with a new Δx, clamped to `[0.1, 2]`.
    #[must_use]
    pub fn with_delta(mut self, dx: f64) -> Self {
        self.delta_x = clamp_or(dx, MIN_DELTA, MAX_DELTA, self.delta_x);
        self
    }

    /// Selected point.
    #[must_use]
    pub const fn point_x(&self) -> f64 {
        self.point_x
    }

    /// Selected Δx.
    #[must_use]
    pub const fn delta_x(&self) -> f64 {
        self.delta_x
    }

    /// Exact derivative at the selected point.
    #[must_use]
    pub fn derivative(&self) -> f64 {
        self.curve.derivative(self.point_x)
    }

    /// Secant at the selected point and Δx.
    #[must_use]
    pub fn secant(&self) -> Secant {
        secant(self.curve, self.point_x, self.delta_x)
    }

    /// Curve samples over `range`.
    #[must_use]
    pub fn samples(&self, range: SampleRange) -> Vec<Point> {
        sample(self.curve, range)
    }
}

// NaN from a slider keeps the previous value.
fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}
