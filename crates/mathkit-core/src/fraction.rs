//! Fraction comparison engine.
//!
//! A [`Fraction`] here is "numerator/denominator of a whole of a given size",
//! so `1/4` of a large whole can outweigh `1/3` of a small one.

use std::cmp::Ordering;
use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Allowed range for numerator and denominator.
pub const PART_RANGE: RangeInclusive<u32> = 1..=12;

/// Allowed range for the whole size.
pub const WHOLE_RANGE: RangeInclusive<u32> = 50..=200;

/// An editable field of a [`Fraction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractionField {
    /// Top number.
    Numerator,
    /// Bottom number.
    Denominator,
    /// Size of the whole.
    WholeSize,
}

impl FractionField {
    const fn range(self) -> RangeInclusive<u32> {
        match self {
            Self::Numerator | Self::Denominator => PART_RANGE,
            Self::WholeSize => WHOLE_RANGE,
        }
    }
}

/// A fraction of a sized whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraction {
    /// Filled parts.
    pub numerator: u32,
    /// Parts the whole is cut into.
    pub denominator: u32,
    /// Size of the whole.
    pub whole_size: u32,
}

/// One drawn slice of a fraction bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Width of the slice.
    pub width: f64,
    /// Whether the slice is shaded.
    pub filled: bool,
}

impl Fraction {
    /// Creates a fraction, clamping each field into its range.
    #[must_use]
    pub fn new(numerator: u32, denominator: u32, whole_size: u32) -> Self {
        Self {
            numerator: clamp_field(FractionField::Numerator, numerator),
            denominator: clamp_field(FractionField::Denominator, denominator),
            whole_size: clamp_field(FractionField::WholeSize, whole_size),
        }
    }

    /// The two fractions the widget opens with: 1/4 of 100 and 1/3 of 75.
    #[must_use]
    pub const fn starting_pair() -> [Self; 2] {
        [
            Self {
                numerator: 1,
                denominator: 4,
                whole_size: 100,
            },
            Self {
                numerator: 1,
                denominator: 3,
                whole_size: 75,
            },
        ]
    }

    /// Returns the fraction with `field` set from raw input text.
    ///
    /// Text that does not parse, or parses to zero, counts as `1`; the result
    /// is then clamped to the field's range.
    #[must_use]
    pub fn update(mut self, field: FractionField, text: &str) -> Self {
        let parsed = text
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|&n| n != 0)
            .unwrap_or(1);
        let (low, high) = (*field.range().start(), *field.range().end());
        let value = u32::try_from(parsed.clamp(i64::from(low), i64::from(high))).unwrap_or(low);
        match field {
            FractionField::Numerator => self.numerator = value,
            FractionField::Denominator => self.denominator = value,
            FractionField::WholeSize => self.whole_size = value,
        }
        self
    }

    /// numerator / denominator · whole size.
    #[must_use]
    pub fn actual_value(&self) -> f64 {
        f64::from(self.numerator) * f64::from(self.whole_size) / f64::from(self.denominator)
    }

    /// Slices of the fraction bar, the first `numerator` of them shaded.
    #[must_use]
    pub fn segments(&self) -> Vec<Segment> {
        let width = f64::from(self.whole_size) / f64::from(self.denominator);
        (0..self.denominator)
            .map(|i| Segment {
                width,
                filled: i < self.numerator,
            })
            .collect()
    }

    // numerator * whole_size, scaled to a common denominator with `other`.
    fn scaled_numerator(&self, other: &Self) -> u64 {
        u64::from(self.numerator) * u64::from(self.whole_size) * u64::from(other.denominator)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} of {}",
            self.numerator, self.denominator, self.whole_size
        )
    }
}

fn clamp_field(field: FractionField, value: u32) -> u32 {
    let range = field.range();
    value.clamp(*range.start(), *range.end())
}

/// Which of two fractions is worth more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractionComparison {
    /// The first fraction is larger.
    FirstLarger,
    /// The second fraction is larger.
    SecondLarger,
    /// Both are worth the same.
    Equal,
}

impl FractionComparison {
    /// Verdict line shown after comparing.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::FirstLarger => "First fraction is larger!",
            Self::SecondLarger => "Second fraction is larger!",
            Self::Equal => "The fractions are equal!",
        }
    }
}

/// Compares actual values exactly, by cross-multiplying.
///
/// # Examples
///
/// ```
/// use mathkit_core::{compare_fractions, Fraction, FractionComparison};
///
/// let [quarter, third] = Fraction::starting_pair();
/// assert_eq!(compare_fractions(&quarter, &third), FractionComparison::Equal);
/// ```
#[must_use]
pub fn compare_fractions(first: &Fraction, second: &Fraction) -> FractionComparison {
    match first
        .scaled_numerator(second)
        .cmp(&second.scaled_numerator(first))
    {
        Ordering::Greater => FractionComparison::FirstLarger,
        Ordering::Less => FractionComparison::SecondLarger,
        Ordering::Equal => FractionComparison::Equal,
    }
}
