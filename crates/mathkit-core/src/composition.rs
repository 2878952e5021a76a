//! Composition engine behind the function machine widget.
//!
//! A [`Machine`] holds a pipeline of operation identifiers, an input value and
//! an append-only history of [`Run`]s. Operations are looked up by identifier
//! in a [`Catalog`] at evaluation time; identifiers the catalog does not know
//! are skipped without error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MathKitError, Result};

/// Label of the synthetic first step of every trace.
pub const START_STEP: &str = "Start";

/// Input value a fresh machine starts with.
pub const DEFAULT_INPUT: f64 = 5.0;

// ============================================================================
// Operation and Catalog
// ============================================================================

/// A named unary numeric transform.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Identifier used in pipelines (e.g. `"add2"`).
    pub id: String,
    /// Display name used in traces (e.g. `"Add 2"`).
    pub name: String,
    transform: fn(f64) -> f64,
}

impl Operation {
    /// Creates a new operation.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, transform: fn(f64) -> f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            transform,
        }
    }

    /// Applies the transform to `value`.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        (self.transform)(value)
    }
}

/// Ordered lookup table of operations keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    operations: Vec<Operation>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// The four machine parts offered by the widget: Add 2, Double, Square, Half.
    ///
    /// # Examples
    ///
    /// ```
    /// use mathkit_core::Catalog;
    ///
    /// let catalog = Catalog::standard();
    /// assert_eq!(catalog.get("half").map(|op| op.apply(3.0)), Some(1.5));
    /// assert!(catalog.get("triple").is_none());
    /// ```
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with(Operation::new("add2", "Add 2", |x| x + 2.0))
            .with(Operation::new("double", "Double", |x| x * 2.0))
            .with(Operation::new("square", "Square", |x| x * x))
            .with(Operation::new("half", "Half", |x| x / 2.0))
    }

    /// Adds an operation, replacing any existing entry with the same id in place.
    #[must_use]
    pub fn with(mut self, operation: Operation) -> Self {
        if let Some(existing) = self.operations.iter_mut().find(|op| op.id == operation.id) {
            *existing = operation;
        } else {
            self.operations.push(operation);
        }
        self
    }

    /// Looks up an operation by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.id == id)
    }

    /// Iterates operations in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    /// Number of operations in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the catalog has no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

// ============================================================================
// Pipeline operations
// ============================================================================

/// Returns a new pipeline with `operation_id` appended.
///
/// The identifier is not checked against any catalog.
#[must_use]
pub fn add_operation(pipeline: &[String], operation_id: impl Into<String>) -> Vec<String> {
    let mut next = pipeline.to_vec();
    next.push(operation_id.into());
    next
}

/// Returns a new pipeline without the element at `index`.
///
/// # Errors
///
/// Returns [`MathKitError::IndexOutOfRange`] if `index >= pipeline.len()`.
pub fn remove_operation(pipeline: &[String], index: usize) -> Result<Vec<String>> {
    if index >= pipeline.len() {
        return Err(MathKitError::index_out_of_range(index, pipeline.len()));
    }
    let mut next = pipeline.to_vec();
    next.remove(index);
    Ok(next)
}

/// One row of an evaluation trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    /// Display name of the operation, or `"Start"`.
    pub operation: String,
    /// Running value after this step.
    pub value: f64,
}

impl TraceStep {
    /// Creates a new trace step.
    #[must_use]
    pub fn new(operation: impl Into<String>, value: f64) -> Self {
        Self {
            operation: operation.into(),
            value,
        }
    }
}

/// Result of pushing a value through a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Final running value.
    pub result: f64,
    /// Every intermediate value, starting with the `Start` step.
    pub trace: Vec<TraceStep>,
}

/// Evaluates `pipeline` left to right against `input`.
///
/// # Examples
///
/// ```
/// use mathkit_core::{evaluate, Catalog};
///
/// let pipeline = vec!["double".to_string(), "add2".to_string()];
/// let evaluation = evaluate(&pipeline, 5.0, &Catalog::standard());
/// assert_eq!(evaluation.result, 12.0);
/// assert_eq!(evaluation.trace.len(), 3);
/// ```
#[must_use]
pub fn evaluate(pipeline: &[String], input: f64, catalog: &Catalog) -> Evaluation {
    let mut trace = Vec::with_capacity(pipeline.len() + 1);
    trace.push(TraceStep::new(START_STEP, input));

    let result = pipeline
        .iter()
        .filter_map(|id| catalog.get(id))
        .fold(input, |value, operation| {
            let next = operation.apply(value);
            trace.push(TraceStep::new(operation.name.clone(), next));
            next
        });

    Evaluation { result, trace }
}

// ============================================================================
// Run and Machine
// ============================================================================

/// A completed machine run, kept in the history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Input the run started from.
    pub input: f64,
    /// Trace of the run, starting with the `Start` step.
    pub steps: Vec<TraceStep>,
    /// Final output.
    pub result: f64,
    /// When the run was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl Run {
    /// Creates a run from an evaluation, stamped with the current time.
    #[must_use]
    pub fn new(input: f64, evaluation: Evaluation) -> Self {
        Self {
            input,
            steps: evaluation.trace,
            result: evaluation.result,
            recorded_at: Utc::now(),
        }
    }
}

/// State of one function machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    /// Operation identifiers in evaluation order.
    pub pipeline: Vec<String>,
    /// Current input value.
    pub input: f64,
    /// Append-only log of completed runs.
    pub history: Vec<Run>,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT)
    }
}

impl Machine {
    /// Creates an empty machine with the given input.
    #[must_use]
    pub const fn new(input: f64) -> Self {
        Self {
            pipeline: Vec::new(),
            input,
            history: Vec::new(),
        }
    }

    /// Returns the machine with `operation_id` appended to the pipeline.
    #[must_use]
    pub fn add_operation(mut self, operation_id: impl Into<String>) -> Self {
        self.pipeline = add_operation(&self.pipeline, operation_id);
        self
    }

    /// Returns the machine without the pipeline slot at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MathKitError::IndexOutOfRange`] if the slot does not exist.
    pub fn remove_operation(mut self, index: usize) -> Result<Self> {
        self.pipeline = remove_operation(&self.pipeline, index)?;
        Ok(self)
    }

    /// Returns the machine with a new input value. History is untouched.
    #[must_use]
    pub fn set_input(mut self, input: f64) -> Self {
        self.input = input;
        self
    }

    /// Evaluates the current pipeline against the current input.
    #[must_use]
    pub fn evaluate(&self, catalog: &Catalog) -> Evaluation {
        evaluate(&self.pipeline, self.input, catalog)
    }

    /// Output shown next to the pipeline, or `None` while the pipeline is empty.
    #[must_use]
    pub fn preview(&self, catalog: &Catalog) -> Option<f64> {
        if self.pipeline.is_empty() {
            None
        } else {
            Some(self.evaluate(catalog).result)
        }
    }

    /// Runs the machine and appends the run to the history.
    ///
    /// The input value is left unchanged.
    #[must_use]
    pub fn run_and_record(mut self, catalog: &Catalog) -> Self {
        let evaluation = self.evaluate(catalog);
        debug!(
            input = self.input,
            result = evaluation.result,
            steps = evaluation.trace.len(),
            "Recorded machine run"
        );
        self.history.push(Run::new(self.input, evaluation));
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
