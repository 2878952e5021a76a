//! MathKit engines
//!
//! Pure state-transition engines behind the MathKit teaching widgets: the
//! function machine, base-ten blocks, the number line game, the derivative
//! visualizer, the chemical balancer and the fraction comparer.

pub mod chemistry;
pub mod composition;
pub mod config;
pub mod derivative;
pub mod error;
pub mod fraction;
pub mod number_line;
pub mod place_value;

pub use chemistry::{safe_coefficient, AtomCounts, Equation, Molecule};
pub use composition::{
    add_operation, evaluate, remove_operation, Catalog, Evaluation, Machine, Operation, Run,
    TraceStep, START_STEP,
};
pub use config::{Config, DerivativeConfig, TutorConfig};
pub use derivative::{
    sample, secant, CurveKind, DerivativeView, Point, SampleRange, Secant, MAX_SAMPLES,
};
pub use error::{MathKitError, Result};
pub use fraction::{compare_fractions, Fraction, FractionComparison, FractionField, Segment};
pub use number_line::{
    generate_prompt, MoveKind, MoveOutcome, NumberLine, Prompt, MAX_POSITION, MIN_POSITION,
};
pub use place_value::{
    add_block, compare_to_target, regroup, remove_block, total_value, TargetComparison, Tier,
    Workspace,
};
