//! Cross-engine integration tests for MathKit
//!
//! Exercises the public API of `mathkit-core` the way a front end would:
//! building state through transitions and checking the laws every
//! transition must keep.

use std::path::PathBuf;

use mathkit_core::{
    add_block, add_operation, compare_fractions, evaluate, regroup, remove_block,
    remove_operation, total_value, Catalog, Config, CurveKind, DerivativeView, Equation,
    Fraction, FractionComparison, FractionField, Machine, MathKitError, NumberLine,
    SampleRange, TargetComparison, Tier, TraceStep, Workspace, MAX_POSITION, MIN_POSITION,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Path to the shared fixtures.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

fn random_workspace(rng: &mut StdRng) -> Workspace {
    Workspace::with_counts(
        rng.gen_range(0..5000),
        rng.gen_range(0..200),
        rng.gen_range(0..200),
        rng.gen_range(0..200),
        rng.gen_range(0..50),
    )
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_double_then_add_two() {
    let evaluation = evaluate(&ids(&["double", "add2"]), 5.0, &Catalog::standard());

    assert_eq!(evaluation.result, 12.0);
    assert_eq!(
        evaluation.trace,
        vec![
            TraceStep::new("Start", 5.0),
            TraceStep::new("Double", 10.0),
            TraceStep::new("Add 2", 12.0),
        ]
    );
}

#[test]
fn test_square_of_negative() {
    let evaluation = evaluate(&ids(&["square"]), -3.0, &Catalog::standard());
    assert_eq!(evaluation.result, 9.0);
}

#[test]
fn test_empty_pipeline_is_identity() {
    let catalog = Catalog::standard();
    for x in [-7.5, 0.0, 1.0, 402.0] {
        let evaluation = evaluate(&[], x, &catalog);
        assert_eq!(evaluation.result, x);
        assert_eq!(evaluation.trace, vec![TraceStep::new("Start", x)]);
    }
}

#[test]
fn test_evaluate_is_deterministic() {
    let catalog = Catalog::standard();
    let all = ["add2", "double", "square", "half", "nope"];
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let pipeline: Vec<String> = (0..rng.gen_range(0..6))
            .map(|_| all[rng.gen_range(0..all.len())].to_string())
            .collect();
        let input = rng.gen_range(-20.0..20.0);

        assert_eq!(
            evaluate(&pipeline, input, &catalog),
            evaluate(&pipeline, input, &catalog)
        );
    }
}

#[test]
fn test_add_then_remove_restores_pipeline() {
    let pipelines = [ids(&[]), ids(&["half"]), ids(&["square", "add2", "double"])];
    for pipeline in pipelines {
        let grown = add_operation(&pipeline, "double");
        assert_eq!(remove_operation(&grown, pipeline.len()).unwrap(), pipeline);
    }
}

#[test]
fn test_remove_out_of_range() {
    let err = remove_operation(&ids(&["double"]), 1).unwrap_err();
    assert!(matches!(
        err,
        MathKitError::IndexOutOfRange { index: 1, len: 1 }
    ));
}

#[test]
fn test_unknown_operation_is_skipped() {
    let evaluation = evaluate(&ids(&["double", "teleport", "add2"]), 5.0, &Catalog::standard());
    assert_eq!(evaluation.result, 12.0);
    assert_eq!(evaluation.trace.len(), 3);
}

#[test]
fn test_machine_history_accumulates() {
    let catalog = Catalog::standard();
    let machine = Machine::default()
        .add_operation("half")
        .run_and_record(&catalog)
        .set_input(9.0)
        .run_and_record(&catalog);

    let results: Vec<f64> = machine.history.iter().map(|run| run.result).collect();
    assert_eq!(results, vec![2.5, 4.5]);
}

// ============================================================================
// Place value
// ============================================================================

#[test]
fn test_regroup_twenty_three_ones() {
    let workspace = Workspace::with_counts(402, 23, 0, 0, 0);
    let regrouped = regroup(&workspace);

    assert_eq!(regrouped, Workspace::with_counts(402, 3, 2, 0, 0));
    assert_eq!(total_value(&workspace), 23);
    assert_eq!(total_value(&regrouped), 23);
}

#[test]
fn test_build_four_hundred_two() {
    let mut workspace = Workspace::new(402);
    for _ in 0..4 {
        workspace = add_block(&workspace, Tier::Hundreds);
    }
    for _ in 0..2 {
        workspace = add_block(&workspace, Tier::Ones);
    }

    assert_eq!(total_value(&workspace), 402);
    assert_eq!(workspace.comparison(), TargetComparison::Exact);
}

#[test]
fn test_regroup_laws_hold_for_random_workspaces() {
    let mut rng = StdRng::seed_from_u64(402);
    for _ in 0..200 {
        let workspace = random_workspace(&mut rng);
        let once = regroup(&workspace);

        assert_eq!(regroup(&once), once);
        assert_eq!(total_value(&once), total_value(&workspace));
        assert!(once.is_normalized());
        assert_eq!(once.target(), workspace.target());
    }
}

#[test]
fn test_remove_block_on_empty_tier_is_noop() {
    let workspace = Workspace::with_counts(50, 0, 5, 0, 1);
    assert_eq!(remove_block(&workspace, Tier::Ones), workspace);
    assert_eq!(remove_block(&workspace, Tier::Hundreds), workspace);
}

// ============================================================================
// Other widgets
// ============================================================================

#[test]
fn test_number_line_prompts_stay_on_the_line() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut line = NumberLine::default();

    for _ in 0..100 {
        line = line.next_prompt(&mut rng);
        let expected = line.prompt.expected_position(line.position);
        assert!((MIN_POSITION..=MAX_POSITION).contains(&expected));

        let (next, outcome) = line.attempt_move(expected).unwrap();
        assert!(outcome.is_correct());
        line = next;
    }
}

#[test]
fn test_number_line_rejects_off_line_moves() {
    let line = NumberLine::starting_at(10).unwrap();
    assert!(matches!(
        line.attempt_move(11),
        Err(MathKitError::OutOfBounds { position: 11, .. })
    ));
    assert!(NumberLine::starting_at(-11).is_err());
}

#[test]
fn test_secant_approaches_derivative() {
    for curve in CurveKind::ALL {
        let wide = DerivativeView::new(curve, 1.0, 2.0);
        let narrow = DerivativeView::new(curve, 1.0, 0.1);

        let wide_gap = (wide.secant().slope - wide.derivative()).abs();
        let narrow_gap = (narrow.secant().slope - narrow.derivative()).abs();
        assert!(narrow_gap < wide_gap, "{curve}: {narrow_gap} >= {wide_gap}");
    }
}

#[test]
fn test_balanced_water() {
    assert!(!Equation::default().is_balanced());
    assert!(Equation::from_fields("2", "1", "2").is_balanced());
    assert!(Equation::from_fields("4", "2", "4").is_balanced());
    // unreadable and out-of-range coefficients count as 1
    assert!(Equation::from_fields("2", "abc", "2").is_balanced());
    assert!(Equation::from_fields("2", "11", "2").is_balanced());
}

#[test]
fn test_equivalent_fractions_of_different_wholes() {
    let [first, second] = Fraction::starting_pair();
    assert_eq!(
        compare_fractions(&first, &second),
        FractionComparison::Equal
    );

    let bigger = first.update(FractionField::Numerator, "2");
    assert_eq!(
        compare_fractions(&bigger, &second),
        FractionComparison::FirstLarger
    );
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_fixture_config_loads() {
    let config = Config::load_from_dir(&fixture_path()).unwrap();

    assert_eq!(config.machine_input, 3.0);
    assert_eq!(config.place_value_target, 1250);
    assert_eq!(config.tutor.model, "gpt-4o-mini");
    assert_eq!(config.tutor.timeout_seconds, 10);
    assert_eq!(config.tutor.api_key_env, "OPENAI_API_KEY");

    let range = SampleRange::from(config.derivative);
    assert_eq!(range.len(), 9);
}
