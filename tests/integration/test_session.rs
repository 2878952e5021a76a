//! Session-level integration tests
//!
//! Drives engines through a short session, renders the report in both
//! formats and checks tutor feedback degrades to a learner-facing message
//! when no API is reachable.

use mathkit_core::{Catalog, Machine, NumberLine, Prompt, TutorConfig, Tier, Workspace};
use mathkit_report::json::JsonGenerator;
use mathkit_report::{MarkdownGenerator, SessionReport};
use mathkit_tutor::{TutorClient, FAILED_FEEDBACK};

fn session_report() -> SessionReport {
    let catalog = Catalog::standard();
    let machine = Machine::new(4.0)
        .add_operation("square")
        .add_operation("half")
        .run_and_record(&catalog)
        .remove_operation(1)
        .unwrap()
        .run_and_record(&catalog);

    let workspace = (0..12)
        .fold(Workspace::new(120), |ws, _| ws.add_block(Tier::Tens))
        .regroup();

    SessionReport::builder()
        .title("integration")
        .machine(&machine, &catalog)
        .blocks(&workspace)
        .build()
}

#[test]
fn test_markdown_report_tells_the_session() {
    let markdown = MarkdownGenerator::new(&session_report()).generate();

    assert!(markdown.starts_with("# MathKit Session: integration"));
    assert!(markdown.contains("| Square | 4 | 16 |"));

    let first = markdown.find("#### Run 1").unwrap();
    let second = markdown.find("#### Run 2").unwrap();
    assert!(markdown[first..second].contains("- Half: 8"));
    assert!(markdown[first..second].contains("- Output: 8"));
    assert!(markdown[second..].contains("- Output: 16"));

    assert!(markdown.contains("| 0 | 1 | 2 | 0 |"));
    assert!(markdown.contains("**Total**: 120 (target 120)"));
    assert!(markdown.contains("> Perfect!"));
}

#[test]
fn test_json_report_round_trips() {
    let report = session_report();
    let json = JsonGenerator::new(&report).generate_pretty().unwrap();

    let parsed: SessionReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
    assert_eq!(parsed.run_count(), 2);
    assert!(parsed.target_reached());
}

#[tokio::test]
async fn test_feedback_without_api_is_a_message() {
    let line = NumberLine {
        prompt: Prompt {
            operation: mathkit_core::MoveKind::Add,
            value: 3,
        },
        ..NumberLine::starting_at(1).unwrap()
    };
    let (_, outcome) = line.attempt_move(5).unwrap();
    assert!(!outcome.is_correct());

    let config = TutorConfig {
        api_base: "http://127.0.0.1:9".to_string(),
        api_key_env: "MATHKIT_INTEGRATION_UNSET_KEY".to_string(),
        timeout_seconds: 2,
        ..TutorConfig::default()
    };
    let client = TutorClient::new(&config).unwrap();

    let text = client.feedback(&outcome.tutor_prompt()).await;
    assert_eq!(text, FAILED_FEEDBACK);
}
