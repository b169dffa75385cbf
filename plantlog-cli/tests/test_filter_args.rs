//! Tests for command-line filter arguments against real tables

use chrono::NaiveDate;
use plantlog::ledger::{LevellerDraft, TensionLeveller};
use plantlog::Clock;
use plantlog_cli::input::{FilterArgs, InputError};
use plantlog_cli::render;
use tempfile::TempDir;

fn leveller(dir: &TempDir) -> TensionLeveller {
    let tl = TensionLeveller::new(dir.path().join("TL.csv"))
        .with_clock(Clock::fixed(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    for (code, position, entry) in [
        ("AC01", "#1 SUP", "2024-01-01"),
        ("AC02", "#2 INF", "2024-02-01"),
        ("AC03", "#1 SUP", "2024-02-15"),
    ] {
        tl.register(LevellerDraft {
            code: code.to_string(),
            entry: entry.to_string(),
            position: position.to_string(),
            ..LevellerDraft::default()
        })
        .unwrap();
    }
    tl
}

#[test]
fn test_position_and_window_arguments() {
    let temp_dir = TempDir::new().unwrap();
    let tl = leveller(&temp_dir);

    let filter = FilterArgs {
        categories: vec!["#1 SUP".to_string()],
        ..FilterArgs::default()
    }
    .into_filter()
    .unwrap();
    let rows = tl.history(&filter).unwrap();
    let codes: Vec<&str> = rows.iter().map(|r| r.record.code.as_str()).collect();
    assert_eq!(codes, vec!["AC03", "AC01"]);

    let filter = FilterArgs {
        to: Some("2024-01-31".to_string()),
        ..FilterArgs::default()
    }
    .into_filter()
    .unwrap();
    let rows = tl.history(&filter).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].record.code, "AC01");
}

#[test]
fn test_bad_window_is_rejected_before_reading() {
    let result = FilterArgs {
        from: Some("2024-03-01".to_string()),
        to: Some("2024-01-01".to_string()),
        ..FilterArgs::default()
    }
    .into_filter();

    match result {
        Err(InputError::Window { .. }) => {}
        other => panic!("Expected window error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_rendered_history_lists_every_row() {
    colored::control::set_override(false);
    let temp_dir = TempDir::new().unwrap();
    let tl = leveller(&temp_dir);

    let rows = tl.history(&FilterArgs::default().into_filter().unwrap()).unwrap();
    let text = render::levellers("History", &rows);
    assert!(text.contains("History (3)"));
    assert!(text.contains("AC02"));
    assert!(text.contains("#2 INF"));
}
