//! End-to-end over files on disk: load_ctx → run → serialize.

use std::fs;
use std::path::PathBuf;

use rust_decimal_macros::dec;
use sd_core::Decimal;
use sd_pipeline::{load_ctx, run, validate_ctx, PipelineError};
use serde_json::Value;

fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let p = dir.path().join(name);
    fs::write(&p, body).unwrap();
    p
}

const SEVEN_PROPOSALS: &str = r#"{
  "account": "0x00000000000000000000000000000000000000aa",
  "account_balance": "1000",
  "stakes": [
    {"proposal_id": "1", "proposal_name": "Audit",      "amount": "120"},
    {"proposal_id": "2", "proposal_name": "Grants",     "amount": "300"},
    {"proposal_id": "3", "proposal_name": "Docs",       "amount": "40"},
    {"proposal_id": "4", "proposal_name": "Events",     "amount": "40"},
    {"proposal_id": "5", "proposal_name": "Bounties",   "amount": "100"},
    {"proposal_id": "6", "proposal_name": "Research",   "amount": "0"},
    {"proposal_id": "7", "proposal_name": "Marketing",  "amount": "0.5"}
  ]
}"#;

#[test]
fn seven_proposals_fold_under_the_default_cap() {
    let dir = tempfile::tempdir().unwrap();
    let stakes = write(&dir, "stakes.json", SEVEN_PROPOSALS);

    let report = run(load_ctx(&stakes, None).unwrap()).unwrap();
    assert_eq!(report.total, dec!(600.5));
    assert_eq!(report.proposals_count, 6);

    let rows = report.rows.as_ref().unwrap();
    assert_eq!(rows.len(), 5);
    let names: Vec<&str> = rows.iter().map(|r| r.proposal_name.as_str()).collect();
    // Grants, Audit, Bounties kept; then the tied 40s: index 2 kept, index 3 folded with Marketing
    assert_eq!(names, vec!["Grants", "Audit", "Bounties", "Others", "Docs"]);
    assert!(!rows[3].navigable);

    let display: Decimal = rows.iter().map(|r| r.display_percentage).sum();
    assert_eq!(display, dec!(100));

    let influence = report.influence.unwrap();
    assert_eq!(influence.active, dec!(600.5));
    assert_eq!(influence.inactive, dec!(399.5));
}

#[test]
fn params_file_changes_cap_and_label() {
    let dir = tempfile::tempdir().unwrap();
    let stakes = write(&dir, "stakes.json", SEVEN_PROPOSALS);
    let params = write(&dir, "params.json", r#"{"max_included": 2, "others_label": "Everything else", "display_digits": 1}"#);

    let report = run(load_ctx(&stakes, Some(&params)).unwrap()).unwrap();
    let rows = report.rows.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].proposal_name, "Everything else");
    assert_eq!(rows[1].proposal_name, "Grants");
    assert_eq!(report.display_digits, 1);
}

#[test]
fn report_serializes_others_as_minus_one() {
    let dir = tempfile::tempdir().unwrap();
    let stakes = write(&dir, "stakes.json", SEVEN_PROPOSALS);
    let report = run(load_ctx(&stakes, None).unwrap()).unwrap();

    let v: Value = serde_json::to_value(&report).unwrap();
    let rows = v["rows"].as_array().unwrap();
    let others = rows.iter().find(|r| r["proposal_name"] == "Others").unwrap();
    assert_eq!(others["index"], Value::from(-1));
    assert!(others.get("proposal_id").is_none());
    assert_eq!(rows[0]["proposal_id"], Value::from("2"));
}

#[test]
fn duplicate_ids_fail_validation() {
    let dir = tempfile::tempdir().unwrap();
    let stakes = write(
        &dir,
        "stakes.json",
        r#"{"stakes":[{"proposal_id":"1","proposal_name":"A","amount":"1"},
                      {"proposal_id":"1","proposal_name":"A again","amount":"2"}]}"#,
    );
    let ctx = load_ctx(&stakes, None).unwrap();
    assert!(!validate_ctx(&ctx).pass);
    assert!(matches!(run(ctx), Err(PipelineError::Validation(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_ctx(&dir.path().join("absent.json"), None).unwrap_err();
    assert!(matches!(err, PipelineError::Io(_)));
}
