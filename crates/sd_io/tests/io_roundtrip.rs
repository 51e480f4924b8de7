//! Load a stake file from disk, write an artifact back, read it again.

use std::fs;

use assert_json_diff::assert_json_eq;
use rust_decimal_macros::dec;
use sd_io::prelude::*;
use serde_json::{json, Value};

#[test]
fn stake_file_preserves_order_and_account() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("stakes.json");
    fs::write(
        &p,
        r#"{
          "account": "0xabc",
          "account_balance": "100",
          "stakes": [
            {"proposal_id": "3", "proposal_name": "Grants", "amount": "20"},
            {"proposal_id": "1", "proposal_name": "Audit", "amount": "50"},
            {"proposal_id": "2", "proposal_name": "Docs", "amount": 0}
          ]
        }"#,
    )
    .unwrap();

    let sf = load_stake_file(&p).unwrap();
    assert_eq!(sf.account.as_deref(), Some("0xabc"));
    assert_eq!(sf.account_balance, Some(dec!(100)));
    assert_eq!(sf.total, None);
    let ids: Vec<&str> = sf.stakes.iter().map(|s| s.proposal_id.as_str()).collect();
    assert_eq!(ids, vec!["3", "1", "2"]);
    assert_eq!(sf.stakes[2].amount, dec!(0));
}

#[test]
fn invalid_proposal_id_is_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("stakes.json");
    fs::write(&p, r#"{"stakes":[{"proposal_id":"has space","proposal_name":"x","amount":"1"}]}"#).unwrap();
    assert!(matches!(load_stake_file(&p), Err(IoError::Json { .. })));
}

#[test]
fn oversized_input_hits_the_limit() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("big.json");
    let f = fs::File::create(&p).unwrap();
    f.set_len(MAX_INPUT_BYTES + 1).unwrap();
    assert!(matches!(load_stake_file(&p), Err(IoError::Limit(_))));
}

#[test]
fn canonical_artifact_reads_back_identically() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("distribution.json");
    let v = json!({
        "rows": [{"index": 1, "percentage": "71.4"}, {"index": -1, "percentage": "28.6"}],
        "heading": "Voting influence distribution",
    });
    write_canonical_file(&out, &v).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with(r#"{"heading":"#));
    let back: Value = serde_json::from_str(&text).unwrap();
    assert_json_eq!(back, v);

    // same value, same bytes
    assert_eq!(text.into_bytes(), to_canonical_json_bytes(&v).unwrap());
}
