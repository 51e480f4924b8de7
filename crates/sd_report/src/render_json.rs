//! render_json.rs: report JSON renderer.
//! Section order: heading → account? → total → rows? → influence? → meta.
//!
//! Object key order relies on `serde_json`'s `preserve_order` feature
//! (insertion order of `serde_json::Map`).

use serde_json::{Map as JsonMap, Value};

use sd_pipeline::{DistributionReport, InfluenceView, LegendRow};

use crate::{check_report, fmt_fixed, ReportError};

/// Build the top-level report object in fixed section order.
pub fn render_json(r: &DistributionReport) -> Result<Value, ReportError> {
    check_report(r)?;
    let mut root = obj();

    root.insert("heading".into(), Value::String(r.heading.clone()));
    if let Some(a) = r.account.as_ref() {
        root.insert("account".into(), Value::String(a.clone()));
    }
    root.insert("total".into(), Value::String(r.total.normalize().to_string()));

    // rows are omitted entirely when the section is hidden
    if let Some(rows) = r.rows.as_ref() {
        let arr = rows.iter().map(|row| row_json(row, r.display_digits)).collect();
        root.insert("rows".into(), Value::Array(arr));
    }

    if let Some(inf) = r.influence.as_ref() {
        root.insert("influence".into(), influence_json(inf));
    }

    root.insert("meta".into(), meta_json(r));
    Ok(Value::Object(root))
}

/* ----------------------- sections ----------------------- */

fn row_json(row: &LegendRow, digits: u32) -> Value {
    // index → proposal_id? → proposal_name → percentage → display → navigable
    let mut o = obj();
    o.insert("index".into(), Value::from(row.index.as_signed()));
    if let Some(id) = row.proposal_id.as_ref() {
        o.insert("proposal_id".into(), Value::String(id.to_string()));
    }
    o.insert("proposal_name".into(), Value::String(row.proposal_name.clone()));
    o.insert("percentage".into(), Value::String(row.percentage.normalize().to_string()));
    o.insert("display".into(), Value::String(fmt_fixed(row.display_percentage, digits)));
    o.insert("navigable".into(), Value::Bool(row.navigable));
    Value::Object(o)
}

fn influence_json(inf: &InfluenceView) -> Value {
    let mut o = obj();
    o.insert("total".into(), Value::String(inf.total.normalize().to_string()));
    o.insert("active".into(), Value::String(inf.active.normalize().to_string()));
    o.insert("inactive".into(), Value::String(inf.inactive.normalize().to_string()));
    Value::Object(o)
}

fn meta_json(r: &DistributionReport) -> Value {
    let mut engine = obj();
    engine.insert("vendor".into(), Value::String(r.engine.vendor.clone()));
    engine.insert("name".into(), Value::String(r.engine.name.clone()));
    engine.insert("version".into(), Value::String(r.engine.version.clone()));

    let mut o = obj();
    o.insert("proposals_count".into(), Value::from(r.proposals_count as u64));
    o.insert("display_digits".into(), Value::from(r.display_digits));
    o.insert("engine".into(), Value::Object(engine));
    Value::Object(o)
}

#[inline]
fn obj() -> JsonMap<String, Value> {
    JsonMap::new()
}
