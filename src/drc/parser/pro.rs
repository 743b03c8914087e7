//! `.kicad_pro` project files
//!
//! Rules are synthesised from `board.design_settings.rules`, one rule per
//! positive minimum, using a fixed key table.

use serde_json::Value;

use crate::drc::rules::{ConstraintKind, DrcConstraint, DrcRule, DrcRuleSet};
use crate::error::{DrcError, Result};

/// Project-file keys and the constraint each one becomes, in emission order
pub const PRO_RULE_KEYS: [(&str, ConstraintKind); 10] = [
    ("min_track_width", ConstraintKind::TrackWidth),
    ("min_clearance", ConstraintKind::Clearance),
    ("min_through_hole_diameter", ConstraintKind::HoleSize),
    ("min_hole_to_hole", ConstraintKind::HoleToHole),
    ("min_copper_edge_clearance", ConstraintKind::EdgeClearance),
    ("min_via_annular_width", ConstraintKind::AnnularWidth),
    ("min_hole_clearance", ConstraintKind::HoleClearance),
    ("min_text_height", ConstraintKind::TextHeight),
    ("min_text_thickness", ConstraintKind::TextThickness),
    ("min_silk_clearance", ConstraintKind::SilkClearance),
];

pub fn parse_pro(content: &str) -> Result<DrcRuleSet> {
    let root: Value = serde_json::from_str(content)?;
    build_rule_set(&root)
}

pub fn parse_pro_bytes(bytes: &[u8]) -> Result<DrcRuleSet> {
    let root: Value = serde_json::from_slice(bytes)?;
    build_rule_set(&root)
}

fn build_rule_set(root: &Value) -> Result<DrcRuleSet> {
    if !root.is_object() {
        return Err(DrcError::Json {
            line: 1,
            column: 1,
            message: "expected JSON object at root".to_string(),
        });
    }

    let mut rule_set = DrcRuleSet::new(1);
    let Some(rules) = root.pointer("/board/design_settings/rules") else {
        return Ok(rule_set);
    };

    let clearance_fallback = net_class_clearance(root)?;

    for (key, kind) in PRO_RULE_KEYS {
        let Some(value) = rules.get(key) else {
            continue;
        };
        let Some(mut mm) = to_f64(value)? else {
            continue;
        };

        // A zero min_clearance defers to the default net class
        if kind == ConstraintKind::Clearance && mm == 0.0 && clearance_fallback > 0.0 {
            mm = clearance_fallback;
        }
        if mm <= 0.0 {
            continue;
        }

        rule_set.add_rule(
            DrcRule::new(format_rule_name(key)).with_constraint(DrcConstraint::min(kind, mm)),
        );
    }

    Ok(rule_set)
}

fn net_class_clearance(root: &Value) -> Result<f64> {
    match root.pointer("/net_settings/classes/0/clearance") {
        Some(v) => Ok(to_f64(v)?.unwrap_or(0.0)),
        None => Ok(0.0),
    }
}

/// Numbers and numeric strings; `None` for anything else
fn to_f64(value: &Value) -> Result<Option<f64>> {
    match value {
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) => s.trim().parse().map(Some).map_err(|_| DrcError::InvalidValue {
            value: s.clone(),
            message: "expected a numeric string".to_string(),
        }),
        _ => Ok(None),
    }
}

/// `min_track_width` -> `Min Track Width`
pub fn format_rule_name(key: &str) -> String {
    let rest = key.strip_prefix("min_").unwrap_or(key);
    let mut name = String::from("Min");
    for part in rest.split('_').filter(|p| !p.is_empty()) {
        name.push(' ');
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}
