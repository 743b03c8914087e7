//! `.kicad_dru` rule files
//!
//! ```text
//! (version 1)
//! (rule "Minimum Trace Width"
//!     (layer outer)
//!     (condition "A.Type == 'track'")
//!     (constraint track_width (min 0.127mm)))
//! ```

use std::fmt::Write as _;

use crate::drc::rules::{ConstraintKind, DrcConstraint, DrcRule, DrcRuleSet, LayerSelector, Severity};
use crate::error::{DrcError, Result};

use super::sexpr::{parse_sexpr, SNode};

/// Millimetres per mil
pub const MM_PER_MIL: f64 = 0.0254;

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Unit suffix of a constraint value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueUnit {
    Millimeters,
    Mils,
    Inches,
}

impl ValueUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            ValueUnit::Millimeters => "mm",
            ValueUnit::Mils => "mil",
            ValueUnit::Inches => "in",
        }
    }

    pub fn mm_factor(self) -> f64 {
        match self {
            ValueUnit::Millimeters => 1.0,
            ValueUnit::Mils => MM_PER_MIL,
            ValueUnit::Inches => MM_PER_INCH,
        }
    }
}

/// Reads `0.2mm`, `5mil`, `0.01in` or a bare number (millimetres)
pub fn parse_value_mm(value: &str) -> Result<f64> {
    let (number, unit) = if let Some(n) = value.strip_suffix("mm") {
        (n, ValueUnit::Millimeters)
    } else if let Some(n) = value.strip_suffix("mil") {
        (n, ValueUnit::Mils)
    } else if let Some(n) = value.strip_suffix("in") {
        (n, ValueUnit::Inches)
    } else {
        (value, ValueUnit::Millimeters)
    };

    let parsed: f64 = number.trim().parse().map_err(|_| DrcError::InvalidValue {
        value: value.to_string(),
        message: "expected a number with optional mm/mil/in suffix".to_string(),
    })?;
    Ok(parsed * unit.mm_factor())
}

/// Renders a millimetre value in `unit` with its suffix
pub fn format_value(mm: f64, unit: ValueUnit) -> String {
    format!("{}{}", mm / unit.mm_factor(), unit.suffix())
}

/// Parses a `.kicad_dru` document
pub fn parse_dru(content: &str) -> Result<DrcRuleSet> {
    let nodes = parse_sexpr(content)?;
    let mut rule_set = DrcRuleSet::default();

    for node in &nodes {
        match node.tag() {
            "version" => {
                let raw = node.atom_at(1);
                rule_set.version = raw.parse().map_err(|_| DrcError::InvalidValue {
                    value: raw.to_string(),
                    message: "version must be an unsigned integer".to_string(),
                })?;
            }
            "rule" => {
                rule_set.add_rule(parse_rule(node)?);
            }
            other => log::debug!("[DRC] Ignoring top-level form '{other}'"),
        }
    }

    Ok(rule_set)
}

fn parse_rule(node: &SNode) -> Result<DrcRule> {
    let mut rule = DrcRule::new(node.atom_at(1));

    for child in node.args().iter().skip(1) {
        match child.tag() {
            "constraint" => rule.add_constraint(parse_constraint(child)?),
            "severity" => rule.severity = Severity::from_kicad_name(child.atom_at(1)),
            "layer" => rule.layer = Some(LayerSelector::new(child.atom_at(1))),
            "condition" => rule.condition = Some(child.atom_at(1).to_string()),
            _ => {}
        }
    }

    Ok(rule)
}

fn parse_constraint(node: &SNode) -> Result<DrcConstraint> {
    let kind = ConstraintKind::from_kicad_name(node.atom_at(1))?;

    if kind == ConstraintKind::Disallow {
        // (constraint disallow buried_via)
        let tag = node
            .args()
            .get(1)
            .and_then(SNode::as_atom)
            .map(str::to_string);
        return Ok(DrcConstraint::disallow(tag));
    }

    let mut min_mm = None;
    let mut max_mm = None;
    for sub in node.args().iter().skip(1) {
        match sub.tag() {
            "min" => min_mm = Some(parse_value_mm(sub.atom_at(1))?),
            "max" => max_mm = Some(parse_value_mm(sub.atom_at(1))?),
            // opt and unknown sub-forms are accepted but unused
            _ => {}
        }
    }

    Ok(DrcConstraint::new(kind, min_mm, max_mm))
}

/// Writes a rule set back out as `.kicad_dru` text, values in `unit`
pub fn write_dru(rule_set: &DrcRuleSet, unit: ValueUnit) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "(version {})", rule_set.version);

    for rule in &rule_set.rules {
        let _ = writeln!(out, "(rule {}", quote(&rule.name));
        if rule.severity != Severity::Error {
            let _ = writeln!(out, "    (severity {})", rule.severity.to_string().to_lowercase());
        }
        if let Some(layer) = &rule.layer {
            let _ = writeln!(out, "    (layer {})", layer.expression());
        }
        if let Some(cond) = &rule.condition {
            let _ = writeln!(out, "    (condition {})", quote(cond));
        }
        for c in &rule.constraints {
            let _ = write!(out, "    (constraint {}", c.kind);
            if let Some(tag) = &c.disallow {
                let _ = write!(out, " {tag}");
            }
            if let Some(min) = c.min_mm {
                let _ = write!(out, " (min {})", format_value(min, unit));
            }
            if let Some(max) = c.max_mm {
                let _ = write!(out, " (max {})", format_value(max, unit));
            }
            out.push_str(")\n");
        }
        out.push_str(")\n");
    }
    out
}

fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
