//! DRC results: violations and the per-run report

use std::fmt;

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::rules::{DrcConstraint, DrcRule, Severity};

/// One finding of a check, all lengths in millimetres
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DrcViolation {
    pub rule_name: String,
    pub constraint: DrcConstraint,
    pub severity: Severity,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measured_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_mm: Option<f64>,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

impl DrcViolation {
    /// Violation of `constraint` under `rule`, severity taken from the rule
    pub fn new(rule: &DrcRule, constraint: &DrcConstraint, description: impl Into<String>) -> Self {
        Self {
            rule_name: rule.name.clone(),
            constraint: constraint.clone(),
            severity: rule.severity,
            description: description.into(),
            measured_mm: None,
            required_mm: None,
            x: 0.0,
            y: 0.0,
            layer: None,
        }
    }

    pub fn measured(mut self, measured_mm: f64, required_mm: f64) -> Self {
        self.measured_mm = Some(measured_mm);
        self.required_mm = Some(required_mm);
        self
    }

    pub fn at(mut self, point: [f64; 2]) -> Self {
        self.x = point[0];
        self.y = point[1];
        self
    }

    pub fn on_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    fn to_summary_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("severity".into(), json!(self.severity.to_string()));
        obj.insert("rule".into(), json!(self.rule_name));
        obj.insert("description".into(), json!(self.description));
        if let Some(m) = self.measured_mm {
            obj.insert("measured".into(), json!(round4(m)));
        }
        if let Some(r) = self.required_mm {
            obj.insert("required".into(), json!(round4(r)));
        }
        obj.insert("x".into(), json!(round4(self.x)));
        obj.insert("y".into(), json!(round4(self.y)));
        if let Some(layer) = &self.layer {
            obj.insert("layer".into(), json!(layer));
        }
        Value::Object(obj)
    }
}

fn round4(v: f64) -> f64 {
    (v * 1e4).round() / 1e4
}

impl fmt::Display for DrcViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.rule_name, self.description)?;
        if let (Some(m), Some(r)) = (self.measured_mm, self.required_mm) {
            write!(f, " (measured={m:.4}mm, required={r:.4}mm)")?;
        }
        write!(f, " at ({:.4}, {:.4})", self.x, self.y)?;
        if let Some(layer) = &self.layer {
            write!(f, " on {layer}")?;
        }
        Ok(())
    }
}

/// Violations in production order plus rules skipped for their condition
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DrcReport {
    violations: Vec<DrcViolation>,
    skipped_rules: Vec<DrcRule>,
}

impl DrcReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_violation(&mut self, violation: DrcViolation) {
        self.violations.push(violation);
    }

    pub fn extend_violations(&mut self, violations: impl IntoIterator<Item = DrcViolation>) {
        self.violations.extend(violations);
    }

    pub fn add_skipped_rule(&mut self, rule: DrcRule) {
        self.skipped_rules.push(rule);
    }

    pub fn violations(&self) -> &[DrcViolation] {
        &self.violations
    }

    pub fn errors(&self) -> Vec<&DrcViolation> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&DrcViolation> {
        self.with_severity(Severity::Warning)
    }

    fn with_severity(&self, severity: Severity) -> Vec<&DrcViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == Severity::Error)
    }

    pub fn skipped_rules(&self) -> &[DrcRule] {
        &self.skipped_rules
    }

    /// Violations attributed to the rule named `name`
    pub fn violations_for_rule<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DrcViolation> {
        self.violations.iter().filter(move |v| v.rule_name == name)
    }

    /// Summary consumed by the viewer front-end
    pub fn to_json(&self) -> Value {
        json!({
            "errors": self.errors().len(),
            "warnings": self.warnings().len(),
            "skipped": self.skipped_rules.len(),
            "violations": self.violations.iter().map(DrcViolation::to_summary_json).collect::<Vec<_>>(),
            "skippedRules": self.skipped_rules.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        })
    }
}

impl fmt::Display for DrcReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DRC Report:")?;
        writeln!(
            f,
            "  Violations: {} ({} errors, {} warnings)",
            self.violations.len(),
            self.errors().len(),
            self.warnings().len()
        )?;
        writeln!(f, "  Skipped rules: {}", self.skipped_rules.len())?;
        for v in &self.violations {
            writeln!(f, "  - {v}")?;
        }
        if !self.skipped_rules.is_empty() {
            writeln!(f, "  Skipped:")?;
            for rule in &self.skipped_rules {
                write!(f, "  - {}", rule.name)?;
                if let Some(cond) = &rule.condition {
                    write!(f, " (condition: {cond})")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drc::rules::ConstraintKind;

    fn sample() -> DrcReport {
        let rule = DrcRule::new("Trace").with_constraint(DrcConstraint::min(ConstraintKind::TrackWidth, 0.127));
        let warn = DrcRule::new("Soft").with_severity(Severity::Warning);
        let constraint = rule.constraints[0].clone();

        let mut report = DrcReport::new();
        report.add_violation(
            DrcViolation::new(&rule, &constraint, "Track width too small")
                .measured(0.1, 0.127)
                .at([5.0, 2.5])
                .on_layer("F.Cu"),
        );
        report.add_violation(DrcViolation::new(&warn, &constraint, "Hole size too small").at([1.0, 1.0]));
        report.add_skipped_rule(DrcRule::new("Nets").with_condition("A.Net == 'GND'"));
        report
    }

    #[test]
    fn test_severity_filters() {
        let report = sample();
        assert_eq!(report.violations().len(), 2);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.warnings().len(), 1);
        assert!(report.has_errors());
        assert_eq!(report.violations_for_rule("Soft").count(), 1);
        assert!(!DrcReport::new().has_errors());
    }

    #[test]
    fn test_violation_display() {
        let report = sample();
        assert_eq!(
            report.violations()[0].to_string(),
            "[ERROR] Trace: Track width too small (measured=0.1000mm, required=0.1270mm) at (5.0000, 2.5000) on F.Cu"
        );
        assert_eq!(
            report.violations()[1].to_string(),
            "[WARNING] Soft: Hole size too small at (1.0000, 1.0000)"
        );
    }

    #[test]
    fn test_report_display() {
        let text = sample().to_string();
        assert!(text.starts_with("DRC Report:\n  Violations: 2 (1 errors, 1 warnings)\n"));
        assert!(text.contains("  Skipped rules: 1\n"));
        assert!(text.contains("  - Nets (condition: A.Net == 'GND')\n"));
    }

    #[test]
    fn test_json_summary() {
        let json = sample().to_json();
        assert_eq!(json["errors"], 1);
        assert_eq!(json["warnings"], 1);
        assert_eq!(json["skipped"], 1);
        assert_eq!(json["skippedRules"][0], "Nets");
        let first = &json["violations"][0];
        assert_eq!(first["severity"], "ERROR");
        assert_eq!(first["rule"], "Trace");
        assert_eq!(first["measured"], 0.1);
        assert_eq!(first["layer"], "F.Cu");
        assert!(json["violations"][1].get("layer").is_none());
        assert!(json["violations"][1].get("measured").is_none());
    }
}
