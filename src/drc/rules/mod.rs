//! Rule model: rule sets, rules, constraints and severities
//!
//! # Submodules
//! - `layer_selector` - `(layer ...)` pattern matching

mod layer_selector;

use std::fmt;

use serde::Serialize;

use crate::error::{DrcError, Result};

pub use layer_selector::{selector_matches, LayerSelector};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Ignore,
}

impl Severity {
    /// Unknown names fall back to `Error`
    pub fn from_kicad_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "warning" => Severity::Warning,
            "ignore" => Severity::Ignore,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Ignore => "IGNORE",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Clearance,
    TrackWidth,
    HoleSize,
    HoleToHole,
    EdgeClearance,
    AnnularWidth,
    SilkClearance,
    TextHeight,
    TextThickness,
    ViaDiameter,
    HoleClearance,
    Disallow,
}

impl ConstraintKind {
    pub const ALL: [ConstraintKind; 12] = [
        ConstraintKind::Clearance,
        ConstraintKind::TrackWidth,
        ConstraintKind::HoleSize,
        ConstraintKind::HoleToHole,
        ConstraintKind::EdgeClearance,
        ConstraintKind::AnnularWidth,
        ConstraintKind::SilkClearance,
        ConstraintKind::TextHeight,
        ConstraintKind::TextThickness,
        ConstraintKind::ViaDiameter,
        ConstraintKind::HoleClearance,
        ConstraintKind::Disallow,
    ];

    /// Keyword used in `(constraint <kind> ...)`
    pub fn kicad_name(self) -> &'static str {
        match self {
            ConstraintKind::Clearance => "clearance",
            ConstraintKind::TrackWidth => "track_width",
            ConstraintKind::HoleSize => "hole_size",
            ConstraintKind::HoleToHole => "hole_to_hole",
            ConstraintKind::EdgeClearance => "edge_clearance",
            ConstraintKind::AnnularWidth => "annular_width",
            ConstraintKind::SilkClearance => "silk_clearance",
            ConstraintKind::TextHeight => "text_height",
            ConstraintKind::TextThickness => "text_thickness",
            ConstraintKind::ViaDiameter => "via_diameter",
            ConstraintKind::HoleClearance => "hole_clearance",
            ConstraintKind::Disallow => "disallow",
        }
    }

    /// Case-insensitive lookup of a constraint keyword
    pub fn from_kicad_name(name: &str) -> Result<Self> {
        let lower = name.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.kicad_name() == lower)
            .ok_or_else(|| DrcError::UnknownConstraint(name.to_string()))
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kicad_name())
    }
}

/// One `(constraint ...)` clause; limits in millimetres
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DrcConstraint {
    pub kind: ConstraintKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_mm: Option<f64>,
    /// Item tag of a `disallow` constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disallow: Option<String>,
}

impl DrcConstraint {
    pub fn new(kind: ConstraintKind, min_mm: Option<f64>, max_mm: Option<f64>) -> Self {
        Self {
            kind,
            min_mm,
            max_mm,
            disallow: None,
        }
    }

    pub fn min(kind: ConstraintKind, min_mm: f64) -> Self {
        Self::new(kind, Some(min_mm), None)
    }

    pub fn disallow(tag: Option<String>) -> Self {
        Self {
            kind: ConstraintKind::Disallow,
            min_mm: None,
            max_mm: None,
            disallow: tag,
        }
    }
}

impl fmt::Display for DrcConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == ConstraintKind::Disallow {
            return write!(f, "disallow {}", self.disallow.as_deref().unwrap_or(""));
        }
        write!(f, "{}", self.kind)?;
        if let Some(min) = self.min_mm {
            write!(f, " min={min}mm")?;
        }
        if let Some(max) = self.max_mm {
            write!(f, " max={max}mm")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DrcRule {
    pub name: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<LayerSelector>,
    /// Condition expression, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub constraints: Vec<DrcConstraint>,
}

impl DrcRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            severity: Severity::Error,
            layer: None,
            condition: None,
            constraints: Vec::new(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(LayerSelector::new(layer));
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_constraint(mut self, constraint: DrcConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn add_constraint(&mut self, constraint: DrcConstraint) {
        self.constraints.push(constraint);
    }

    pub fn matches_layer(&self, layer: &str) -> bool {
        selector_matches(self.layer.as_ref(), layer)
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }
}

impl fmt::Display for DrcRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DrcRule{{name='{}', constraints={}",
            self.name,
            self.constraints.len()
        )?;
        if let Some(cond) = &self.condition {
            write!(f, ", condition='{cond}'")?;
        }
        write!(f, "}}")
    }
}

/// Ordered rules plus the declared format version
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DrcRuleSet {
    pub version: u32,
    pub rules: Vec<DrcRule>,
}

impl DrcRuleSet {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            rules: Vec::new(),
        }
    }

    pub fn add_rule(&mut self, rule: DrcRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn with_rule(mut self, rule: DrcRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule(&self, name: &str) -> Option<&DrcRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for DrcRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DrcRuleSet{{version={}, rules={}}}",
            self.version,
            self.rules.len()
        )
    }
}
