//! Manufacturer tier ladders

use serde::Serialize;

use crate::error::{DrcError, Result};

/// One cost band of a manufacturer. `None` thresholds do not constrain.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ManufacturingTier {
    pub name: String,
    /// 0 = cheapest
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_trace_width_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_space_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_hole_size_mm: Option<f64>,
    pub description: String,
}

impl ManufacturingTier {
    pub fn new(name: impl Into<String>, order: i32, description: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DrcError::configuration("Tier name must not be blank"));
        }
        if order < 0 {
            return Err(DrcError::configuration(format!(
                "Tier order must be >= 0, got {order} for '{name}'"
            )));
        }
        Ok(Self {
            name,
            order,
            min_trace_width_mm: None,
            min_space_mm: None,
            min_hole_size_mm: None,
            description: description.into(),
        })
    }

    pub fn with_min_trace_width(mut self, mm: f64) -> Self {
        self.min_trace_width_mm = Some(mm);
        self
    }

    pub fn with_min_space(mut self, mm: f64) -> Self {
        self.min_space_mm = Some(mm);
        self
    }

    pub fn with_min_hole_size(mut self, mm: f64) -> Self {
        self.min_hole_size_mm = Some(mm);
        self
    }

    /// True when every given measurement meets this tier's threshold
    fn supports(&self, trace: Option<f64>, clearance: Option<f64>, hole: Option<f64>) -> bool {
        fn meets(measured: Option<f64>, threshold: Option<f64>) -> bool {
            match (measured, threshold) {
                (Some(m), Some(t)) => m >= t,
                _ => true,
            }
        }
        meets(trace, self.min_trace_width_mm)
            && meets(clearance, self.min_space_mm)
            && meets(hole, self.min_hole_size_mm)
    }
}

/// Tiers ordered from cheapest to most expensive
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ManufacturerProfile {
    name: String,
    tiers: Vec<ManufacturingTier>,
}

impl ManufacturerProfile {
    pub fn new(name: impl Into<String>, tiers: Vec<ManufacturingTier>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DrcError::configuration("Profile name must not be blank"));
        }
        if tiers.is_empty() {
            return Err(DrcError::configuration(format!(
                "Profile '{name}' must have at least one tier"
            )));
        }
        Ok(Self { name, tiers })
    }

    /// Built-in ladders, known to be valid
    pub(super) fn builtin(name: &str, tiers: Vec<ManufacturingTier>) -> Self {
        Self {
            name: name.to_string(),
            tiers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tiers(&self) -> &[ManufacturingTier] {
        &self.tiers
    }

    pub fn cheapest(&self) -> &ManufacturingTier {
        &self.tiers[0]
    }

    /// Cheapest tier accommodating every given minimum
    ///
    /// Falls back to the last (most expensive) tier when none does.
    pub fn classify(
        &self,
        min_trace_mm: Option<f64>,
        min_clearance_mm: Option<f64>,
        min_hole_mm: Option<f64>,
    ) -> &ManufacturingTier {
        self.tiers
            .iter()
            .find(|t| t.supports(min_trace_mm, min_clearance_mm, min_hole_mm))
            .unwrap_or_else(|| self.most_expensive())
    }

    pub fn classify_trace(&self, min_trace_mm: f64) -> &ManufacturingTier {
        self.classify(Some(min_trace_mm), None, None)
    }

    pub fn classify_clearance(&self, min_clearance_mm: f64) -> &ManufacturingTier {
        self.classify(None, Some(min_clearance_mm), None)
    }

    pub fn classify_hole(&self, min_hole_mm: f64) -> &ManufacturingTier {
        self.classify(None, None, Some(min_hole_mm))
    }

    /// The tier listed just before `current`; `None` at the cheapest or if unknown
    pub fn next_cheaper_tier(&self, current: &ManufacturingTier) -> Option<&ManufacturingTier> {
        let pos = self
            .tiers
            .iter()
            .skip(1)
            .position(|t| t.order == current.order)?;
        self.tiers.get(pos)
    }

    fn most_expensive(&self) -> &ManufacturingTier {
        &self.tiers[self.tiers.len() - 1]
    }
}
