//! Tier classification and widening suggestions

use std::fmt;

use serde::Serialize;

use crate::drc::board::DrcBoardInput;
use crate::error::{DrcError, Result};

use super::profile::{ManufacturerProfile, ManufacturingTier};
use super::scanner::{BoardProfile, BoardProfileScanner, FeatureBucket};

/// Board feature a tier constrains
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FeatureParameter {
    TraceWidth,
    Clearance,
    HoleSize,
}

impl FeatureParameter {
    pub fn name(self) -> &'static str {
        match self {
            FeatureParameter::TraceWidth => "Trace Width",
            FeatureParameter::Clearance => "Clearance",
            FeatureParameter::HoleSize => "Hole Size",
        }
    }

    /// The tier's threshold for this parameter
    pub fn threshold(self, tier: &ManufacturingTier) -> Option<f64> {
        match self {
            FeatureParameter::TraceWidth => tier.min_trace_width_mm,
            FeatureParameter::Clearance => tier.min_space_mm,
            FeatureParameter::HoleSize => tier.min_hole_size_mm,
        }
    }

    fn distribution(self, profile: &BoardProfile) -> &[FeatureBucket] {
        match self {
            FeatureParameter::TraceWidth => &profile.trace_width_distribution,
            FeatureParameter::Clearance => profile.clearance_distribution.as_deref().unwrap_or_default(),
            FeatureParameter::HoleSize => &profile.hole_size_distribution,
        }
    }

    fn total_features(self, profile: &BoardProfile) -> usize {
        match self {
            FeatureParameter::TraceWidth => profile.trace_count,
            FeatureParameter::Clearance => profile.clearance_pair_count,
            FeatureParameter::HoleSize => profile.hole_count,
        }
    }
}

impl fmt::Display for FeatureParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TierClassification {
    pub parameter: FeatureParameter,
    pub current_tier: ManufacturingTier,
    pub measured_min_mm: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier_threshold_mm: Option<f64>,
}

/// Features that, once widened, let the board drop one tier for a parameter
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OptimizationSuggestion {
    pub parameter: FeatureParameter,
    pub current_tier: ManufacturingTier,
    pub target_tier: ManufacturingTier,
    pub current_min_mm: f64,
    pub target_min_mm: f64,
    pub features_below_target: usize,
    pub total_features: usize,
    pub impact: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CostAdvisorReport {
    pub manufacturer: String,
    pub board_profile: BoardProfile,
    pub overall_tier: ManufacturingTier,
    pub classifications: Vec<TierClassification>,
    pub suggestions: Vec<OptimizationSuggestion>,
}

impl CostAdvisorReport {
    pub fn has_optimizations(&self) -> bool {
        !self.suggestions.is_empty()
    }

    pub fn classification(&self, parameter: FeatureParameter) -> Option<&TierClassification> {
        self.classifications.iter().find(|c| c.parameter == parameter)
    }

    pub fn suggestion(&self, parameter: FeatureParameter) -> Option<&OptimizationSuggestion> {
        self.suggestions.iter().find(|s| s.parameter == parameter)
    }
}

impl fmt::Display for CostAdvisorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cost Advisor Report:")?;
        writeln!(f, "  Manufacturer: {}", self.manufacturer)?;
        writeln!(f, "  Copper layers: {}", self.board_profile.copper_layer_count)?;
        writeln!(
            f,
            "  Overall tier: {} ({})",
            self.overall_tier.name, self.overall_tier.description
        )?;

        writeln!(f, "\n  Classifications:")?;
        for c in &self.classifications {
            write!(
                f,
                "  - {}: {} (measured min: {:.4}mm",
                c.parameter, c.current_tier.name, c.measured_min_mm
            )?;
            if let Some(threshold) = c.tier_threshold_mm {
                write!(f, ", tier threshold: {threshold:.4}mm")?;
            }
            writeln!(f, ")")?;
        }

        if self.suggestions.is_empty() {
            return writeln!(
                f,
                "\n  No optimization suggestions, board is already at the cheapest tier."
            );
        }

        writeln!(f, "\n  Optimization suggestions:")?;
        for s in &self.suggestions {
            writeln!(
                f,
                "  - {}: {} -> {} (widen {} of {} features from {:.4}mm to >= {:.4}mm)",
                s.parameter,
                s.current_tier.name,
                s.target_tier.name,
                s.features_below_target,
                s.total_features,
                s.current_min_mm,
                s.target_min_mm
            )?;
            writeln!(f, "    Impact: {}", s.impact)?;
        }
        Ok(())
    }
}

/// Scans a board, classifies it against a manufacturer's tiers and
/// suggests what to widen to reach a cheaper tier
///
/// ```ignore
/// let report = CostAdvisor::new()
///     .with_profile(builtin_profiles::nextpcb_2_layer())
///     .with_clearance_analysis(false)
///     .analyze(&board)?;
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CostAdvisor<'a> {
    profile: Option<&'a ManufacturerProfile>,
    clearance_analysis: bool,
}

impl<'a> CostAdvisor<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, profile: &'a ManufacturerProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_clearance_analysis(mut self, enabled: bool) -> Self {
        self.clearance_analysis = enabled;
        self
    }

    /// Fails only when no profile was set
    pub fn analyze(&self, board: &DrcBoardInput) -> Result<CostAdvisorReport> {
        let profile = self.profile.ok_or_else(|| {
            DrcError::configuration("ManufacturerProfile must be set before analysis")
        })?;

        let board_profile = BoardProfileScanner::new()
            .with_clearance_analysis(self.clearance_analysis)
            .with_tier_boundaries(profile)
            .scan(board);

        let measured = [
            (
                FeatureParameter::TraceWidth,
                board_profile.min_trace_width_mm.filter(|_| board_profile.trace_count > 0),
            ),
            (FeatureParameter::Clearance, board_profile.min_clearance_mm),
            (
                FeatureParameter::HoleSize,
                board_profile.min_hole_size_mm.filter(|_| board_profile.hole_count > 0),
            ),
        ];

        let mut overall = profile.cheapest();
        let mut classifications = Vec::new();
        for (parameter, min) in measured {
            let Some(min) = min else {
                continue;
            };
            let tier = classify(profile, parameter, min);
            if tier.order > overall.order {
                overall = tier;
            }
            classifications.push(TierClassification {
                parameter,
                current_tier: tier.clone(),
                measured_min_mm: min,
                tier_threshold_mm: parameter.threshold(tier),
            });
        }

        let suggestions = classifications
            .iter()
            .filter_map(|c| suggest(profile, &board_profile, c))
            .collect();

        log::info!(
            "[Advisor] {}: overall tier {} ({} classifications)",
            profile.name(),
            overall.name,
            classifications.len()
        );

        Ok(CostAdvisorReport {
            manufacturer: profile.name().to_string(),
            overall_tier: overall.clone(),
            board_profile,
            classifications,
            suggestions,
        })
    }
}

fn classify(profile: &ManufacturerProfile, parameter: FeatureParameter, min: f64) -> &ManufacturingTier {
    match parameter {
        FeatureParameter::TraceWidth => profile.classify_trace(min),
        FeatureParameter::Clearance => profile.classify_clearance(min),
        FeatureParameter::HoleSize => profile.classify_hole(min),
    }
}

fn suggest(
    profile: &ManufacturerProfile,
    board_profile: &BoardProfile,
    classification: &TierClassification,
) -> Option<OptimizationSuggestion> {
    let parameter = classification.parameter;
    let cheaper = profile.next_cheaper_tier(&classification.current_tier)?;
    let target = parameter.threshold(cheaper).filter(|t| *t > 0.0)?;

    let below = count_features_below(parameter.distribution(board_profile), target);
    if below == 0 {
        return None;
    }

    let impact = format!(
        "Widening {below} {} feature{} to >= {target:.4}mm would drop from {} to {} tier",
        parameter.name().to_lowercase(),
        if below == 1 { "" } else { "s" },
        classification.current_tier.name,
        cheaper.name
    );

    Some(OptimizationSuggestion {
        parameter,
        current_tier: classification.current_tier.clone(),
        target_tier: cheaper.clone(),
        current_min_mm: classification.measured_min_mm,
        target_min_mm: target,
        features_below_target: below,
        total_features: parameter.total_features(board_profile),
        impact,
    })
}

/// Buckets below `threshold`, counting a straddling bucket in full
fn count_features_below(distribution: &[FeatureBucket], threshold: f64) -> usize {
    distribution
        .iter()
        .filter(|b| b.lower_mm < threshold)
        .map(|b| b.count)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::builtin::nextpcb_2_layer;
    use crate::model::{Aperture, DrillDocument, GerberDocument, GraphicsObject, Tool, Unit};

    fn board(trace_widths: &[(f64, usize)], holes: &[(f64, usize)]) -> DrcBoardInput {
        let mut copper = GerberDocument::new(Unit::Millimeters);
        let mut y = 0.0;
        for &(w, n) in trace_widths {
            for _ in 0..n {
                copper.add_object(GraphicsObject::draw(
                    [0.0, y],
                    [10.0, y],
                    Aperture::Circle { diameter: w },
                ));
                y += 1.0;
            }
        }

        let mut drill = DrillDocument::new(Unit::Millimeters);
        for (t, &(d, n)) in holes.iter().enumerate() {
            for i in 0..n {
                drill.add_hit(Tool::new(t as u32 + 1, d), i as f64, 0.0);
            }
        }

        let mut board = DrcBoardInput::new();
        board.add_gerber_layer("F.Cu", copper).add_drill(drill);
        board
    }

    fn analyze(board: &DrcBoardInput) -> CostAdvisorReport {
        CostAdvisor::new()
            .with_profile(nextpcb_2_layer())
            .analyze(board)
            .unwrap()
    }

    #[test]
    fn test_standard_board_has_no_suggestions() {
        let report = analyze(&board(&[(0.2, 1)], &[(0.5, 1)]));
        assert_eq!(report.overall_tier.name, "Standard");
        assert!(!report.has_optimizations());
        assert_eq!(report.classifications.len(), 2);
        assert!(report.to_string().contains("already at the cheapest tier"));
    }

    #[test]
    fn test_few_narrow_traces_suggest_widening() {
        let report = analyze(&board(&[(0.114, 3), (0.2, 500)], &[(0.5, 1)]));
        assert_eq!(report.overall_tier.name, "Advanced");

        let s = report.suggestion(FeatureParameter::TraceWidth).unwrap();
        assert_eq!(s.target_tier.name, "Standard");
        assert_eq!(s.features_below_target, 3);
        assert_eq!(s.total_features, 503);
        assert_eq!(
            s.impact,
            "Widening 3 trace width features to >= 0.1270mm would drop from Advanced to Standard tier"
        );
    }

    #[test]
    fn test_small_holes_are_the_bottleneck() {
        let report = analyze(&board(&[(0.2, 1)], &[(0.25, 1), (0.5, 20)]));
        assert_eq!(report.overall_tier.name, "Advanced");
        let holes = report.classification(FeatureParameter::HoleSize).unwrap();
        assert_eq!(holes.current_tier.name, "Advanced");
        assert_eq!(holes.tier_threshold_mm, Some(0.2));

        let s = report.suggestion(FeatureParameter::HoleSize).unwrap();
        assert_eq!(s.features_below_target, 1);
        assert!(s.impact.contains("1 hole size feature to"));
    }

    #[test]
    fn test_report_rendering() {
        let text = analyze(&board(&[(0.114, 1)], &[(0.5, 1)])).to_string();
        assert!(text.starts_with("Cost Advisor Report:\n"));
        assert!(text.contains("  Manufacturer: NextPCB 2-Layer\n"));
        assert!(text.contains("  Overall tier: Advanced ("));
        assert!(text.contains("  - Trace Width: Advanced (measured min: 0.1140mm, tier threshold: 0.1016mm)"));
        assert!(text.contains("    Impact: Widening 1 trace width feature to"));
    }

    #[test]
    fn test_missing_profile_is_configuration_error() {
        let err = CostAdvisor::new().analyze(&DrcBoardInput::new()).unwrap_err();
        assert!(matches!(err, DrcError::Configuration(_)));
    }

    #[test]
    fn test_straddling_bucket_counted_in_full() {
        let buckets = [
            FeatureBucket { lower_mm: 0.0, upper_mm: 0.1, count: 2, label: String::new() },
            FeatureBucket { lower_mm: 0.1, upper_mm: 0.2, count: 5, label: String::new() },
            FeatureBucket { lower_mm: 0.2, upper_mm: f64::MAX, count: 7, label: String::new() },
        ];
        assert_eq!(count_features_below(&buckets, 0.15), 7);
        assert_eq!(count_features_below(&buckets, 0.2), 7);
        assert_eq!(count_features_below(&buckets, 0.05), 2);
    }
}
