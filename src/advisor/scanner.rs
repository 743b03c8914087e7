//! Statistical scan of a board's manufacturing-relevant features

use serde::Serialize;

use crate::drc::board::DrcBoardInput;
use crate::drc::checks::{layer_pair_distances, track_width_mm};
use crate::drc::geometry::convert_layer;
use crate::model::GraphicsObject;

use super::profile::{ManufacturerProfile, ManufacturingTier};

/// Trace and clearance bucket edges used without a tier profile (4, 5, 6, 8 mil)
pub const DEFAULT_TRACE_BOUNDARIES_MM: [f64; 4] = [0.1016, 0.127, 0.1524, 0.2032];
pub const DEFAULT_HOLE_BOUNDARIES_MM: [f64; 3] = [0.15, 0.2, 0.3];
/// Lower bound on the clearance search distance
pub const MIN_CLEARANCE_SEARCH_MM: f64 = 0.5;

/// Histogram bucket `[lower_mm, upper_mm)`; the last bucket is open-ended
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureBucket {
    pub lower_mm: f64,
    pub upper_mm: f64,
    pub count: usize,
    pub label: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BoardProfile {
    pub copper_layer_count: usize,

    pub trace_count: usize,
    pub min_trace_width_mm: Option<f64>,
    pub min_trace_width_layer: Option<String>,
    pub trace_width_distribution: Vec<FeatureBucket>,

    /// Only filled in when clearance analysis is enabled
    pub clearance_pair_count: usize,
    pub min_clearance_mm: Option<f64>,
    pub min_clearance_layer: Option<String>,
    pub clearance_distribution: Option<Vec<FeatureBucket>>,

    pub hole_count: usize,
    pub min_hole_size_mm: Option<f64>,
    pub hole_size_distribution: Vec<FeatureBucket>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BoardProfileScanner<'a> {
    clearance_analysis: bool,
    tier_profile: Option<&'a ManufacturerProfile>,
}

impl<'a> BoardProfileScanner<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairwise copper clearance scan; off by default as it is the slow part
    pub fn with_clearance_analysis(mut self, enabled: bool) -> Self {
        self.clearance_analysis = enabled;
        self
    }

    /// Bucket histograms at the profile's tier thresholds
    pub fn with_tier_boundaries(mut self, profile: &'a ManufacturerProfile) -> Self {
        self.tier_profile = Some(profile);
        self
    }

    pub fn scan(&self, board: &DrcBoardInput) -> BoardProfile {
        let mut profile = BoardProfile {
            copper_layer_count: board.copper_layer_count(),
            ..BoardProfile::default()
        };

        self.scan_trace_widths(board, &mut profile);
        self.scan_hole_sizes(board, &mut profile);
        if self.clearance_analysis {
            self.scan_clearances(board, &mut profile);
        }

        profile
    }

    fn scan_trace_widths(&self, board: &DrcBoardInput, profile: &mut BoardProfile) {
        let mut widths = Vec::new();

        for (layer_name, doc) in board.copper_layers() {
            let uf = doc.unit_factor();
            for obj in &doc.objects {
                let GraphicsObject::Draw { aperture, .. } = obj else {
                    continue;
                };
                let width = track_width_mm(aperture, uf);
                if width <= 0.0 {
                    continue;
                }
                widths.push(width);
                if profile.min_trace_width_mm.map_or(true, |min| width < min) {
                    profile.min_trace_width_mm = Some(width);
                    profile.min_trace_width_layer = Some(layer_name.to_string());
                }
            }
        }

        profile.trace_count = widths.len();
        profile.trace_width_distribution = build_distribution(&widths, &self.trace_boundaries());
    }

    fn scan_hole_sizes(&self, board: &DrcBoardInput, profile: &mut BoardProfile) {
        let diameters: Vec<f64> = board
            .drills()
            .iter()
            .flat_map(|drill| {
                let uf = drill.unit_factor();
                drill.operations.iter().map(move |op| op.tool().diameter * uf)
            })
            .collect();

        profile.hole_count = diameters.len();
        profile.min_hole_size_mm = diameters.iter().copied().reduce(f64::min);
        profile.hole_size_distribution = build_distribution(&diameters, &self.hole_boundaries());
    }

    fn scan_clearances(&self, board: &DrcBoardInput, profile: &mut BoardProfile) {
        let search = self.clearance_search_distance();
        let mut clearances = Vec::new();

        for (layer_name, doc) in board.copper_layers() {
            let geoms = convert_layer(doc);
            if geoms.len() < 2 {
                continue;
            }
            log::debug!(
                "[Advisor] Clearance scan on {layer_name}: {} geometries, search {search}mm",
                geoms.len()
            );

            for pair in layer_pair_distances(&geoms, search) {
                let d = pair.nearest.distance;
                if d <= 0.0 || d > search {
                    continue;
                }
                clearances.push(d);
                if profile.min_clearance_mm.map_or(true, |min| d < min) {
                    profile.min_clearance_mm = Some(d);
                    profile.min_clearance_layer = Some(layer_name.to_string());
                }
            }
        }

        profile.clearance_pair_count = clearances.len();
        profile.clearance_distribution = Some(build_distribution(&clearances, &self.trace_boundaries()));
    }

    fn trace_boundaries(&self) -> Vec<f64> {
        self.tier_boundaries(|t| t.min_trace_width_mm)
            .unwrap_or_else(|| DEFAULT_TRACE_BOUNDARIES_MM.to_vec())
    }

    fn hole_boundaries(&self) -> Vec<f64> {
        self.tier_boundaries(|t| t.min_hole_size_mm)
            .unwrap_or_else(|| DEFAULT_HOLE_BOUNDARIES_MM.to_vec())
    }

    fn tier_boundaries(
        &self,
        threshold: impl Fn(&ManufacturingTier) -> Option<f64>,
    ) -> Option<Vec<f64>> {
        let bounds: Vec<f64> = self
            .tier_profile?
            .tiers()
            .iter()
            .filter_map(threshold)
            .collect();
        (!bounds.is_empty()).then_some(bounds)
    }

    fn clearance_search_distance(&self) -> f64 {
        self.trace_boundaries()
            .into_iter()
            .fold(MIN_CLEARANCE_SEARCH_MM, f64::max)
    }
}

/// Histogram of `measurements` split at `boundaries`
///
/// Boundaries are sorted and deduplicated into buckets `[0, b0)`, `[b0, b1)`,
/// ... `[bN, inf)`. Empty buckets are omitted; no measurements gives no
/// buckets.
pub fn build_distribution(measurements: &[f64], boundaries: &[f64]) -> Vec<FeatureBucket> {
    if measurements.is_empty() {
        return Vec::new();
    }

    let mut sorted = boundaries.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();

    let mut counts = vec![0usize; sorted.len() + 1];
    for &value in measurements {
        let bucket = sorted.iter().position(|b| value < *b).unwrap_or(sorted.len());
        counts[bucket] += 1;
    }

    let last = sorted.len();
    counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(i, &count)| {
            let lower_mm = if i == 0 { 0.0 } else { sorted[i - 1] };
            let upper_mm = if i == last { f64::MAX } else { sorted[i] };
            let label = if last == 0 {
                "all".to_string()
            } else if i == 0 {
                format!("< {:.4}mm", sorted[0])
            } else if i == last {
                format!(">= {:.4}mm", sorted[last - 1])
            } else {
                format!("{:.4}mm - {:.4}mm", sorted[i - 1], sorted[i])
            };
            FeatureBucket {
                lower_mm,
                upper_mm,
                count,
                label,
            }
        })
        .collect()
}
