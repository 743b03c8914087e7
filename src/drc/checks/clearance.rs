use crate::drc::board::DrcBoardInput;
use crate::drc::geometry::{convert_layer, geometry_distance, Geometry, Nearest, SpatialIndex};
use crate::drc::report::DrcViolation;
use crate::drc::rules::{ConstraintKind, DrcConstraint, DrcRule};

use super::{selected_copper_layers, DrcCheck};

/// Exact distance between two geometries of one layer, `first < second`
#[derive(Clone, Copy, Debug)]
pub struct PairDistance {
    pub first: usize,
    pub second: usize,
    pub nearest: Nearest,
}

/// Distances of every pair whose envelopes come within `search` of each other
///
/// Each unordered pair appears at most once, in ascending `(first, second)`
/// order. Callers filter on `nearest.distance`.
pub fn layer_pair_distances(geoms: &[Geometry], search: f64) -> Vec<PairDistance> {
    let mut index = SpatialIndex::from_geometries(geoms);
    let mut pairs = Vec::new();

    for (i, geom) in geoms.iter().enumerate() {
        for j in index.query_neighbors(geom, search) {
            // Only check each pair once (i < j)
            if j <= i {
                continue;
            }
            if let Some(nearest) = geometry_distance(geom, &geoms[j]) {
                pairs.push(PairDistance {
                    first: i,
                    second: j,
                    nearest,
                });
            }
        }
    }

    pairs
}

/// Copper-to-copper spacing on each selected layer
///
/// Touching or overlapping shapes (distance 0) are not clearance violations.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClearanceCheck;

impl DrcCheck for ClearanceCheck {
    fn supported_kind(&self) -> ConstraintKind {
        ConstraintKind::Clearance
    }

    fn check(
        &self,
        rule: &DrcRule,
        constraint: &DrcConstraint,
        board: &DrcBoardInput,
    ) -> Vec<DrcViolation> {
        let Some(min_clearance) = constraint.min_mm else {
            return Vec::new();
        };
        let mut violations = Vec::new();

        for (layer_name, doc) in selected_copper_layers(rule, board) {
            let geoms = convert_layer(doc);
            log::debug!("[DRC] Clearance on {layer_name}: {} geometries", geoms.len());
            if geoms.len() < 2 {
                continue;
            }

            for pair in layer_pair_distances(&geoms, min_clearance) {
                let d = pair.nearest.distance;
                if d > 0.0 && d < min_clearance {
                    violations.push(
                        DrcViolation::new(rule, constraint, "Clearance violation")
                            .measured(d, min_clearance)
                            .at(pair.nearest.midpoint())
                            .on_layer(layer_name),
                    );
                }
            }
        }

        violations
    }
}
