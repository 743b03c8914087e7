use crate::drc::board::{DrcBoardInput, EDGE_CUTS};
use crate::drc::geometry::{convert_layer, geometry_distance, SpatialIndex};
use crate::drc::report::DrcViolation;
use crate::drc::rules::{ConstraintKind, DrcConstraint, DrcRule};

use super::{selected_copper_layers, DrcCheck};

/// Copper to board outline (`Edge.Cuts`) spacing
///
/// Unlike copper clearance, copper touching the outline (distance 0) is
/// reported.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeClearanceCheck;

impl DrcCheck for EdgeClearanceCheck {
    fn supported_kind(&self) -> ConstraintKind {
        ConstraintKind::EdgeClearance
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
        let Some(edge_doc) = board.layer(EDGE_CUTS) else {
            return Vec::new();
        };

        let edges = convert_layer(edge_doc);
        if edges.is_empty() {
            return Vec::new();
        }
        let mut edge_index = SpatialIndex::from_geometries(&edges);
        let mut violations = Vec::new();

        for (layer_name, doc) in selected_copper_layers(rule, board) {
            let copper = convert_layer(doc);
            log::debug!(
                "[DRC] Edge clearance on {layer_name}: {} geometries against {} edges",
                copper.len(),
                edges.len()
            );

            for geom in &copper {
                for e in edge_index.query_neighbors(geom, min_clearance) {
                    let Some(nearest) = geometry_distance(geom, &edges[e]) else {
                        continue;
                    };
                    if nearest.distance >= 0.0 && nearest.distance < min_clearance {
                        violations.push(
                            DrcViolation::new(rule, constraint, "Edge clearance violation")
                                .measured(nearest.distance, min_clearance)
                                .at(nearest.midpoint())
                                .on_layer(layer_name),
                        );
                    }
                }
            }
        }

        violations
    }
}
