use crate::drc::board::DrcBoardInput;
use crate::drc::geometry::{midpoint, point_distance};
use crate::drc::report::DrcViolation;
use crate::drc::rules::{ConstraintKind, DrcConstraint, DrcRule};
use crate::model::DrillOperation;

use super::DrcCheck;

struct HitInfo {
    center: [f64; 2],
    radius: f64,
}

/// Edge-to-edge spacing of drill hits across all drill files
///
/// Overlapping hits (negative spacing) are not reported.
#[derive(Clone, Copy, Debug, Default)]
pub struct HoleToHoleCheck;

impl DrcCheck for HoleToHoleCheck {
    fn supported_kind(&self) -> ConstraintKind {
        ConstraintKind::HoleToHole
    }

    fn check(
        &self,
        rule: &DrcRule,
        constraint: &DrcConstraint,
        board: &DrcBoardInput,
    ) -> Vec<DrcViolation> {
        let Some(min_spacing) = constraint.min_mm else {
            return Vec::new();
        };

        let hits: Vec<HitInfo> = board
            .drills()
            .iter()
            .flat_map(|drill| {
                let uf = drill.unit_factor();
                drill.operations.iter().filter_map(move |op| match op {
                    DrillOperation::Hit { tool, x, y } => Some(HitInfo {
                        center: [x * uf, y * uf],
                        radius: tool.diameter * uf / 2.0,
                    }),
                    DrillOperation::Slot { .. } => None,
                })
            })
            .collect();

        let mut violations = Vec::new();
        for (i, h1) in hits.iter().enumerate() {
            for h2 in &hits[i + 1..] {
                let edge = point_distance(h1.center, h2.center) - h1.radius - h2.radius;
                if edge >= 0.0 && edge < min_spacing {
                    violations.push(
                        DrcViolation::new(rule, constraint, "Hole to hole spacing too small")
                            .measured(edge, min_spacing)
                            .at(midpoint(h1.center, h2.center)),
                    );
                }
            }
        }

        violations
    }
}
