use crate::drc::board::DrcBoardInput;
use crate::drc::report::DrcViolation;
use crate::drc::rules::{ConstraintKind, DrcConstraint, DrcRule};

use super::DrcCheck;

/// Drill diameters against min/max, hits and slots alike
#[derive(Clone, Copy, Debug, Default)]
pub struct HoleSizeCheck;

impl DrcCheck for HoleSizeCheck {
    fn supported_kind(&self) -> ConstraintKind {
        ConstraintKind::HoleSize
    }

    fn check(
        &self,
        rule: &DrcRule,
        constraint: &DrcConstraint,
        board: &DrcBoardInput,
    ) -> Vec<DrcViolation> {
        let mut violations = Vec::new();

        for drill in board.drills() {
            let uf = drill.unit_factor();

            for op in &drill.operations {
                let diameter = op.tool().diameter * uf;
                let center = op.center();
                let location = [center[0] * uf, center[1] * uf];

                if let Some(min) = constraint.min_mm.filter(|min| diameter < *min) {
                    violations.push(
                        DrcViolation::new(rule, constraint, "Hole size too small")
                            .measured(diameter, min)
                            .at(location),
                    );
                }
                if let Some(max) = constraint.max_mm.filter(|max| diameter > *max) {
                    violations.push(
                        DrcViolation::new(rule, constraint, "Hole size too large")
                            .measured(diameter, max)
                            .at(location),
                    );
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DrillDocument, Tool, Unit};

    fn rule() -> DrcRule {
        DrcRule::new("Holes").with_constraint(DrcConstraint::new(
            ConstraintKind::HoleSize,
            Some(0.15),
            Some(6.3),
        ))
    }

    fn board(drill: DrillDocument) -> DrcBoardInput {
        let mut board = DrcBoardInput::new();
        board.add_drill(drill);
        board
    }

    #[test]
    fn test_limits_are_inclusive() {
        let mut drill = DrillDocument::new(Unit::Millimeters);
        drill
            .add_hit(Tool::new(1, 0.15), 0.0, 0.0)
            .add_hit(Tool::new(2, 6.3), 10.0, 0.0)
            .add_hit(Tool::new(3, 0.149), 20.0, 0.0)
            .add_hit(Tool::new(4, 6.301), 30.0, 0.0);
        let rule = rule();
        let v = HoleSizeCheck.check(&rule, &rule.constraints[0], &board(drill));

        assert_eq!(v.len(), 2);
        assert_eq!(v[0].description, "Hole size too small");
        assert_eq!(v[0].x, 20.0);
        assert_eq!(v[1].description, "Hole size too large");
        assert!(v.iter().all(|v| v.layer.is_none()));
    }

    #[test]
    fn test_slot_located_at_midpoint_in_mm() {
        let mut drill = DrillDocument::new(Unit::Inches);
        drill.add_slot(Tool::new(1, 0.004), [0.0, 0.0], [1.0, 0.0]);
        let rule = rule();
        let v = HoleSizeCheck.check(&rule, &rule.constraints[0], &board(drill));

        assert_eq!(v.len(), 1);
        assert!((v[0].measured_mm.unwrap() - 0.1016).abs() < 1e-9);
        assert!((v[0].x - 12.7).abs() < 1e-9);
    }
}
