use crate::drc::board::DrcBoardInput;
use crate::drc::condition::{ConditionEvaluator, ConditionResult};
use crate::drc::geometry::midpoint;
use crate::drc::report::DrcViolation;
use crate::drc::rules::{ConstraintKind, DrcConstraint, DrcRule};
use crate::model::{Aperture, GraphicsObject};

use super::{selected_copper_layers, DrcCheck};

/// Stroke width of a draw aperture in mm; 0 when it has none
pub fn track_width_mm(aperture: &Aperture, unit_factor: f64) -> f64 {
    match aperture {
        Aperture::Circle { diameter } => diameter * unit_factor,
        Aperture::Rectangle { width, height } => width.min(*height) * unit_factor,
        _ => 0.0,
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TrackWidthCheck;

impl DrcCheck for TrackWidthCheck {
    fn supported_kind(&self) -> ConstraintKind {
        ConstraintKind::TrackWidth
    }

    fn check(
        &self,
        rule: &DrcRule,
        constraint: &DrcConstraint,
        board: &DrcBoardInput,
    ) -> Vec<DrcViolation> {
        let evaluator = ConditionEvaluator::new();
        let mut violations = Vec::new();

        for (layer_name, doc) in selected_copper_layers(rule, board) {
            let uf = doc.unit_factor();

            for obj in &doc.objects {
                let GraphicsObject::Draw {
                    start,
                    end,
                    aperture,
                } = obj
                else {
                    continue;
                };
                if evaluator.evaluate_for_object(rule.condition(), obj) != ConditionResult::Applicable {
                    continue;
                }

                let width = track_width_mm(aperture, uf);
                if width <= 0.0 {
                    continue;
                }
                let mid = midpoint(*start, *end);
                let location = [mid[0] * uf, mid[1] * uf];

                if let Some(min) = constraint.min_mm.filter(|min| width < *min) {
                    violations.push(
                        DrcViolation::new(rule, constraint, "Track width too small")
                            .measured(width, min)
                            .at(location)
                            .on_layer(layer_name),
                    );
                }
                if let Some(max) = constraint.max_mm.filter(|max| width > *max) {
                    violations.push(
                        DrcViolation::new(rule, constraint, "Track width too large")
                            .measured(width, max)
                            .at(location)
                            .on_layer(layer_name),
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
    use crate::drc::checks::test_support::{board_with, circle};
    use crate::model::{GerberDocument, Unit};

    fn rule(min: Option<f64>, max: Option<f64>) -> DrcRule {
        DrcRule::new("Track")
            .with_layer("outer")
            .with_condition("A.Type == 'track'")
            .with_constraint(DrcConstraint::new(ConstraintKind::TrackWidth, min, max))
    }

    fn run(rule: &DrcRule, board: &DrcBoardInput) -> Vec<DrcViolation> {
        TrackWidthCheck.check(rule, &rule.constraints[0], board)
    }

    #[test]
    fn test_narrow_track_reported_at_midpoint() {
        let board = board_with(
            "F.Cu",
            vec![GraphicsObject::draw([0.0, 0.0], [10.0, 0.0], circle(0.1))],
        );
        let v = run(&rule(Some(0.127), None), &board);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].description, "Track width too small");
        assert!((v[0].measured_mm.unwrap() - 0.1).abs() < 1e-9);
        assert_eq!(v[0].required_mm, Some(0.127));
        assert_eq!((v[0].x, v[0].y), (5.0, 0.0));
        assert_eq!(v[0].layer.as_deref(), Some("F.Cu"));
    }

    #[test]
    fn test_wide_track_and_rectangle_width() {
        let rect = Aperture::Rectangle {
            width: 0.3,
            height: 2.0,
        };
        let board = board_with(
            "B.Cu",
            vec![GraphicsObject::draw([0.0, 0.0], [1.0, 0.0], rect)],
        );
        let v = run(&rule(Some(0.1), Some(0.25)), &board);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].description, "Track width too large");
        assert!((v[0].measured_mm.unwrap() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_flashes_inner_layers_and_zero_width_ignored() {
        let mut board = board_with(
            "F.Cu",
            vec![
                GraphicsObject::flash(0.0, 0.0, circle(0.05)),
                GraphicsObject::draw(
                    [0.0, 0.0],
                    [1.0, 0.0],
                    Aperture::Obround {
                        width: 0.05,
                        height: 0.05,
                    },
                ),
            ],
        );
        let mut inner = GerberDocument::new(Unit::Millimeters);
        inner.add_object(GraphicsObject::draw([0.0, 0.0], [1.0, 0.0], circle(0.05)));
        board.add_gerber_layer("In1.Cu", inner);

        assert!(run(&rule(Some(0.127), None), &board).is_empty());
    }

    #[test]
    fn test_inch_units_converted() {
        let mut doc = GerberDocument::new(Unit::Inches);
        doc.add_object(GraphicsObject::draw([0.0, 0.0], [1.0, 0.0], circle(0.004)));
        let mut board = DrcBoardInput::new();
        board.add_gerber_layer("F.Cu", doc);

        let v = run(&rule(Some(0.127), None), &board);
        assert_eq!(v.len(), 1);
        assert!((v[0].measured_mm.unwrap() - 0.1016).abs() < 1e-9);
        assert!((v[0].x - 12.7).abs() < 1e-9);
    }
}
