use crate::drc::board::DrcBoardInput;
use crate::drc::report::DrcViolation;
use crate::drc::rules::{ConstraintKind, DrcConstraint, DrcRule};
use crate::model::{Aperture, DrillOperation, GraphicsObject};

use super::{selected_copper_layers, DrcCheck};

/// Max offset (mm, per axis) between a drill hit and the flash it pierces
pub const POSITION_TOLERANCE_MM: f64 = 0.01;

/// Effective pad diameter in mm; `None` for shapes without one
pub fn pad_diameter_mm(aperture: &Aperture, unit_factor: f64) -> Option<f64> {
    match aperture {
        Aperture::Circle { diameter } => Some(diameter * unit_factor),
        Aperture::Rectangle { width, height } => Some(width.min(*height) * unit_factor),
        _ => None,
    }
}

/// Copper ring left around each drill hit by the flashed pad it lands on
#[derive(Clone, Copy, Debug, Default)]
pub struct AnnularWidthCheck;

impl DrcCheck for AnnularWidthCheck {
    fn supported_kind(&self) -> ConstraintKind {
        ConstraintKind::AnnularWidth
    }

    fn check(
        &self,
        rule: &DrcRule,
        constraint: &DrcConstraint,
        board: &DrcBoardInput,
    ) -> Vec<DrcViolation> {
        let Some(min_width) = constraint.min_mm else {
            return Vec::new();
        };
        let mut violations = Vec::new();

        for drill in board.drills() {
            let duf = drill.unit_factor();

            for op in &drill.operations {
                let DrillOperation::Hit { tool, x, y } = op else {
                    continue;
                };
                let drill_d = tool.diameter * duf;
                let hit = [x * duf, y * duf];

                for (layer_name, doc) in selected_copper_layers(rule, board) {
                    let guf = doc.unit_factor();

                    for obj in &doc.objects {
                        let GraphicsObject::Flash { x, y, aperture } = obj else {
                            continue;
                        };
                        if (x * guf - hit[0]).abs() > POSITION_TOLERANCE_MM
                            || (y * guf - hit[1]).abs() > POSITION_TOLERANCE_MM
                        {
                            continue;
                        }

                        let Some(pad_d) = pad_diameter_mm(aperture, guf).filter(|d| *d > 0.0) else {
                            continue;
                        };
                        let annular = (pad_d - drill_d) / 2.0;
                        if annular < min_width {
                            // Pad smaller than the hole: the ring is fully drilled out
                            violations.push(
                                DrcViolation::new(rule, constraint, "Annular width too small")
                                    .measured(annular.max(0.0), min_width)
                                    .at(hit)
                                    .on_layer(layer_name),
                            );
                        }
                    }
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drc::checks::test_support::{circle, layer};
    use crate::model::{BoundingBox, DrillDocument, Tool, Unit};

    fn run(board: &DrcBoardInput, layer_sel: Option<&str>) -> Vec<DrcViolation> {
        let mut rule = DrcRule::new("Annular")
            .with_constraint(DrcConstraint::min(ConstraintKind::AnnularWidth, 0.25));
        if let Some(sel) = layer_sel {
            rule = rule.with_layer(sel);
        }
        AnnularWidthCheck.check(&rule, &rule.constraints[0], board)
    }

    fn board(flashes: Vec<GraphicsObject>, hit_at: [f64; 2]) -> DrcBoardInput {
        let mut drill = DrillDocument::new(Unit::Millimeters);
        drill.add_hit(Tool::new(1, 0.5), hit_at[0], hit_at[1]);
        let mut board = DrcBoardInput::new();
        board
            .add_gerber_layer("F.Cu", layer(flashes.clone()))
            .add_gerber_layer("B.Cu", layer(flashes))
            .add_drill(drill);
        board
    }

    #[test]
    fn test_thin_ring_reported_per_layer() {
        let b = board(vec![GraphicsObject::flash(5.0, 5.0, circle(0.7))], [5.0, 5.0]);
        let v = run(&b, None);
        assert_eq!(v.len(), 2);
        assert!((v[0].measured_mm.unwrap() - 0.1).abs() < 1e-9);
        assert_eq!(v[0].layer.as_deref(), Some("F.Cu"));
        assert_eq!(v[1].layer.as_deref(), Some("B.Cu"));

        assert_eq!(run(&b, Some("F.Cu")).len(), 1);
    }

    #[test]
    fn test_position_tolerance() {
        let flashes = vec![GraphicsObject::flash(5.0, 5.0, circle(0.7))];
        assert_eq!(run(&board(flashes.clone(), [5.009, 4.991]), Some("F.Cu")).len(), 1);
        assert!(run(&board(flashes, [5.02, 5.0]), Some("F.Cu")).is_empty());
    }

    #[test]
    fn test_rectangle_uses_short_side_and_macro_skipped() {
        let rect = Aperture::Rectangle {
            width: 2.0,
            height: 0.8,
        };
        let mac = Aperture::Macro {
            name: "OC8".into(),
            bounds: BoundingBox::centered(0.6, 0.6),
        };
        let b = board(
            vec![GraphicsObject::flash(1.0, 1.0, rect), GraphicsObject::flash(1.0, 1.0, mac)],
            [1.0, 1.0],
        );
        let v = run(&b, Some("F.Cu"));
        assert_eq!(v.len(), 1);
        assert!((v[0].measured_mm.unwrap() - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_wide_ring_compliant() {
        let b = board(vec![GraphicsObject::flash(0.0, 0.0, circle(1.2))], [0.0, 0.0]);
        assert!(run(&b, None).is_empty());
    }

    #[test]
    fn test_pad_smaller_than_hole_measures_zero() {
        let b = board(vec![GraphicsObject::flash(5.0, 5.0, circle(0.3))], [5.0, 5.0]);
        let v = run(&b, Some("F.Cu"));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].measured_mm, Some(0.0));
        assert_eq!(v[0].required_mm, Some(0.25));
    }

    #[test]
    fn test_inch_drill_against_mm_copper() {
        // 0.02 in = 0.508 mm hole at (0.2 in, 0.2 in) = (5.08 mm, 5.08 mm)
        let mut drill = DrillDocument::new(Unit::Inches);
        drill.add_hit(Tool::new(1, 0.02), 0.2, 0.2);
        let mut b = DrcBoardInput::new();
        b.add_gerber_layer("F.Cu", layer(vec![GraphicsObject::flash(5.08, 5.08, circle(0.8))]))
            .add_drill(drill);

        let v = run(&b, None);
        assert_eq!(v.len(), 1);
        assert!((v[0].measured_mm.unwrap() - 0.146).abs() < 1e-9);
        assert!((v[0].x - 5.08).abs() < 1e-9);
        assert!((v[0].y - 5.08).abs() < 1e-9);
    }
}
