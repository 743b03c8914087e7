// Report-level guarantees of a DRC run
use gerber_drc::drc::{ConstraintKind, DrcConstraint, DrcRule, DrcRuleSet, Severity};
use gerber_drc::model::{Aperture, DrillDocument, GerberDocument, GraphicsObject, Tool, Unit};
use gerber_drc::{builtin_rule_sets, DrcBoardInput, DrcRunner};

fn circle(d: f64) -> Aperture {
    Aperture::Circle { diameter: d }
}

/// A small two-layer board with something for every default check to find
fn busy_board() -> DrcBoardInput {
    let mut front = GerberDocument::new(Unit::Millimeters).with_file_function("Copper,L1,Top");
    front
        .add_object(GraphicsObject::draw([1.0, 1.0], [9.0, 1.0], circle(0.1)))
        .add_object(GraphicsObject::draw([1.0, 1.2], [9.0, 1.2], circle(0.1)))
        .add_object(GraphicsObject::flash(5.0, 5.0, circle(0.7)))
        // smaller than the 0.5 mm hole drilled through it
        .add_object(GraphicsObject::flash(6.5, 5.0, circle(0.3)))
        .add_object(GraphicsObject::flash(0.2, 8.0, circle(0.3)));

    let mut back = GerberDocument::new(Unit::Millimeters).with_file_function("Copper,L2,Bot");
    back.add_object(GraphicsObject::draw([2.0, 3.0], [8.0, 3.0], circle(0.25)));

    let mut edge = GerberDocument::new(Unit::Millimeters).with_file_function("Profile,NP");
    let line = circle(0.05);
    edge.add_object(GraphicsObject::draw([0.0, 0.0], [10.0, 0.0], line.clone()))
        .add_object(GraphicsObject::draw([10.0, 0.0], [10.0, 10.0], line.clone()))
        .add_object(GraphicsObject::draw([10.0, 10.0], [0.0, 10.0], line.clone()))
        .add_object(GraphicsObject::draw([0.0, 10.0], [0.0, 0.0], line));

    let mut drill = DrillDocument::new(Unit::Millimeters);
    drill
        .add_hit(Tool::new(1, 0.5), 5.0, 5.0)
        .add_hit(Tool::new(2, 0.1), 6.0, 6.0)
        .add_hit(Tool::new(1, 0.5), 6.5, 5.0);

    let mut board = DrcBoardInput::new();
    board
        .add_gerber_layer_auto(front)
        .add_gerber_layer_auto(back)
        .add_gerber_layer_auto(edge)
        .add_drill(drill);
    board
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_mapped_layers() {
        let board = busy_board();
        let names: Vec<_> = board.layers().keys().map(String::as_str).collect();
        assert_eq!(names, ["F.Cu", "B.Cu", "Edge.Cuts"]);
        assert_eq!(board.copper_layer_count(), 2);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let board = busy_board();
        let runner = DrcRunner::with_default_checks();
        let first = runner.run(builtin_rule_sets::pcbway(), &board);
        let second = runner.run(builtin_rule_sets::pcbway(), &board);

        assert!(!first.violations().is_empty());
        assert_eq!(first.to_json().to_string(), second.to_json().to_string());
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(first, second);
    }

    #[test]
    fn test_measurements_are_non_negative_and_directional() {
        let board = busy_board();
        let report = DrcRunner::with_default_checks().run(builtin_rule_sets::pcbway(), &board);

        let drilled_out = report
            .violations()
            .iter()
            .find(|v| v.description == "Annular width too small" && (v.x - 6.5).abs() < 1e-9)
            .expect("pad smaller than its hole is reported");
        assert_eq!(drilled_out.measured_mm, Some(0.0));

        for v in report.violations() {
            let (Some(m), Some(r)) = (v.measured_mm, v.required_mm) else {
                continue;
            };
            assert!(m >= 0.0, "{v}");
            if v.description.ends_with("too large") {
                assert!(m > r, "{v}");
            } else {
                assert!(m < r, "{v}");
            }
        }
    }

    #[test]
    fn test_ignored_rules_report_nothing() {
        let mut rule_set = builtin_rule_sets::pcbway().clone();
        for rule in &mut rule_set.rules {
            rule.severity = Severity::Ignore;
        }
        let report = DrcRunner::with_default_checks().run(&rule_set, &busy_board());
        assert!(report.violations().is_empty());
        assert!(report.skipped_rules().is_empty());
    }

    #[test]
    fn test_unsupported_rule_skipped_exactly_once() {
        let net_rule = DrcRule::new("Net spacing")
            .with_condition("A.Net != B.Net")
            .with_constraint(DrcConstraint::min(ConstraintKind::Clearance, 5.0))
            .with_constraint(DrcConstraint::min(ConstraintKind::TrackWidth, 5.0));
        let rule_set = DrcRuleSet::new(1).with_rule(net_rule.clone());

        let report = DrcRunner::with_default_checks().run(&rule_set, &busy_board());
        assert_eq!(report.skipped_rules(), [net_rule]);
        assert_eq!(report.violations_for_rule("Net spacing").count(), 0);
        assert_eq!(report.to_json()["skippedRules"][0], "Net spacing");
    }

    #[test]
    fn test_clearance_reports_each_pair_at_most_once() {
        let mut doc = GerberDocument::new(Unit::Millimeters);
        for x in [0.0, 0.3, 0.6] {
            doc.add_object(GraphicsObject::flash(x, 0.0, circle(0.2)));
        }
        let mut board = DrcBoardInput::new();
        board.add_gerber_layer("F.Cu", doc);

        let run = |min: f64| {
            let rule_set = DrcRuleSet::new(1).with_rule(
                DrcRule::new("Spacing").with_constraint(DrcConstraint::min(ConstraintKind::Clearance, min)),
            );
            DrcRunner::with_default_checks().run(&rule_set, &board)
        };

        assert_eq!(run(0.127).violations().len(), 2);
        assert_eq!(run(0.5).violations().len(), 3);
    }

    #[test]
    fn test_rule_order_drives_violation_order() {
        let rule_set = DrcRuleSet::new(1)
            .with_rule(DrcRule::new("holes").with_constraint(DrcConstraint::new(
                ConstraintKind::HoleSize,
                Some(0.15),
                None,
            )))
            .with_rule(
                DrcRule::new("tracks")
                    .with_severity(Severity::Warning)
                    .with_constraint(DrcConstraint::min(ConstraintKind::TrackWidth, 0.127)),
            );
        let report = DrcRunner::with_default_checks().run(&rule_set, &busy_board());

        let names: Vec<_> = report.violations().iter().map(|v| v.rule_name.as_str()).collect();
        assert_eq!(names, ["holes", "tracks", "tracks"]);
        assert_eq!(report.warnings().len(), 2);
        assert_eq!(report.to_json()["errors"], 1);
    }
}
