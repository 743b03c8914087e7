//! Rule dispatch
//!
//! Rules run in declaration order, each constraint against the check
//! registered for its kind. The runner never fails: a rule is dispatched,
//! skipped (ignored severity, unsupported condition, no registered check)
//! or produces violations.

use std::collections::HashMap;
use std::time::Instant;

use super::board::DrcBoardInput;
use super::checks::{default_checks, DrcCheck};
use super::condition::{ConditionEvaluator, ConditionResult};
use super::report::DrcReport;
use super::rules::{ConstraintKind, DrcRuleSet, Severity};

#[derive(Default)]
pub struct DrcRunner {
    checks: HashMap<ConstraintKind, Box<dyn DrcCheck>>,
    evaluator: ConditionEvaluator,
}

impl DrcRunner {
    /// Runner with nothing registered; every constraint is skipped
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner with all six geometric checks
    pub fn with_default_checks() -> Self {
        default_checks()
            .into_iter()
            .fold(Self::new(), |runner, check| runner.register_boxed(check))
    }

    /// Register `check` for its kind, replacing any earlier one
    pub fn register_check(self, check: impl DrcCheck + 'static) -> Self {
        self.register_boxed(Box::new(check))
    }

    pub fn register_boxed(mut self, check: Box<dyn DrcCheck>) -> Self {
        self.checks.insert(check.supported_kind(), check);
        self
    }

    pub fn is_registered(&self, kind: ConstraintKind) -> bool {
        self.checks.contains_key(&kind)
    }

    pub fn run(&self, rule_set: &DrcRuleSet, board: &DrcBoardInput) -> DrcReport {
        let start = Instant::now();
        let mut report = DrcReport::new();

        log::info!(
            "[DRC] Running {} rules on {} layers and {} drill files",
            rule_set.len(),
            board.layers().len(),
            board.drills().len()
        );

        for rule in &rule_set.rules {
            if rule.severity == Severity::Ignore {
                continue;
            }

            if self.evaluator.evaluate(rule.condition()) == ConditionResult::Unsupported {
                log::debug!(
                    "[DRC] Skipping rule '{}': unsupported condition {:?}",
                    rule.name,
                    rule.condition().unwrap_or_default()
                );
                report.add_skipped_rule(rule.clone());
                continue;
            }

            for constraint in &rule.constraints {
                let Some(check) = self.checks.get(&constraint.kind) else {
                    log::debug!(
                        "[DRC] No check for {} in rule '{}'",
                        constraint.kind,
                        rule.name
                    );
                    continue;
                };
                report.extend_violations(check.check(rule, constraint, board));
            }
        }

        log::info!(
            "[DRC] Completed: {} errors, {} warnings, {} skipped rules in {:?}",
            report.errors().len(),
            report.warnings().len(),
            report.skipped_rules().len(),
            start.elapsed()
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drc::checks::test_support::{board_with, circle};
    use crate::drc::report::DrcViolation;
    use crate::drc::rules::{DrcConstraint, DrcRule};
    use crate::model::GraphicsObject;

    fn thin_track_board() -> DrcBoardInput {
        board_with(
            "F.Cu",
            vec![GraphicsObject::draw([0.0, 0.0], [5.0, 0.0], circle(0.1))],
        )
    }

    fn track_rule(name: &str) -> DrcRule {
        DrcRule::new(name).with_constraint(DrcConstraint::min(ConstraintKind::TrackWidth, 0.127))
    }

    #[test]
    fn test_ignored_and_unsupported_rules() {
        let rules = DrcRuleSet::new(1)
            .with_rule(track_rule("ignored").with_severity(Severity::Ignore))
            .with_rule(track_rule("net").with_condition("A.NetClass == 'Power'"))
            .with_rule(track_rule("warn").with_severity(Severity::Warning));

        let report = DrcRunner::with_default_checks().run(&rules, &thin_track_board());

        assert_eq!(report.violations().len(), 1);
        assert_eq!(report.warnings().len(), 1);
        assert!(!report.has_errors());
        assert_eq!(report.skipped_rules().len(), 1);
        assert_eq!(report.skipped_rules()[0].name, "net");
        assert_eq!(report.violations_for_rule("ignored").count(), 0);
    }

    #[test]
    fn test_unregistered_kind_is_skipped_silently() {
        let rules = DrcRuleSet::new(1)
            .with_rule(track_rule("width"))
            .with_rule(
                DrcRule::new("silk")
                    .with_constraint(DrcConstraint::min(ConstraintKind::SilkClearance, 0.1)),
            );
        let report = DrcRunner::new().run(&rules, &thin_track_board());
        assert!(report.violations().is_empty());
        assert!(report.skipped_rules().is_empty());
    }

    struct Always;

    impl DrcCheck for Always {
        fn supported_kind(&self) -> ConstraintKind {
            ConstraintKind::TrackWidth
        }

        fn check(
            &self,
            rule: &DrcRule,
            constraint: &DrcConstraint,
            _board: &DrcBoardInput,
        ) -> Vec<DrcViolation> {
            vec![DrcViolation::new(rule, constraint, "always")]
        }
    }

    #[test]
    fn test_registration_replaces_by_kind() {
        let runner = DrcRunner::with_default_checks().register_check(Always);
        assert!(runner.is_registered(ConstraintKind::AnnularWidth));

        let rules = DrcRuleSet::new(1).with_rule(track_rule("a")).with_rule(track_rule("b"));
        let report = runner.run(&rules, &DrcBoardInput::new());
        let names: Vec<_> = report.violations().iter().map(|v| v.rule_name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(report.violations().iter().all(|v| v.description == "always"));
    }
}
