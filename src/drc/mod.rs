//! Design Rule Checking (DRC) for Gerber/Excellon fabrication data
//!
//! A rule set (parsed from `.kicad_dru` or `.kicad_pro`) is run against a
//! board made of named Gerber layers and drill files. Geometric checks use an
//! R-tree to find candidate pairs, then measure exact distances.
//!
//! # Submodules
//! - `board` - board input and layer-name mapping
//! - `rules` - rule sets, constraints, layer selectors
//! - `parser` - rule-set file parsers
//! - `geometry` - planar kernel, converters, spatial index
//! - `condition` - rule condition classification
//! - `checks` - one check per constraint kind
//! - `runner` - rule dispatch
//! - `report` - violations and report
//! - `builtin` - bundled manufacturer rule sets

pub mod board;
pub mod rules;
pub mod parser;
pub mod geometry;
pub mod condition;
pub mod checks;
pub mod runner;
pub mod report;
pub mod builtin;

pub use board::{detect_layer, DrcBoardInput, DRILL_LAYER, EDGE_CUTS};
pub use checks::{default_checks, DrcCheck};
pub use condition::{ConditionEvaluator, ConditionResult, ObjectType};
pub use report::{DrcReport, DrcViolation};
pub use rules::{ConstraintKind, DrcConstraint, DrcRule, DrcRuleSet, LayerSelector, Severity};
pub use runner::DrcRunner;
