//! Manufacturing cost advisor
//!
//! Profiles a board's minimum trace width, hole size and (optionally)
//! copper clearance, places each in a manufacturer's tier ladder and
//! suggests which features to widen to reach a cheaper tier.
//!
//! # Submodules
//! - `profile` - tiers and manufacturer ladders
//! - `scanner` - board statistics and histograms
//! - `cost` - classification, suggestions, report
//! - `builtin` - bundled manufacturer ladders

mod profile;
mod scanner;
mod cost;
pub mod builtin;

pub use profile::{ManufacturerProfile, ManufacturingTier};
pub use scanner::{
    build_distribution, BoardProfile, BoardProfileScanner, FeatureBucket,
    DEFAULT_HOLE_BOUNDARIES_MM, DEFAULT_TRACE_BOUNDARIES_MM, MIN_CLEARANCE_SEARCH_MM,
};
pub use cost::{CostAdvisor, CostAdvisorReport, FeatureParameter, OptimizationSuggestion, TierClassification};
