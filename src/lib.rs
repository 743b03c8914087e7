//! Design-rule checks and cost-tier advice for PCB fabrication data
//!
//! Consumes an in-memory model of Gerber layers and Excellon drill files,
//! runs KiCad-style rule sets against it and reports violations with
//! positions in millimetres. The advisor places the same board in a
//! manufacturer's cost tiers.
//!
//! ```ignore
//! let rules = gerber_drc::load_rule_set_file("board.kicad_dru")?;
//! let report = DrcRunner::with_default_checks().run(&rules, &board);
//! println!("{report}");
//! ```

pub mod error;
pub mod model;
pub mod drc;
pub mod advisor;

use std::path::Path;

use anyhow::Context;

pub use advisor::builtin as builtin_profiles;
pub use drc::builtin as builtin_rule_sets;
pub use drc::{DrcBoardInput, DrcReport, DrcRuleSet, DrcRunner, DrcViolation};
pub use error::{DrcError, Result};

/// Reads a rule set from disk, picking the parser by extension
///
/// `.kicad_dru` / `.dru` are S-expression rule files; `.kicad_pro` / `.json`
/// are KiCad project files.
pub fn load_rule_set_file<P: AsRef<Path>>(path: P) -> anyhow::Result<DrcRuleSet> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read rule file {}", path.display()))?;

    let rule_set = match ext.as_str() {
        "kicad_dru" | "dru" => {
            let text = String::from_utf8(bytes)
                .with_context(|| format!("Rule file {} is not UTF-8", path.display()))?;
            drc::parser::parse_dru(&text)
        }
        "kicad_pro" | "json" => drc::parser::parse_pro_bytes(&bytes),
        other => anyhow::bail!(
            "Unsupported rule file extension '{other}' for {}",
            path.display()
        ),
    }
    .with_context(|| format!("Failed to parse rule file {}", path.display()))?;

    log::info!(
        "[DRC] Loaded {} rules from {}",
        rule_set.len(),
        path.display()
    );
    Ok(rule_set)
}
