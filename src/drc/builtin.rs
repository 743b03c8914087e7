//! Rule sets bundled with the crate
//!
//! Parsed once on first use. The bundled files are covered by tests, so a
//! parse failure here is logged and yields an empty rule set.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use super::parser::{parse_dru, parse_pro};
use super::rules::DrcRuleSet;
use crate::error::Result;

const PCBWAY_DRU: &str = include_str!("../../data/pcbway.kicad_dru");
const NEXTPCB_PRO: &str = include_str!("../../data/nextpcb-simple.kicad_pro");

static PCBWAY: Lazy<DrcRuleSet> = Lazy::new(|| load("pcbway", parse_dru(PCBWAY_DRU)));
static NEXTPCB: Lazy<DrcRuleSet> = Lazy::new(|| load("nextpcb", parse_pro(NEXTPCB_PRO)));

fn load(name: &str, parsed: Result<DrcRuleSet>) -> DrcRuleSet {
    match parsed {
        Ok(rule_set) => {
            log::debug!("[DRC] Loaded built-in rule set '{name}': {} rules", rule_set.len());
            rule_set
        }
        Err(e) => {
            log::error!("[DRC] Built-in rule set '{name}' failed to parse: {e}");
            DrcRuleSet::default()
        }
    }
}

/// PCBWay custom rules (`.kicad_dru`)
pub fn pcbway() -> &'static DrcRuleSet {
    &PCBWAY
}

/// NextPCB "Simple DRC" project settings (`.kicad_pro`)
pub fn nextpcb() -> &'static DrcRuleSet {
    &NEXTPCB
}

/// Case-insensitive lookup by the keys of [`all`]
pub fn by_name(name: &str) -> Option<&'static DrcRuleSet> {
    match name.to_ascii_lowercase().as_str() {
        "pcbway" => Some(pcbway()),
        "nextpcb" => Some(nextpcb()),
        _ => None,
    }
}

pub fn all() -> IndexMap<&'static str, &'static DrcRuleSet> {
    IndexMap::from([("pcbway", pcbway()), ("nextpcb", nextpcb())])
}
