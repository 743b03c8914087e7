//! Rule-set parsers
//!
//! # Submodules
//! - `sexpr` - S-expression reader
//! - `dru` - `.kicad_dru` rule files and constraint value units
//! - `pro` - `.kicad_pro` project-file design settings

mod sexpr;
mod dru;
mod pro;

pub use sexpr::{parse_sexpr, SNode};
pub use dru::{format_value, parse_dru, parse_value_mm, write_dru, ValueUnit, MM_PER_INCH, MM_PER_MIL};
pub use pro::{format_rule_name, parse_pro, parse_pro_bytes, PRO_RULE_KEYS};
