//! Layer selector patterns from `(layer ...)` rule clauses

use std::fmt;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::drc::board::{is_inner_copper, is_outer_copper};

#[derive(Clone, Debug)]
enum Matcher {
    All,
    Outer,
    Inner,
    Glob(Regex),
    Exact(String),
}

/// Pattern matched against canonical layer names
///
/// Keywords `outer` / `inner` are case-insensitive. Patterns containing `?`
/// or `*` are globs with literal dots. Anything else is an exact name.
#[derive(Clone, Debug)]
pub struct LayerSelector {
    expression: String,
    matcher: Matcher,
}

impl LayerSelector {
    pub fn new(expression: impl Into<String>) -> Self {
        let expression = expression.into();
        let matcher = Self::compile(&expression);
        Self {
            expression,
            matcher,
        }
    }

    /// Selector matching every layer
    pub fn all() -> Self {
        Self::new("")
    }

    fn compile(expression: &str) -> Matcher {
        let expr = expression.replace('"', "");
        let expr = expr.trim();

        if expr.is_empty() {
            return Matcher::All;
        }
        if expr.eq_ignore_ascii_case("outer") {
            return Matcher::Outer;
        }
        if expr.eq_ignore_ascii_case("inner") {
            return Matcher::Inner;
        }
        if expr.contains('?') || expr.contains('*') {
            let pattern = regex::escape(expr)
                .replace(r"\?", ".")
                .replace(r"\*", ".*");
            if let Ok(re) = Regex::new(&format!("^{pattern}$")) {
                return Matcher::Glob(re);
            }
            log::warn!("[DRC] Could not compile layer pattern '{expr}', matching exactly");
        }
        Matcher::Exact(expr.to_string())
    }

    /// The selector as written in the rule
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn matches(&self, layer: &str) -> bool {
        match &self.matcher {
            Matcher::All => true,
            Matcher::Outer => is_outer_copper(layer),
            Matcher::Inner => is_inner_copper(layer),
            Matcher::Glob(re) => re.is_match(layer),
            Matcher::Exact(name) => name == layer,
        }
    }
}

impl PartialEq for LayerSelector {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression
    }
}

impl fmt::Display for LayerSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expression.is_empty() {
            write!(f, "(all layers)")
        } else {
            write!(f, "{}", self.expression)
        }
    }
}

impl Serialize for LayerSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.expression)
    }
}

/// True if `selector` is absent or matches `layer`
pub fn selector_matches(selector: Option<&LayerSelector>, layer: &str) -> bool {
    selector.map_or(true, |s| s.matches(layer))
}
