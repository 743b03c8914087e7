//! Rule condition classification
//!
//! Conditions are not evaluated as expressions. A fixed list of phrases that
//! need data Gerber does not carry (nets, plating, via/pad distinction) makes
//! a rule unsupported; `A.Type == 'track'` and `A.Type == 'pad'` narrow a rule
//! to draws or flashes; anything else is unsupported.

use crate::model::GraphicsObject;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionResult {
    Applicable,
    NotApplicable,
    Unsupported,
}

/// Object class as seen by `A.Type`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectType {
    Track,
    Pad,
    Zone,
    Unknown,
}

impl ObjectType {
    pub fn of(obj: &GraphicsObject) -> Self {
        match obj {
            GraphicsObject::Draw { .. } => ObjectType::Track,
            GraphicsObject::Flash { .. } => ObjectType::Pad,
            GraphicsObject::Region { .. } => ObjectType::Zone,
            GraphicsObject::Arc { .. } => ObjectType::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Track => "track",
            ObjectType::Pad => "pad",
            ObjectType::Zone => "zone",
            ObjectType::Unknown => "unknown",
        }
    }
}

/// Phrases that cannot be decided without a netlist or fabrication data
const UNSUPPORTED_PHRASES: &[&str] = &[
    "A.Net",
    "B.Net",
    "A.NetClass",
    "B.NetClass",
    "isPlated()",
    "'via'",
    "'Via'",
    "A.Pad_Type",
    "A.Fabrication_Property",
    "A.Hole_Size_X",
    "A.Hole_Size_Y",
    "B.Type",
];

const TRACK_PHRASE: &str = "A.Type == 'track'";
const PAD_PHRASES: &[&str] = &["A.Type == 'pad'", "A.Type == 'Pad'"];

#[derive(Clone, Copy, Debug, Default)]
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Object-independent class of a condition
    pub fn evaluate(&self, condition: Option<&str>) -> ConditionResult {
        let Some(cond) = condition.filter(|c| !c.is_empty()) else {
            return ConditionResult::Applicable;
        };

        if UNSUPPORTED_PHRASES.iter().any(|p| cond.contains(p)) {
            return ConditionResult::Unsupported;
        }
        if cond.contains(TRACK_PHRASE) || PAD_PHRASES.iter().any(|p| cond.contains(p)) {
            return ConditionResult::Applicable;
        }
        ConditionResult::Unsupported
    }

    /// Class of a condition for one graphics object
    pub fn evaluate_for_object(&self, condition: Option<&str>, obj: &GraphicsObject) -> ConditionResult {
        let base = self.evaluate(condition);
        if base != ConditionResult::Applicable {
            return base;
        }
        let Some(cond) = condition.filter(|c| !c.is_empty()) else {
            return ConditionResult::Applicable;
        };

        let object_type = ObjectType::of(obj);
        let narrowed_to = if cond.contains(TRACK_PHRASE) {
            Some(ObjectType::Track)
        } else if PAD_PHRASES.iter().any(|p| cond.contains(p)) {
            Some(ObjectType::Pad)
        } else {
            None
        };

        match narrowed_to {
            Some(wanted) if wanted != object_type => ConditionResult::NotApplicable,
            _ => ConditionResult::Applicable,
        }
    }
}
