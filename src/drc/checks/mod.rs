//! Geometric design-rule checks
//!
//! Each check handles one constraint kind and returns its violations in a
//! deterministic order: board layer order, then object order.
//!
//! # Submodules
//! - `track_width` - draw widths on copper
//! - `hole_size` - drill diameters
//! - `hole_to_hole` - edge spacing between drill hits
//! - `clearance` - copper-to-copper spacing per layer
//! - `edge_clearance` - copper to board outline
//! - `annular_width` - pad ring around drill hits

mod track_width;
mod hole_size;
mod hole_to_hole;
mod clearance;
mod edge_clearance;
mod annular_width;

use crate::drc::board::{is_copper, DrcBoardInput};
use crate::drc::report::DrcViolation;
use crate::drc::rules::{ConstraintKind, DrcConstraint, DrcRule};
use crate::model::GerberDocument;

pub use track_width::{track_width_mm, TrackWidthCheck};
pub use hole_size::HoleSizeCheck;
pub use hole_to_hole::HoleToHoleCheck;
pub use clearance::{layer_pair_distances, ClearanceCheck, PairDistance};
pub use edge_clearance::EdgeClearanceCheck;
pub use annular_width::{pad_diameter_mm, AnnularWidthCheck, POSITION_TOLERANCE_MM};

/// A check for one constraint kind
pub trait DrcCheck {
    fn supported_kind(&self) -> ConstraintKind;

    fn check(
        &self,
        rule: &DrcRule,
        constraint: &DrcConstraint,
        board: &DrcBoardInput,
    ) -> Vec<DrcViolation>;
}

/// The six geometric checks
pub fn default_checks() -> Vec<Box<dyn DrcCheck>> {
    vec![
        Box::new(ClearanceCheck),
        Box::new(TrackWidthCheck),
        Box::new(HoleSizeCheck),
        Box::new(HoleToHoleCheck),
        Box::new(EdgeClearanceCheck),
        Box::new(AnnularWidthCheck),
    ]
}

/// Copper layers selected by the rule, in board order
pub(crate) fn selected_copper_layers<'a>(
    rule: &'a DrcRule,
    board: &'a DrcBoardInput,
) -> impl Iterator<Item = (&'a str, &'a GerberDocument)> + 'a {
    board
        .layers()
        .iter()
        .filter(move |(name, _)| is_copper(name) && rule.matches_layer(name))
        .map(|(name, doc)| (name.as_str(), doc))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::drc::board::DrcBoardInput;
    use crate::model::{Aperture, GerberDocument, GraphicsObject, Unit};

    pub fn circle(d: f64) -> Aperture {
        Aperture::Circle { diameter: d }
    }

    pub fn layer(objects: Vec<GraphicsObject>) -> GerberDocument {
        let mut doc = GerberDocument::new(Unit::Millimeters);
        for obj in objects {
            doc.add_object(obj);
        }
        doc
    }

    pub fn board_with(name: &str, objects: Vec<GraphicsObject>) -> DrcBoardInput {
        let mut board = DrcBoardInput::new();
        board.add_gerber_layer(name, layer(objects));
        board
    }
}
