//! In-memory fabrication document model
//!
//! Gerber layers and Excellon drill files as produced by an upstream parser.
//! Coordinates are kept in the document's declared unit; consumers convert
//! to millimetres through [`Unit::unit_factor`].
//!
//! # Submodules
//! - `units` - declared units and bounding boxes
//! - `gerber` - apertures, graphics objects, region contours
//! - `drill` - tools, hits and slots

mod units;
mod gerber;
mod drill;

pub use units::{BoundingBox, Unit};
pub use gerber::{Aperture, Contour, ContourSegment, GerberDocument, GraphicsObject};
pub use drill::{DrillDocument, DrillOperation, Tool};
