//! Planar geometry for DRC measurements
//!
//! # Submodules
//! - `shapes` - polygons, multipolygons and buffering
//! - `distance` - exact distance and nearest points
//! - `convert` - Gerber objects and drill operations to geometry in mm
//! - `spatial` - R-tree neighbour index

mod shapes;
mod distance;
mod convert;
mod spatial;

pub use shapes::{capsule, circle_polygon, Geometry, Polygon, CIRCLE_SEGMENTS, QUADRANT_SEGMENTS};

pub use distance::{
    geometry_distance, midpoint, point_distance, point_in_ring, point_segment_distance,
    polygon_distance, segment_distance, Nearest,
};

pub use convert::{
    arc_points, convert_drill, convert_drill_operation, convert_layer, convert_object,
    draw_radius, ARC_CLOSED_TOLERANCE_MM, MIN_ARC_SEGMENTS,
};

pub use spatial::{IndexedEnvelope, SpatialIndex};
