//! Conversion of Gerber objects and drill operations to planar geometry
//!
//! Every coordinate and dimension is multiplied by the owning document's
//! unit factor here, once; everything downstream works in millimetres.

use std::f64::consts::PI;

use crate::model::{
    Aperture, Contour, ContourSegment, DrillDocument, DrillOperation, GerberDocument,
    GraphicsObject,
};

use super::distance::point_distance;
use super::shapes::{Geometry, Polygon, CIRCLE_SEGMENTS};

/// Start and end closer than this (mm) describe a full circle
pub const ARC_CLOSED_TOLERANCE_MM: f64 = 1e-4;

/// Minimum segment count of a polygonised arc
pub const MIN_ARC_SEGMENTS: usize = 8;

/// Converts every object of a layer, in object order, skipping objects that
/// produce no geometry
pub fn convert_layer(doc: &GerberDocument) -> Vec<Geometry> {
    let factor = doc.unit_factor();
    doc.objects
        .iter()
        .filter_map(|obj| convert_object(obj, factor))
        .collect()
}

/// Converts a single Gerber object; `None` for regions without a valid ring
pub fn convert_object(obj: &GraphicsObject, factor: f64) -> Option<Geometry> {
    match obj {
        GraphicsObject::Flash { x, y, aperture } => {
            Some(flash_geometry([x * factor, y * factor], aperture, factor))
        }
        GraphicsObject::Draw {
            start,
            end,
            aperture,
        } => Some(Geometry::buffered_segment(
            scale(*start, factor),
            scale(*end, factor),
            draw_radius(aperture) * factor,
        )),
        GraphicsObject::Arc {
            start,
            end,
            center,
            clockwise,
            aperture,
        } => {
            let points = arc_points(
                scale(*start, factor),
                scale(*end, factor),
                scale(*center, factor),
                *clockwise,
            );
            Some(Geometry::buffered_polyline(
                &points,
                draw_radius(aperture) * factor,
            ))
        }
        GraphicsObject::Region { contours } => region_geometry(contours, factor),
    }
}

/// Drill hit as a disk, slot as a stadium, both of the tool's radius
pub fn convert_drill_operation(op: &DrillOperation, factor: f64) -> Geometry {
    let radius = op.tool().diameter * factor / 2.0;
    match op {
        DrillOperation::Hit { x, y, .. } => Geometry::circle([x * factor, y * factor], radius),
        DrillOperation::Slot { start, end, .. } => {
            Geometry::buffered_segment(scale(*start, factor), scale(*end, factor), radius)
        }
    }
}

pub fn convert_drill(doc: &DrillDocument) -> Vec<Geometry> {
    let factor = doc.unit_factor();
    doc.operations
        .iter()
        .map(|op| convert_drill_operation(op, factor))
        .collect()
}

fn flash_geometry(center: [f64; 2], aperture: &Aperture, factor: f64) -> Geometry {
    match aperture {
        Aperture::Circle { diameter } => Geometry::circle(center, diameter * factor / 2.0),
        Aperture::Rectangle { width, height } => {
            Geometry::rectangle(center, width * factor, height * factor)
        }
        // Shape is lost; the disk keeps the aperture's extent for proximity checks
        other => {
            let bbox = other.bounding_box();
            let radius = bbox.width().max(bbox.height()) / 2.0;
            Geometry::circle(center, radius * factor)
        }
    }
}

/// Buffer radius applied to a stroked draw or arc, in document units
///
/// Rectangles over-approximate with half their longer side. Apertures without
/// a stroke radius draw a bare line.
pub fn draw_radius(aperture: &Aperture) -> f64 {
    match aperture {
        Aperture::Circle { diameter } => diameter / 2.0,
        Aperture::Rectangle { width, height } => width.max(*height) / 2.0,
        _ => 0.0,
    }
}

/// Polygonises an arc, first point included
///
/// The sweep follows the arc direction; coincident start and end give a full
/// circle. Segment count is proportional to the sweep, 32 per turn, at least 8.
pub fn arc_points(
    start: [f64; 2],
    end: [f64; 2],
    center: [f64; 2],
    clockwise: bool,
) -> Vec<[f64; 2]> {
    let radius = point_distance(start, center);
    let start_angle = (start[1] - center[1]).atan2(start[0] - center[0]);
    let end_angle = (end[1] - center[1]).atan2(end[0] - center[0]);

    let sweep = if point_distance(start, end) < ARC_CLOSED_TOLERANCE_MM {
        2.0 * PI
    } else {
        let mut delta = if clockwise {
            start_angle - end_angle
        } else {
            end_angle - start_angle
        };
        if delta <= 0.0 {
            delta += 2.0 * PI;
        }
        delta
    };

    let segments = ((sweep / (2.0 * PI) * CIRCLE_SEGMENTS as f64).round() as usize)
        .max(MIN_ARC_SEGMENTS);
    let direction = if clockwise { -1.0 } else { 1.0 };

    (0..=segments)
        .map(|i| {
            let angle = start_angle + direction * sweep * (i as f64 / segments as f64);
            [
                center[0] + radius * angle.cos(),
                center[1] + radius * angle.sin(),
            ]
        })
        .collect()
}

fn region_geometry(contours: &[Contour], factor: f64) -> Option<Geometry> {
    let parts: Vec<Polygon> = contours
        .iter()
        .filter_map(|c| contour_ring(c, factor))
        .map(Polygon::new)
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(Geometry::from_parts(parts))
    }
}

/// Closed ring of a contour, `None` when it has fewer than four points
fn contour_ring(contour: &Contour, factor: f64) -> Option<Vec<[f64; 2]>> {
    let start = scale(contour.start, factor);
    let mut ring = vec![start];
    let mut current = start;

    for seg in &contour.segments {
        match seg {
            ContourSegment::Line { end } => {
                current = scale(*end, factor);
                ring.push(current);
            }
            ContourSegment::Arc {
                end,
                center,
                clockwise,
            } => {
                let end = scale(*end, factor);
                let points = arc_points(current, end, scale(*center, factor), *clockwise);
                // First point duplicates the running position
                ring.extend(points.into_iter().skip(1));
                current = end;
            }
        }
    }

    if ring.last() != Some(&start) {
        ring.push(start);
    }
    if ring.len() < 4 {
        return None;
    }
    Some(ring)
}

fn scale(p: [f64; 2], factor: f64) -> [f64; 2] {
    [p[0] * factor, p[1] * factor]
}
