//! Planar shapes in millimetres
//!
//! A [`Geometry`] is a set of polygon parts. Curved outlines are approximated
//! with 8 segments per quadrant, vertices lying on the true circle.

use std::f64::consts::PI;

use crate::model::BoundingBox;

/// Segments per quarter circle used by every buffering operation
pub const QUADRANT_SEGMENTS: usize = 8;

/// Segments in a full circle
pub const CIRCLE_SEGMENTS: usize = QUADRANT_SEGMENTS * 4;

/// Simple polygon stored as an open ring (last vertex connects to the first)
///
/// Rings with fewer than three vertices are degenerate: two vertices form a
/// bare line, one vertex a bare point. They still take part in distance
/// computations through their edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub ring: Vec<[f64; 2]>,
}

impl Polygon {
    /// Builds a polygon, dropping a trailing vertex equal to the first
    pub fn new(mut ring: Vec<[f64; 2]>) -> Self {
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        Self { ring }
    }

    /// Edges as (start, end) pairs, closing back to the first vertex
    pub fn edges(&self) -> impl Iterator<Item = ([f64; 2], [f64; 2])> + '_ {
        let n = self.ring.len();
        (0..n).map(move |i| (self.ring[i], self.ring[(i + 1) % n]))
    }

    pub fn is_area(&self) -> bool {
        self.ring.len() >= 3
    }

    pub fn envelope(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for p in &self.ring {
            bbox.extend(p[0], p[1]);
        }
        bbox
    }

    /// Shoelace area, positive for counter-clockwise rings
    pub fn signed_area(&self) -> f64 {
        let mut sum = 0.0;
        for (a, b) in self.edges() {
            sum += a[0] * b[1] - b[0] * a[1];
        }
        sum / 2.0
    }
}

/// One converted object: a polygon or a multipolygon
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub parts: Vec<Polygon>,
}

impl Geometry {
    pub fn from_polygon(polygon: Polygon) -> Self {
        Self {
            parts: vec![polygon],
        }
    }

    pub fn from_parts(parts: Vec<Polygon>) -> Self {
        Self { parts }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|p| p.ring.is_empty())
    }

    pub fn envelope(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for part in &self.parts {
            bbox.extend_box(&part.envelope());
        }
        bbox
    }

    /// Disk approximated by a regular 32-gon
    pub fn circle(center: [f64; 2], radius: f64) -> Self {
        Self::from_polygon(circle_polygon(center, radius))
    }

    /// Axis-aligned rectangle centred on `center`
    pub fn rectangle(center: [f64; 2], width: f64, height: f64) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::from_polygon(Polygon::new(vec![
            [center[0] - hw, center[1] - hh],
            [center[0] + hw, center[1] - hh],
            [center[0] + hw, center[1] + hh],
            [center[0] - hw, center[1] + hh],
        ]))
    }

    /// Straight segment dilated by `radius` (stadium shape)
    pub fn buffered_segment(start: [f64; 2], end: [f64; 2], radius: f64) -> Self {
        Self::from_polygon(capsule(start, end, radius))
    }

    /// Polyline dilated by `radius`, one capsule per segment
    pub fn buffered_polyline(points: &[[f64; 2]], radius: f64) -> Self {
        match points {
            [] => Self::default(),
            [single] => Self::circle(*single, radius),
            _ => Self::from_parts(
                points
                    .windows(2)
                    .map(|w| capsule(w[0], w[1], radius))
                    .collect(),
            ),
        }
    }
}

/// Regular polygon inscribed in the circle; radius <= 0 yields a bare point
pub fn circle_polygon(center: [f64; 2], radius: f64) -> Polygon {
    if radius <= 0.0 {
        return Polygon::new(vec![center]);
    }
    let ring = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = (i as f64 / CIRCLE_SEGMENTS as f64) * 2.0 * PI;
            [
                center[0] + radius * angle.cos(),
                center[1] + radius * angle.sin(),
            ]
        })
        .collect();
    Polygon::new(ring)
}

/// Stadium around a segment, counter-clockwise
///
/// Half-circle caps use `QUADRANT_SEGMENTS * 2` segments each. Radius <= 0
/// yields the bare segment; a zero-length segment yields a circle.
pub fn capsule(start: [f64; 2], end: [f64; 2], radius: f64) -> Polygon {
    if radius <= 0.0 {
        return Polygon::new(vec![start, end]);
    }
    let dx = end[0] - start[0];
    let dy = end[1] - start[1];
    if dx * dx + dy * dy < 1e-18 {
        return circle_polygon(start, radius);
    }

    let heading = dy.atan2(dx);
    let cap = QUADRANT_SEGMENTS * 2;
    let mut ring = Vec::with_capacity(2 * (cap + 1));

    for (center, base) in [(end, heading - PI / 2.0), (start, heading + PI / 2.0)] {
        for i in 0..=cap {
            let angle = base + PI * (i as f64 / cap as f64);
            ring.push([
                center[0] + radius * angle.cos(),
                center[1] + radius * angle.sin(),
            ]);
        }
    }
    Polygon::new(ring)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertices_on_radius() {
        let c = circle_polygon([1.0, 2.0], 0.5);
        assert_eq!(c.ring.len(), CIRCLE_SEGMENTS);
        for p in &c.ring {
            let r = ((p[0] - 1.0).powi(2) + (p[1] - 2.0).powi(2)).sqrt();
            assert!((r - 0.5).abs() < 1e-12);
        }
        assert!(c.signed_area() > 0.0);
    }

    #[test]
    fn test_capsule_envelope() {
        let geom = Geometry::buffered_segment([0.0, 0.0], [10.0, 0.0], 0.1);
        let env = geom.envelope();
        assert!((env.min_x + 0.1).abs() < 1e-9);
        assert!((env.max_x - 10.1).abs() < 1e-9);
        assert!((env.max_y - 0.1).abs() < 1e-9);
        assert!(geom.parts[0].signed_area() > 0.0);
    }

    #[test]
    fn test_zero_radius_segment_is_bare_line() {
        let poly = capsule([0.0, 0.0], [1.0, 0.0], 0.0);
        assert_eq!(poly.ring.len(), 2);
        assert!(!poly.is_area());
    }

    #[test]
    fn test_closing_vertex_is_dropped() {
        let poly = Polygon::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
        assert_eq!(poly.ring.len(), 3);
        assert_eq!(poly.edges().count(), 3);
    }

    #[test]
    fn test_polyline_buffer_has_part_per_segment() {
        let geom = Geometry::buffered_polyline(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]], 0.1);
        assert_eq!(geom.parts.len(), 2);
    }
}
