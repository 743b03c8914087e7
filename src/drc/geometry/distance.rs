//! Distance calculation algorithms for DRC
//!
//! Exact polygon-to-polygon distance with the pair of nearest points.
//! Overlapping or touching shapes are at distance zero.

use super::shapes::{Geometry, Polygon};

/// Result of a distance query: the gap and the points realising it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest {
    pub distance: f64,
    pub point_a: [f64; 2],
    pub point_b: [f64; 2],
}

impl Nearest {
    /// Location reported for a violation
    pub fn midpoint(&self) -> [f64; 2] {
        midpoint(self.point_a, self.point_b)
    }

    fn touching(at: [f64; 2]) -> Self {
        Self {
            distance: 0.0,
            point_a: at,
            point_b: at,
        }
    }
}

/// Minimum distance between two geometries, `None` if either is empty
pub fn geometry_distance(a: &Geometry, b: &Geometry) -> Option<Nearest> {
    let mut best: Option<Nearest> = None;
    for pa in &a.parts {
        for pb in &b.parts {
            let Some(n) = polygon_distance(pa, pb) else {
                continue;
            };
            if best.map_or(true, |cur| n.distance < cur.distance) {
                best = Some(n);
            }
            if n.distance == 0.0 {
                return best;
            }
        }
    }
    best
}

/// Minimum distance between two polygons (interiors included)
pub fn polygon_distance(a: &Polygon, b: &Polygon) -> Option<Nearest> {
    if a.ring.is_empty() || b.ring.is_empty() {
        return None;
    }

    // Containment: a vertex of one inside the other
    if a.is_area() {
        if let Some(p) = b.ring.iter().find(|p| point_in_ring(**p, &a.ring)) {
            return Some(Nearest::touching(*p));
        }
    }
    if b.is_area() {
        if let Some(p) = a.ring.iter().find(|p| point_in_ring(**p, &b.ring)) {
            return Some(Nearest::touching(*p));
        }
    }

    let mut best = Nearest {
        distance: f64::MAX,
        point_a: a.ring[0],
        point_b: b.ring[0],
    };
    for (a1, a2) in a.edges() {
        for (b1, b2) in b.edges() {
            let (d, pa, pb) = segment_distance(a1, a2, b1, b2);
            if d < best.distance {
                best = Nearest {
                    distance: d,
                    point_a: pa,
                    point_b: pb,
                };
                if d == 0.0 {
                    return Some(best);
                }
            }
        }
    }
    Some(best)
}

/// Segment-to-segment minimum distance with the nearest point on each
pub fn segment_distance(
    a1: [f64; 2],
    a2: [f64; 2],
    b1: [f64; 2],
    b2: [f64; 2],
) -> (f64, [f64; 2], [f64; 2]) {
    if let Some(p) = segment_intersection(a1, a2, b1, b2) {
        return (0.0, p, p);
    }

    let mut min_d = f64::MAX;
    let mut pa = a1;
    let mut pb = b1;

    // a1 to segment b
    let (d, p) = point_segment_distance(a1, b1, b2);
    if d < min_d {
        min_d = d;
        pa = a1;
        pb = p;
    }

    // a2 to segment b
    let (d, p) = point_segment_distance(a2, b1, b2);
    if d < min_d {
        min_d = d;
        pa = a2;
        pb = p;
    }

    // b1 to segment a
    let (d, p) = point_segment_distance(b1, a1, a2);
    if d < min_d {
        min_d = d;
        pa = p;
        pb = b1;
    }

    // b2 to segment a
    let (d, p) = point_segment_distance(b2, a1, a2);
    if d < min_d {
        min_d = d;
        pa = p;
        pb = b2;
    }

    (min_d, pa, pb)
}

/// Point-to-segment minimum distance
pub fn point_segment_distance(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> (f64, [f64; 2]) {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let ap = [p[0] - a[0], p[1] - a[1]];
    let ab_len2 = ab[0] * ab[0] + ab[1] * ab[1];

    if ab_len2 < 1e-18 {
        // Degenerate segment
        return (point_distance(p, a), a);
    }

    let t = ((ap[0] * ab[0] + ap[1] * ab[1]) / ab_len2).clamp(0.0, 1.0);
    let closest = [a[0] + t * ab[0], a[1] + t * ab[1]];

    (point_distance(p, closest), closest)
}

/// Crossing point of two segments that properly intersect
fn segment_intersection(
    a1: [f64; 2],
    a2: [f64; 2],
    b1: [f64; 2],
    b2: [f64; 2],
) -> Option<[f64; 2]> {
    let d1 = orient(b1, b2, a1);
    let d2 = orient(b1, b2, a2);
    let d3 = orient(a1, a2, b1);
    let d4 = orient(a1, a2, b2);

    let straddles = |x: f64, y: f64| (x > 0.0 && y < 0.0) || (x < 0.0 && y > 0.0);
    if !(straddles(d1, d2) && straddles(d3, d4)) {
        return None;
    }

    let r = [a2[0] - a1[0], a2[1] - a1[1]];
    let s = [b2[0] - b1[0], b2[1] - b1[1]];
    let denom = r[0] * s[1] - r[1] * s[0];
    if denom == 0.0 {
        return None;
    }
    let t = ((b1[0] - a1[0]) * s[1] - (b1[1] - a1[1]) * s[0]) / denom;
    Some([a1[0] + t * r[0], a1[1] + t * r[1]])
}

fn orient(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Even-odd ray casting; boundary points may fall either way
pub fn point_in_ring(p: [f64; 2], ring: &[[f64; 2]]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (vi, vj) = (ring[i], ring[j]);
        if (vi[1] > p[1]) != (vj[1] > p[1]) {
            let x = vj[0] + (p[1] - vj[1]) * (vi[0] - vj[0]) / (vi[1] - vj[1]);
            if p[0] < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

pub fn point_distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

/// Midpoint of two points
pub fn midpoint(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_segment_distance() {
        let (d, p) = point_segment_distance([0.0, 1.0], [0.0, 0.0], [2.0, 0.0]);
        assert!((d - 1.0).abs() < 1e-12);
        assert_eq!(p, [0.0, 0.0]);
    }

    #[test]
    fn test_crossing_segments_touch() {
        let (d, pa, _) = segment_distance([0.0, -1.0], [0.0, 1.0], [-1.0, 0.0], [1.0, 0.0]);
        assert_eq!(d, 0.0);
        assert!(point_distance(pa, [0.0, 0.0]) < 1e-12);
    }

    #[test]
    fn test_parallel_capsules() {
        let a = Geometry::buffered_segment([0.0, 0.0], [10.0, 0.0], 0.1);
        let b = Geometry::buffered_segment([0.0, 0.25], [10.0, 0.25], 0.1);
        let n = geometry_distance(&a, &b).unwrap();
        assert!((n.distance - 0.05).abs() < 1e-9);
        assert!((n.midpoint()[1] - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_contained_polygon_is_at_zero() {
        let outer = Geometry::rectangle([0.0, 0.0], 10.0, 10.0);
        let inner = Geometry::circle([1.0, 1.0], 0.5);
        let n = geometry_distance(&outer, &inner).unwrap();
        assert_eq!(n.distance, 0.0);
    }

    #[test]
    fn test_bare_line_to_rectangle() {
        let line = Geometry::buffered_segment([0.0, 3.0], [4.0, 3.0], 0.0);
        let rect = Geometry::rectangle([2.0, 0.0], 2.0, 2.0);
        let n = geometry_distance(&line, &rect).unwrap();
        assert!((n.distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_geometry_has_no_distance() {
        let a = Geometry::default();
        let b = Geometry::circle([0.0, 0.0], 1.0);
        assert!(geometry_distance(&a, &b).is_none());
    }

    #[test]
    fn test_point_in_ring() {
        let square = [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]];
        assert!(point_in_ring([1.0, 1.0], &square));
        assert!(!point_in_ring([3.0, 1.0], &square));
        assert!(!point_in_ring([1.0, 1.0], &square[..2]));
    }
}
