//! R-tree index over geometry envelopes
//!
//! Neighbour queries are a superset filter: every geometry within the search
//! distance is returned, possibly with extra candidates that callers reject
//! by exact distance.

use rstar::{RTree, RTreeObject, AABB};

use super::shapes::Geometry;
use crate::model::BoundingBox;

/// Envelope of one indexed geometry, keyed by insertion index
#[derive(Clone, Debug)]
pub struct IndexedEnvelope {
    pub index: usize,
    pub bounds: AABB<[f64; 2]>,
}

impl IndexedEnvelope {
    pub fn new(index: usize, bbox: &BoundingBox) -> Self {
        let bounds = AABB::from_corners([bbox.min_x, bbox.min_y], [bbox.max_x, bbox.max_y]);
        Self { index, bounds }
    }
}

impl RTreeObject for IndexedEnvelope {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl rstar::PointDistance for IndexedEnvelope {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.bounds.distance_2(point)
    }
}

/// Per-layer neighbour index; bulk-loaded on first query
#[derive(Default)]
pub struct SpatialIndex {
    entries: Vec<IndexedEnvelope>,
    len: usize,
    tree: Option<RTree<IndexedEnvelope>>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index built from `geoms`; entry `i` refers to `geoms[i]`
    pub fn from_geometries(geoms: &[Geometry]) -> Self {
        let mut index = Self::new();
        index.insert_all(geoms);
        index.build();
        index
    }

    /// Adds a geometry and returns its index. Empty geometries take an index
    /// but are never returned by queries.
    pub fn insert(&mut self, geom: &Geometry) -> usize {
        let index = self.len;
        self.len += 1;
        let bbox = geom.envelope();
        if !bbox.is_empty() {
            self.entries.push(IndexedEnvelope::new(index, &bbox));
            // Late insert invalidates a built tree
            self.tree = None;
        }
        index
    }

    pub fn insert_all(&mut self, geoms: &[Geometry]) {
        for geom in geoms {
            self.insert(geom);
        }
    }

    /// Bulk-loads the tree; further calls are no-ops until the next insert
    pub fn build(&mut self) {
        if self.tree.is_none() {
            self.tree = Some(RTree::bulk_load(self.entries.clone()));
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indices of geometries whose envelope meets `geom`'s envelope expanded
    /// by `distance`, ascending. May include `geom`'s own index.
    pub fn query_neighbors(&mut self, geom: &Geometry, distance: f64) -> Vec<usize> {
        let bbox = geom.envelope();
        if bbox.is_empty() {
            return Vec::new();
        }
        self.build();
        let Some(tree) = self.tree.as_ref() else {
            return Vec::new();
        };

        // R-tree query with clearance expansion
        let search_bounds = AABB::from_corners(
            [bbox.min_x - distance, bbox.min_y - distance],
            [bbox.max_x + distance, bbox.max_y + distance],
        );

        let mut found: Vec<usize> = tree
            .locate_in_envelope_intersecting(&search_bounds)
            .map(|e| e.index)
            .collect();
        found.sort_unstable();
        found
    }
}
