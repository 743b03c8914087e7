//! Declared units and axis-aligned bounding boxes

use serde::{Deserialize, Serialize};

/// Unit declared by a Gerber (`%MO`) or Excellon (`METRIC`/`INCH`) header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    #[default]
    Millimeters,
    Inches,
}

impl Unit {
    /// Factor such that `factor * v` is `v` expressed in millimetres
    pub fn unit_factor(self) -> f64 {
        match self {
            Unit::Millimeters => 1.0,
            Unit::Inches => 25.4,
        }
    }

    pub fn to_mm(self, value: f64) -> f64 {
        value * self.unit_factor()
    }
}

/// Axis-aligned bounding box; starts empty and grows with `extend`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn from_corners(min: [f64; 2], max: [f64; 2]) -> Self {
        Self {
            min_x: min[0],
            min_y: min[1],
            max_x: max[0],
            max_y: max[1],
        }
    }

    /// Box centred on the origin
    pub fn centered(width: f64, height: f64) -> Self {
        Self::from_corners([-width / 2.0, -height / 2.0], [width / 2.0, height / 2.0])
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn extend(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn extend_box(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.extend(other.min_x, other.min_y);
        self.extend(other.max_x, other.max_y);
    }

    /// Copy of `other` translated to `(x, y)` merged into this box
    pub fn extend_at(&mut self, x: f64, y: f64, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.extend(x + other.min_x, y + other.min_y);
        self.extend(x + other.max_x, y + other.max_y);
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_x - self.min_x }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_y - self.min_y }
    }
}
