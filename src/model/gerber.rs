//! Gerber layer documents: apertures, graphics objects and region contours

use serde::{Deserialize, Serialize};

use super::units::{BoundingBox, Unit};

/// Aperture shape referenced by flashes, draws and arcs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Aperture {
    Circle { diameter: f64 },
    Rectangle { width: f64, height: f64 },
    Obround { width: f64, height: f64 },
    Polygon {
        outer_diameter: f64,
        vertices: u32,
        rotation: f64,
    },
    /// Instantiated aperture macro; only its evaluated extent is kept
    Macro { name: String, bounds: BoundingBox },
}

impl Aperture {
    /// Extent of the aperture relative to its insertion point
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Aperture::Circle { diameter } => BoundingBox::centered(*diameter, *diameter),
            Aperture::Rectangle { width, height } | Aperture::Obround { width, height } => {
                BoundingBox::centered(*width, *height)
            }
            Aperture::Polygon { outer_diameter, .. } => {
                BoundingBox::centered(*outer_diameter, *outer_diameter)
            }
            Aperture::Macro { bounds, .. } => *bounds,
        }
    }
}

/// One step of a region contour, ending at `end`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContourSegment {
    Line { end: [f64; 2] },
    Arc {
        end: [f64; 2],
        center: [f64; 2],
        clockwise: bool,
    },
}

impl ContourSegment {
    pub fn end(&self) -> [f64; 2] {
        match self {
            ContourSegment::Line { end } | ContourSegment::Arc { end, .. } => *end,
        }
    }
}

/// Closed boundary of a region: start point plus ordered segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub start: [f64; 2],
    pub segments: Vec<ContourSegment>,
}

impl Contour {
    pub fn new(start: [f64; 2]) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    pub fn line_to(mut self, end: [f64; 2]) -> Self {
        self.segments.push(ContourSegment::Line { end });
        self
    }

    pub fn arc_to(mut self, end: [f64; 2], center: [f64; 2], clockwise: bool) -> Self {
        self.segments.push(ContourSegment::Arc {
            end,
            center,
            clockwise,
        });
        self
    }

    /// Axis-aligned rectangle contour, counter-clockwise from `min`
    pub fn rectangle(min: [f64; 2], max: [f64; 2]) -> Self {
        Contour::new(min)
            .line_to([max[0], min[1]])
            .line_to(max)
            .line_to([min[0], max[1]])
            .line_to(min)
    }
}

/// Gerber graphics object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphicsObject {
    Flash {
        x: f64,
        y: f64,
        aperture: Aperture,
    },
    Draw {
        start: [f64; 2],
        end: [f64; 2],
        aperture: Aperture,
    },
    Arc {
        start: [f64; 2],
        end: [f64; 2],
        center: [f64; 2],
        clockwise: bool,
        aperture: Aperture,
    },
    Region { contours: Vec<Contour> },
}

impl GraphicsObject {
    pub fn flash(x: f64, y: f64, aperture: Aperture) -> Self {
        GraphicsObject::Flash { x, y, aperture }
    }

    pub fn draw(start: [f64; 2], end: [f64; 2], aperture: Aperture) -> Self {
        GraphicsObject::Draw {
            start,
            end,
            aperture,
        }
    }

    pub fn arc(
        start: [f64; 2],
        end: [f64; 2],
        center: [f64; 2],
        clockwise: bool,
        aperture: Aperture,
    ) -> Self {
        GraphicsObject::Arc {
            start,
            end,
            center,
            clockwise,
            aperture,
        }
    }

    pub fn region(contours: Vec<Contour>) -> Self {
        GraphicsObject::Region { contours }
    }

    pub fn aperture(&self) -> Option<&Aperture> {
        match self {
            GraphicsObject::Flash { aperture, .. }
            | GraphicsObject::Draw { aperture, .. }
            | GraphicsObject::Arc { aperture, .. } => Some(aperture),
            GraphicsObject::Region { .. } => None,
        }
    }

    /// Conservative extent in document units
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        match self {
            GraphicsObject::Flash { x, y, aperture } => {
                bbox.extend_at(*x, *y, &aperture.bounding_box());
            }
            GraphicsObject::Draw {
                start,
                end,
                aperture,
            } => {
                let ap = aperture.bounding_box();
                bbox.extend_at(start[0], start[1], &ap);
                bbox.extend_at(end[0], end[1], &ap);
            }
            GraphicsObject::Arc {
                start,
                center,
                aperture,
                ..
            } => {
                // Whole circle through start; cheaper than sweeping the arc
                let r = ((start[0] - center[0]).powi(2) + (start[1] - center[1]).powi(2)).sqrt();
                let ap = aperture.bounding_box();
                bbox.extend_at(center[0] - r, center[1] - r, &ap);
                bbox.extend_at(center[0] + r, center[1] + r, &ap);
            }
            GraphicsObject::Region { contours } => {
                for contour in contours {
                    bbox.extend(contour.start[0], contour.start[1]);
                    let mut current = contour.start;
                    for seg in &contour.segments {
                        if let ContourSegment::Arc { end, center, .. } = seg {
                            let r = ((current[0] - center[0]).powi(2)
                                + (current[1] - center[1]).powi(2))
                            .sqrt();
                            bbox.extend(center[0] - r, center[1] - r);
                            bbox.extend(center[0] + r, center[1] + r);
                            bbox.extend(end[0], end[1]);
                        } else {
                            let end = seg.end();
                            bbox.extend(end[0], end[1]);
                        }
                        current = seg.end();
                    }
                }
            }
        }
        bbox
    }
}

/// A parsed Gerber layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GerberDocument {
    pub unit: Unit,
    /// X2 `.FileFunction` attribute, e.g. `Copper,L1,Top`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_function: Option<String>,
    pub objects: Vec<GraphicsObject>,
}

impl GerberDocument {
    pub fn new(unit: Unit) -> Self {
        Self {
            unit,
            file_function: None,
            objects: Vec::new(),
        }
    }

    pub fn with_file_function(mut self, function: impl Into<String>) -> Self {
        self.file_function = Some(function.into());
        self
    }

    pub fn add_object(&mut self, object: GraphicsObject) -> &mut Self {
        self.objects.push(object);
        self
    }

    pub fn unit_factor(&self) -> f64 {
        self.unit.unit_factor()
    }

    pub fn file_function(&self) -> Option<&str> {
        self.file_function.as_deref()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for obj in &self.objects {
            bbox.extend_box(&obj.bounding_box());
        }
        bbox
    }
}
