//! Excellon drill documents

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::units::{BoundingBox, Unit};

/// Drill tool from the Excellon header (`T01C0.800`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub number: u32,
    pub diameter: f64,
}

impl Tool {
    pub fn new(number: u32, diameter: f64) -> Self {
        Self { number, diameter }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrillOperation {
    Hit { tool: Tool, x: f64, y: f64 },
    Slot {
        tool: Tool,
        start: [f64; 2],
        end: [f64; 2],
    },
}

impl DrillOperation {
    pub fn tool(&self) -> &Tool {
        match self {
            DrillOperation::Hit { tool, .. } | DrillOperation::Slot { tool, .. } => tool,
        }
    }

    /// Hit position, or slot midpoint
    pub fn center(&self) -> [f64; 2] {
        match self {
            DrillOperation::Hit { x, y, .. } => [*x, *y],
            DrillOperation::Slot { start, end, .. } => {
                [(start[0] + end[0]) / 2.0, (start[1] + end[1]) / 2.0]
            }
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let ap = BoundingBox::centered(self.tool().diameter, self.tool().diameter);
        let mut bbox = BoundingBox::empty();
        match self {
            DrillOperation::Hit { x, y, .. } => bbox.extend_at(*x, *y, &ap),
            DrillOperation::Slot { start, end, .. } => {
                bbox.extend_at(start[0], start[1], &ap);
                bbox.extend_at(end[0], end[1], &ap);
            }
        }
        bbox
    }
}

/// A parsed Excellon file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrillDocument {
    pub unit: Unit,
    pub tools: IndexMap<u32, Tool>,
    pub operations: Vec<DrillOperation>,
}

impl DrillDocument {
    pub fn new(unit: Unit) -> Self {
        Self {
            unit,
            tools: IndexMap::new(),
            operations: Vec::new(),
        }
    }

    pub fn add_tool(&mut self, tool: Tool) -> &mut Self {
        self.tools.insert(tool.number, tool);
        self
    }

    pub fn tool(&self, number: u32) -> Option<&Tool> {
        self.tools.get(&number)
    }

    pub fn add_hit(&mut self, tool: Tool, x: f64, y: f64) -> &mut Self {
        self.tools.entry(tool.number).or_insert(tool);
        self.operations.push(DrillOperation::Hit { tool, x, y });
        self
    }

    pub fn add_slot(&mut self, tool: Tool, start: [f64; 2], end: [f64; 2]) -> &mut Self {
        self.tools.entry(tool.number).or_insert(tool);
        self.operations.push(DrillOperation::Slot { tool, start, end });
        self
    }

    pub fn unit_factor(&self) -> f64 {
        self.unit.unit_factor()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for op in &self.operations {
            bbox.extend_box(&op.bounding_box());
        }
        bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_register_their_tools() {
        let mut drill = DrillDocument::new(Unit::Millimeters);
        drill
            .add_hit(Tool::new(1, 0.8), 1.0, 1.0)
            .add_slot(Tool::new(2, 1.0), [0.0, 0.0], [2.0, 0.0]);

        assert_eq!(drill.tools.len(), 2);
        assert_eq!(drill.tool(2).map(|t| t.diameter), Some(1.0));
        assert_eq!(drill.operations[1].center(), [1.0, 0.0]);
    }

    #[test]
    fn test_slot_bounding_box_includes_radius() {
        let op = DrillOperation::Slot {
            tool: Tool::new(1, 1.0),
            start: [0.0, 0.0],
            end: [2.0, 0.0],
        };
        let bbox = op.bounding_box();
        assert_eq!(bbox.min_x, -0.5);
        assert_eq!(bbox.max_x, 2.5);
        assert_eq!(bbox.height(), 1.0);
    }
}
