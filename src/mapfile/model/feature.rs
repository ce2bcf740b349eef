//! Inline features and graticule settings of a layer

use super::enums::ShapeType;
use super::geometry::Point;
use serde::Serialize;

/// A shape given literally in the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub shape_type: ShapeType,
    /// One point list per POINTS block.
    pub lines: Vec<Vec<Point>>,
    pub text: Option<String>,
}

impl Feature {
    pub fn new(shape_type: ShapeType) -> Self {
        Self {
            shape_type,
            lines: Vec::new(),
            text: None,
        }
    }

    pub fn point_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }
}

/// Graticule parameters of a GRID layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Grid {
    pub label_format: Option<String>,
    pub min_arcs: f64,
    pub max_arcs: f64,
    pub min_interval: f64,
    pub max_interval: f64,
    pub min_subdivide: f64,
    pub max_subdivide: f64,
}
