//! Drawing tools and named presets.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{SceneError, SceneResult};
use crate::scene::{Pen, PenColor, Stroke, StrokePoint};

/// Pen settings copied into every committed stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub pen: Pen,
    pub color: PenColor,
    pub width: u8,
    pub pressure: u8,
    pub thickness_scale: f64,
}

impl Default for Tool {
    fn default() -> Self {
        Self::new(Pen::Ballpoint1)
    }
}

impl Tool {
    /// Black tool of width 2 and pressure 100.
    pub fn new(pen: Pen) -> Self {
        Self {
            pen,
            color: PenColor::Black,
            width: 2,
            pressure: 100,
            thickness_scale: 1.0,
        }
    }

    /// Set the pen color.
    pub fn with_color(mut self, color: PenColor) -> Self {
        self.color = color;
        self
    }

    /// Set the per-point width.
    pub fn with_width(mut self, width: u8) -> Self {
        self.width = width;
        self
    }

    /// Set the per-point pressure.
    pub fn with_pressure(mut self, pressure: u8) -> Self {
        self.pressure = pressure;
        self
    }

    /// Set the stroke thickness scale.
    pub fn with_thickness_scale(mut self, thickness_scale: f64) -> Self {
        self.thickness_scale = thickness_scale;
        self
    }

    /// Width after applying the thickness scale.
    pub fn effective_width(&self) -> f64 {
        f64::from(self.width) * self.thickness_scale
    }

    /// A stroke point at `position` with this tool's width and pressure.
    pub fn stamp(&self, position: Point) -> StrokePoint {
        StrokePoint::new(position.x, position.y, self.width, self.pressure)
    }

    /// Wrap `points` in a stroke carrying this tool's pen, color and scale.
    pub fn stroke(&self, points: Vec<StrokePoint>) -> Stroke {
        Stroke {
            pen: self.pen,
            color: self.color,
            points,
            thickness_scale: self.thickness_scale,
            starting_length: 0.0,
        }
    }

    /// Best-effort tool for a stroke read back from a file.
    ///
    /// Width and pressure are the maxima over the stroke's points, since the
    /// per-point values are all that survive serialization.
    pub fn inferred_from(stroke: &Stroke) -> Self {
        Self {
            pen: stroke.pen,
            color: stroke.color,
            width: stroke.max_width(),
            pressure: stroke.max_pressure(),
            thickness_scale: stroke.thickness_scale,
        }
    }
}

/// Named tools.
#[derive(Debug, Clone, PartialEq)]
pub struct Presets {
    tools: BTreeMap<String, Tool>,
}

impl Default for Presets {
    fn default() -> Self {
        let mut tools = BTreeMap::new();
        tools.insert("ballpoint".to_string(), Tool::new(Pen::Ballpoint1));
        tools.insert("fineliner".to_string(), Tool::new(Pen::Fineliner1));
        tools.insert("marker".to_string(), Tool::new(Pen::Marker1).with_width(4));
        tools.insert(
            "pencil".to_string(),
            Tool::new(Pen::Pencil1).with_pressure(80),
        );
        tools.insert(
            "highlighter".to_string(),
            Tool::new(Pen::Highlighter1)
                .with_color(PenColor::Yellow)
                .with_width(15),
        );
        Self { tools }
    }
}

impl Presets {
    /// Look up a preset; unknown names are an `UnknownPreset` error.
    pub fn get(&self, name: &str) -> SceneResult<Tool> {
        self.tools
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::UnknownPreset(name.to_string()))
    }

    /// Add or replace a preset.
    pub fn define(&mut self, name: impl Into<String>, tool: Tool) {
        self.tools.insert(name.into(), tool);
    }

    /// Preset names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }
}
