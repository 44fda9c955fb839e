//! Notebook configuration.

use serde::{Deserialize, Serialize};

use crate::error::SceneResult;

/// Unit used for every angle-valued parameter of the drawing API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleUnit::Degrees => angle.to_radians(),
            AngleUnit::Radians => angle,
        }
    }

    pub fn from_radians(self, angle: f64) -> f64 {
        match self {
            AngleUnit::Degrees => angle.to_degrees(),
            AngleUnit::Radians => angle,
        }
    }
}

/// Drawing defaults for a [`Notebook`](crate::notebook::Notebook).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotebookConfig {
    pub angle_unit: AngleUnit,
    /// Version string handed to the codec on write.
    pub format_version: String,
    /// Label of the layer created when drawing without selecting one.
    pub default_layer: String,
    pub quad_samples: usize,
    pub cubic_samples: usize,
    pub circle_segments: usize,
    pub ellipse_segments: usize,
    pub arc_segments: usize,
    pub corner_segments: usize,
    pub corner_radius: f64,
    pub fill_spacing_factor: f64,
    pub text_width: f64,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            angle_unit: AngleUnit::Degrees,
            format_version: "3.1".to_string(),
            default_layer: "Layer 1".to_string(),
            quad_samples: 16,
            cubic_samples: 24,
            circle_segments: 64,
            ellipse_segments: 96,
            arc_segments: 32,
            corner_segments: 8,
            corner_radius: 10.0,
            fill_spacing_factor: 0.5,
            text_width: 400.0,
        }
    }
}

impl NotebookConfig {
    /// Parse a configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NotebookConfig::default();
        assert_eq!(config.angle_unit, AngleUnit::Degrees);
        assert_eq!(config.format_version, "3.1");
        assert_eq!(config.quad_samples, 16);
        assert_eq!(config.cubic_samples, 24);
        assert!((config.fill_spacing_factor - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = NotebookConfig::from_json(r#"{"angle_unit": "radians", "arc_segments": 4}"#).unwrap();
        assert_eq!(config.angle_unit, AngleUnit::Radians);
        assert_eq!(config.arc_segments, 4);
        assert_eq!(config.ellipse_segments, 96);
        assert_eq!(config.default_layer, "Layer 1");
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = NotebookConfig::default();
        config.corner_radius = 3.5;
        let parsed = NotebookConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_angle_unit_conversion() {
        let deg = AngleUnit::Degrees;
        assert!((deg.to_radians(180.0) - std::f64::consts::PI).abs() < 1e-12);
        assert!((deg.from_radians(std::f64::consts::FRAC_PI_2) - 90.0).abs() < 1e-12);
        assert!((AngleUnit::Radians.to_radians(1.25) - 1.25).abs() < f64::EPSILON);
    }
}
