//! Editor configuration.

use std::f64::consts::PI;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::EditError;

/// Keyboard modifier held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyModifier {
    #[default]
    Ctrl,
    Shift,
    Alt,
}

/// Axis of freedom for a dragger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DragAxisMode {
    /// Follows the cursor over the ellipsoid surface.
    #[default]
    Horizontal,
    /// Moves along the local up axis, with or without the drag modifier.
    Vertical,
    /// Moves along the local up axis only while the drag modifier is held.
    VerticalConstrained,
}

impl DragAxisMode {
    /// Whether a move carrying `modifier` may drive this mode.
    ///
    /// `designated` is the configured drag modifier; any other modifier
    /// is filtered out before this is consulted.
    pub fn accepts(self, modifier: Option<KeyModifier>, designated: KeyModifier) -> bool {
        let held = modifier == Some(designated);
        match self {
            Self::Horizontal => !held,
            Self::Vertical => true,
            Self::VerticalConstrained => held,
        }
    }

    pub fn is_vertical(self) -> bool {
        !matches!(self, Self::Horizontal)
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Modifier that selects the constrained vertical gesture.
    pub drag_modifier: KeyModifier,
    /// Marker image for new draggers.
    pub marker_icon: String,
    pub default_axis_mode: DragAxisMode,
    /// Marker scale while grabbed.
    pub grab_scale: f32,
    pub idle_scale: f32,
    /// Marker diameter on screen at scale 1.
    pub marker_size_px: f32,
    /// Hit radius for non-dragger entities, and minimum for draggers.
    pub pick_tolerance_px: f32,
    /// Step, in radians, of the ellipse boundary sampler.
    pub ellipse_granularity: f64,
    pub click_slop_px: f32,
    pub double_click_secs: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drag_modifier: KeyModifier::Ctrl,
            marker_icon: "img/dragIcon.png".to_string(),
            default_axis_mode: DragAxisMode::Horizontal,
            grab_scale: 1.2,
            idle_scale: 1.0,
            marker_size_px: 32.0,
            pick_tolerance_px: 8.0,
            ellipse_granularity: 2.0,
            click_slop_px: 4.0,
            double_click_secs: 0.3,
        }
    }
}

impl EditorConfig {
    /// Parses and validates a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, EditError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EditError> {
        let positive = [
            ("grab_scale", self.grab_scale),
            ("idle_scale", self.idle_scale),
            ("marker_size_px", self.marker_size_px),
            ("pick_tolerance_px", self.pick_tolerance_px),
            ("click_slop_px", self.click_slop_px),
            ("double_click_secs", self.double_click_secs),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(EditError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }

        if !(self.ellipse_granularity > 0.0 && self.ellipse_granularity <= PI) {
            return Err(EditError::InvalidConfig(format!(
                "ellipse_granularity must be in (0, pi], got {}",
                self.ellipse_granularity
            )));
        }

        Ok(())
    }
}
