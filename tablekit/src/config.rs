//! Table configuration.

use serde::{Deserialize, Serialize};
use tabledom::DEFAULT_COLUMN_WIDTH;

use crate::error::ConfigError;

/// Edge tolerance for structural edits, in pixels.
pub const DEFAULT_EDIT_TOLERANCE: f32 = 5.0;

/// Edge tolerance for selection snapping, in pixels.
pub const DEFAULT_SELECTION_TOLERANCE: f32 = 2.0;

pub const DEFAULT_LINE_COLOR: &str = "#0589f3";

/// Per-editor table settings.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Tolerance used when classifying cells against a reference rectangle.
    pub edit_tolerance: f32,

    /// Tolerance used by boundary correction and selected-cell containment.
    pub selection_tolerance: f32,

    /// Width of columns created by table and column insertion.
    pub column_width: u32,

    /// Color of the selection boundary lines.
    pub line_color: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            edit_tolerance: DEFAULT_EDIT_TOLERANCE,
            selection_tolerance: DEFAULT_SELECTION_TOLERANCE,
            column_width: DEFAULT_COLUMN_WIDTH,
            line_color: DEFAULT_LINE_COLOR.to_string(),
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit_tolerance(mut self, tolerance: f32) -> Self {
        self.edit_tolerance = tolerance;
        self
    }

    pub fn selection_tolerance(mut self, tolerance: f32) -> Self {
        self.selection_tolerance = tolerance;
        self
    }

    pub fn column_width(mut self, width: u32) -> Self {
        self.column_width = width;
        self
    }

    pub fn line_color(mut self, color: impl Into<String>) -> Self {
        self.line_color = color.into();
        self
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
