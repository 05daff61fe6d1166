//! Board configuration.
//!
//! Every tunable the engines use lives here, defaulted from
//! [`crate::constants`]. A config is injected into [`crate::Board::new`].

use crate::constants::*;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Parameters of the placement heuristic used when a node is added without a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Distance from the first same-domain bookmark
    pub radius: f32,
    /// Angle advanced per same-domain bookmark
    pub angle_step: f32,
    /// Diagonal step of the fallback cascade
    pub cascade_step: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            radius: PLACEMENT_RADIUS,
            angle_step: PLACEMENT_ANGLE_STEP,
            cascade_step: PLACEMENT_CASCADE_STEP,
        }
    }
}

/// Fallback sizes used for drop-target hit testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainmentConfig {
    /// Size of a group without explicit dimensions
    pub group_size: (f32, f32),
    /// Size of a dragged node without explicit dimensions
    pub node_size: (f32, f32),
}

impl Default for ContainmentConfig {
    fn default() -> Self {
        Self {
            group_size: (CONTAINMENT_GROUP_WIDTH, CONTAINMENT_GROUP_HEIGHT),
            node_size: (CONTAINMENT_NODE_WIDTH, CONTAINMENT_NODE_HEIGHT),
        }
    }
}

/// Parameters of the auto-arrange pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of a node without an explicit width
    pub node_width: f32,
    /// Height of a node without an explicit height
    pub node_height: f32,
    /// Padding inside generated domain groups
    pub group_padding: f32,
    /// Gap between grid cells
    pub node_gap: f32,
    /// Gap between blocks and rows
    pub cluster_gap: f32,
    /// Header height reserved in generated domain groups
    pub group_header: f32,
    /// Minimum generated group width, and the block width of a group without one
    pub min_group_width: f32,
    /// Minimum generated group height, and the block height of a group without one
    pub min_group_height: f32,
    /// Floor of the packing row width
    pub min_row_width: f32,
    /// Row width relative to the square root of the total block area
    pub row_width_factor: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: NODE_WIDTH,
            node_height: NODE_HEIGHT,
            group_padding: GROUP_PADDING,
            node_gap: NODE_GAP,
            cluster_gap: CLUSTER_GAP,
            group_header: GROUP_HEADER,
            min_group_width: MIN_GROUP_WIDTH,
            min_group_height: MIN_GROUP_HEIGHT,
            min_row_width: MIN_ROW_WIDTH,
            row_width_factor: ROW_WIDTH_FACTOR,
        }
    }
}

/// Grid used when ingesting captured pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Horizontal cell size
    pub column_width: f32,
    /// Vertical cell size
    pub row_height: f32,
    /// Width of created bookmarks
    pub bookmark_width: f32,
    /// Width of notes created from pasted text
    pub note_width: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            column_width: CAPTURE_COLUMN_WIDTH,
            row_height: CAPTURE_ROW_HEIGHT,
            bookmark_width: BOOKMARK_WIDTH,
            note_width: NOTE_WIDTH,
        }
    }
}

/// Top-level board configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Capacity of each history stack
    pub history_limit: usize,
    /// Minimum per-axis movement for a drag to be recorded
    pub drag_threshold: f32,
    /// Offset applied to pastes without a target center
    pub paste_offset: (f32, f32),
    /// Placement heuristic
    pub placement: PlacementConfig,
    /// Drop-target hit testing
    pub containment: ContainmentConfig,
    /// Auto-arrange
    pub layout: LayoutConfig,
    /// Capture ingestion
    pub capture: CaptureConfig,
    /// Key the board state is persisted under
    pub storage_key: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            history_limit: MAX_HISTORY_ENTRIES,
            drag_threshold: DRAG_MOVE_THRESHOLD,
            paste_offset: (PASTE_OFFSET, PASTE_OFFSET),
            placement: PlacementConfig::default(),
            containment: ContainmentConfig::default(),
            layout: LayoutConfig::default(),
            capture: CaptureConfig::default(),
            storage_key: STORAGE_KEY.to_string(),
        }
    }
}

impl BoardConfig {
    /// Parses a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(invalid("history_limit", "must be at least 1"));
        }
        if !(self.drag_threshold >= 0.0) {
            return Err(invalid("drag_threshold", "must be non-negative"));
        }
        if self.storage_key.trim().is_empty() {
            return Err(invalid("storage_key", "cannot be empty"));
        }
        let sizes = [
            ("containment.group_size", self.containment.group_size.0),
            ("containment.group_size", self.containment.group_size.1),
            ("containment.node_size", self.containment.node_size.0),
            ("containment.node_size", self.containment.node_size.1),
            ("layout.node_width", self.layout.node_width),
            ("layout.node_height", self.layout.node_height),
            ("layout.min_group_width", self.layout.min_group_width),
            ("layout.min_group_height", self.layout.min_group_height),
            ("layout.min_row_width", self.layout.min_row_width),
            ("capture.column_width", self.capture.column_width),
            ("capture.row_height", self.capture.row_height),
        ];
        for (field, value) in sizes {
            if !(value > 0.0) {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }
        let gaps = [
            ("layout.group_padding", self.layout.group_padding),
            ("layout.node_gap", self.layout.node_gap),
            ("layout.cluster_gap", self.layout.cluster_gap),
            ("layout.group_header", self.layout.group_header),
        ];
        for (field, value) in gaps {
            if !(value >= 0.0) {
                return Err(invalid(field, format!("must be non-negative, got {value}")));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config = BoardConfig::from_json(r#"{ "history_limit": 10, "layout": { "node_gap": 20.0 } }"#)
            .expect("partial config should parse");
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.layout.node_gap, 20.0);
        assert_eq!(config.layout.node_width, NODE_WIDTH);
        assert_eq!(config.storage_key, STORAGE_KEY);
    }

    #[test]
    fn zero_history_limit_is_rejected() {
        let err = BoardConfig::from_json(r#"{ "history_limit": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "history_limit", .. }));
    }

    #[test]
    fn non_positive_size_is_rejected() {
        let err = BoardConfig::from_json(r#"{ "containment": { "group_size": [0.0, 300.0] } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("containment.group_size"));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = BoardConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn default_config_is_valid() {
        BoardConfig::default().validate().expect("defaults must validate");
    }
}
