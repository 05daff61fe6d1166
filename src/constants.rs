//! Shared board-wide constants.
//! Centralizes the default values behind [`crate::config::BoardConfig`].

// History
/// Maximum number of entries retained on each of the undo and redo stacks.
pub const MAX_HISTORY_ENTRIES: usize = 50;
/// A drag only produces a history entry if some node moved further than this on either axis.
pub const DRAG_MOVE_THRESHOLD: f32 = 0.5;

// Clipboard
/// Diagonal offset applied to pasted nodes when no target center is given.
pub const PASTE_OFFSET: f32 = 24.0;

// Placement heuristic
/// Distance from the anchor node when placing a new bookmark next to its domain siblings.
pub const PLACEMENT_RADIUS: f32 = 250.0;
/// Angle (radians) advanced per existing domain sibling.
pub const PLACEMENT_ANGLE_STEP: f32 = 0.5;
/// Diagonal step of the fallback cascade, multiplied by the current node count.
pub const PLACEMENT_CASCADE_STEP: f32 = 50.0;

// Containment
/// Group width assumed for drop-target hit testing when the group has none.
pub const CONTAINMENT_GROUP_WIDTH: f32 = 300.0;
/// Group height assumed for drop-target hit testing when the group has none.
pub const CONTAINMENT_GROUP_HEIGHT: f32 = 300.0;
/// Width assumed for a dragged node without an explicit width.
pub const CONTAINMENT_NODE_WIDTH: f32 = 180.0;
/// Height assumed for a dragged node without an explicit height.
pub const CONTAINMENT_NODE_HEIGHT: f32 = 100.0;

// Auto-arrange
/// Default node width in world units.
pub const NODE_WIDTH: f32 = 180.0;
/// Default node height in world units.
pub const NODE_HEIGHT: f32 = 120.0;
/// Inner padding between a generated domain group's border and its members.
pub const GROUP_PADDING: f32 = 60.0;
/// Gap between nodes laid out in a grid.
pub const NODE_GAP: f32 = 60.0;
/// Gap between packed blocks, horizontally and between rows.
pub const CLUSTER_GAP: f32 = 120.0;
/// Extra height reserved for a generated group's header.
pub const GROUP_HEADER: f32 = 130.0;
/// Minimum width of a generated domain group (also the block width of a sizeless group).
pub const MIN_GROUP_WIDTH: f32 = 550.0;
/// Minimum height of a generated domain group (also the block height of a sizeless group).
pub const MIN_GROUP_HEIGHT: f32 = 450.0;
/// Lower bound for the packing row width.
pub const MIN_ROW_WIDTH: f32 = 1400.0;
/// Row width as a multiple of the square root of the total block area.
pub const ROW_WIDTH_FACTOR: f32 = 1.5;

// Capture ingestion
/// Horizontal spacing of captured pages laid out as a grid.
pub const CAPTURE_COLUMN_WIDTH: f32 = 220.0;
/// Vertical spacing of captured pages laid out as a grid.
pub const CAPTURE_ROW_HEIGHT: f32 = 280.0;
/// Width given to captured or pasted bookmarks.
pub const BOOKMARK_WIDTH: f32 = 180.0;
/// Width given to pasted notes.
pub const NOTE_WIDTH: f32 = 300.0;

// Colors
/// Palette cycled through for bookmarks added without a color.
pub const BOOKMARK_COLORS: &[&str] = &["blue", "green", "amber", "purple", "pink"];
/// Palette cycled through for notes added without a color.
pub const NOTE_COLORS: &[&str] = &["purple", "teal", "orange", "pink", "blue", "lime"];
/// Stroke color of edges whose source has no known color.
pub const DEFAULT_ACCENT: &str = "#c8f135";

/// Maps a named node color to the accent hex used for edges leaving that node.
pub fn accent_hex(color: &str) -> Option<&'static str> {
    let hex = match color {
        "white" => "#94a3b8",
        "blue" => "#3b82f6",
        "green" => "#10b981",
        "amber" => "#f59e0b",
        "purple" => "#a855f7",
        "pink" => "#f472b6",
        "teal" => "#22d3ee",
        "orange" => "#f97316",
        "lime" => "#a3e635",
        "slate" => "#475569",
        _ => return None,
    };
    Some(hex)
}

// Persistence
/// Key the whole board state is stored under.
pub const STORAGE_KEY: &str = "spatial-board-state";
/// Current persisted snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;
