//! Core data types for the board.
//!
//! This module defines the data model shared by every engine: positioned nodes
//! with a kind-specific payload, edges between them, tags and rooms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Opaque, caller-supplied node identifier. Unique across every room of a board.
pub type NodeId = String;

/// Edge identifier.
pub type EdgeId = String;

/// Room identifier.
pub type RoomId = String;

/// Discriminant of a node's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A saved web page
    Bookmark,
    /// A free-form text note
    Note,
    /// A frame that owns other nodes through their `parent_id`
    Group,
}

/// Payload of a bookmark node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarkData {
    /// Display title
    pub title: String,
    /// Target URL
    pub url: String,
    /// Favicon URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    /// Page description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Screenshot, either a URL or a data URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    /// Named accent color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Lowercase tag labels
    pub tags: BTreeSet<String>,
}

/// Payload of a note node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteData {
    /// Display title
    pub title: String,
    /// Note body
    pub content: String,
    /// Named accent color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Lowercase tag labels
    pub tags: BTreeSet<String>,
}

/// Payload of a group node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupData {
    /// Display title
    pub title: String,
    /// Named accent color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Set on groups generated by auto-arrange for a web domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeData {
    /// Bookmark payload
    Bookmark(BookmarkData),
    /// Note payload
    Note(NoteData),
    /// Group payload
    Group(GroupData),
}

impl NodeData {
    /// Returns the discriminant of this payload.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Bookmark(_) => NodeKind::Bookmark,
            NodeData::Note(_) => NodeKind::Note,
            NodeData::Group(_) => NodeKind::Group,
        }
    }

    /// Display title, whatever the kind.
    pub fn title(&self) -> &str {
        match self {
            NodeData::Bookmark(b) => &b.title,
            NodeData::Note(n) => &n.title,
            NodeData::Group(g) => &g.title,
        }
    }

    /// URL of a bookmark; `None` for other kinds.
    pub fn url(&self) -> Option<&str> {
        match self {
            NodeData::Bookmark(b) => Some(&b.url),
            _ => None,
        }
    }

    /// Named color, if any.
    pub fn color(&self) -> Option<&str> {
        match self {
            NodeData::Bookmark(b) => b.color.as_deref(),
            NodeData::Note(n) => n.color.as_deref(),
            NodeData::Group(g) => g.color.as_deref(),
        }
    }

    fn color_mut(&mut self) -> &mut Option<String> {
        match self {
            NodeData::Bookmark(b) => &mut b.color,
            NodeData::Note(n) => &mut n.color,
            NodeData::Group(g) => &mut g.color,
        }
    }

    /// Sets the named color.
    pub fn set_color(&mut self, color: impl Into<String>) {
        *self.color_mut() = Some(color.into());
    }

    /// Tag labels; groups carry none.
    pub fn tags(&self) -> Option<&BTreeSet<String>> {
        match self {
            NodeData::Bookmark(b) => Some(&b.tags),
            NodeData::Note(n) => Some(&n.tags),
            NodeData::Group(_) => None,
        }
    }

    /// Shallow-merges `patch` into this payload.
    ///
    /// Fields that do not exist for this kind (e.g. `content` on a bookmark) are ignored.
    pub fn apply(&mut self, patch: &NodePatch) {
        if let Some(title) = &patch.title {
            match self {
                NodeData::Bookmark(b) => b.title = title.clone(),
                NodeData::Note(n) => n.title = title.clone(),
                NodeData::Group(g) => g.title = title.clone(),
            }
        }
        if let Some(color) = &patch.color {
            *self.color_mut() = Some(color.clone());
        }
        match self {
            NodeData::Bookmark(b) => {
                if let Some(url) = &patch.url {
                    b.url = url.clone();
                }
                if let Some(favicon) = &patch.favicon {
                    b.favicon = Some(favicon.clone());
                }
                if let Some(description) = &patch.description {
                    b.description = Some(description.clone());
                }
                if let Some(screenshot) = &patch.screenshot {
                    b.screenshot = Some(screenshot.clone());
                }
                if let Some(tags) = &patch.tags {
                    b.tags = normalize_tags(tags);
                }
            }
            NodeData::Note(n) => {
                if let Some(content) = &patch.content {
                    n.content = content.clone();
                }
                if let Some(tags) = &patch.tags {
                    n.tags = normalize_tags(tags);
                }
            }
            NodeData::Group(_) => {}
        }
    }
}

/// Trims and lowercases tag labels, dropping empty ones and duplicates.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> BTreeSet<String> {
    tags.iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// A positioned item on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Stable identifier
    pub id: NodeId,
    /// Relative to the parent group's origin when `parent_id` is set, absolute otherwise
    pub position: (f32, f32),
    /// Explicit width, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// Explicit height, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// Owning group. `parentNode` is accepted when reading older state.
    #[serde(default, alias = "parentNode", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// Kind-specific payload
    pub data: NodeData,
    /// Creation time; missing in some older state, where it reads as now
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Node {
    /// Creates an unparented node at `position`.
    pub fn new(id: impl Into<NodeId>, position: (f32, f32), data: NodeData) -> Self {
        Self {
            id: id.into(),
            position,
            width: None,
            height: None,
            parent_id: None,
            data,
            created_at: Utc::now(),
        }
    }

    /// Returns the kind of this node.
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Whether this node is a group.
    pub fn is_group(&self) -> bool {
        matches!(self.data, NodeData::Group(_))
    }
}

/// Input to [`crate::Board::add_node`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewNode {
    /// Caller-supplied identifier
    pub id: NodeId,
    /// Payload
    pub data: NodeData,
    /// Position; computed by the placement heuristic when `None`
    pub position: Option<(f32, f32)>,
    /// Explicit width
    pub width: Option<f32>,
    /// Explicit height
    pub height: Option<f32>,
    /// Owning group; the position is then relative to it
    pub parent_id: Option<NodeId>,
}

impl NewNode {
    /// A node with the given payload and no position.
    pub fn new(id: impl Into<NodeId>, data: NodeData) -> Self {
        Self {
            id: id.into(),
            data,
            position: None,
            width: None,
            height: None,
            parent_id: None,
        }
    }

    /// A bookmark for `url`.
    pub fn bookmark(id: impl Into<NodeId>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(
            id,
            NodeData::Bookmark(BookmarkData {
                title: title.into(),
                url: url.into(),
                ..Default::default()
            }),
        )
    }

    /// A text note.
    pub fn note(id: impl Into<NodeId>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            id,
            NodeData::Note(NoteData {
                title: title.into(),
                content: content.into(),
                ..Default::default()
            }),
        )
    }

    /// An empty group frame.
    pub fn group(id: impl Into<NodeId>, title: impl Into<String>) -> Self {
        Self::new(
            id,
            NodeData::Group(GroupData {
                title: title.into(),
                ..Default::default()
            }),
        )
    }

    /// Places the node at `(x, y)`.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Some((x, y));
        self
    }

    /// Sets width and height.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Sets only the width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Parents the node to `group`.
    pub fn inside(mut self, group: impl Into<NodeId>) -> Self {
        self.parent_id = Some(group.into());
        self
    }
}

/// Partial payload update. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePatch {
    /// New title
    pub title: Option<String>,
    /// New URL (bookmarks)
    pub url: Option<String>,
    /// New favicon (bookmarks)
    pub favicon: Option<String>,
    /// New description (bookmarks)
    pub description: Option<String>,
    /// New screenshot (bookmarks)
    pub screenshot: Option<String>,
    /// New content (notes)
    pub content: Option<String>,
    /// New color
    pub color: Option<String>,
    /// Replacement tag list, normalized on apply
    pub tags: Option<Vec<String>>,
}

/// A direct connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Stable identifier
    pub id: EdgeId,
    /// Source node
    pub source: NodeId,
    /// Target node
    pub target: NodeId,
    /// Fixed at creation from the source node's color
    pub stroke_color: String,
}

impl Edge {
    /// Whether this edge touches `node_id` at either end.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// A named category assignable to node payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Identifier, also the label used on nodes
    pub id: String,
    /// Display label
    pub label: String,
    /// Named color
    pub color: String,
}

impl Tag {
    /// Creates a tag.
    pub fn new(id: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: color.into(),
        }
    }
}

/// The tag set a fresh board starts with.
pub fn default_tags() -> Vec<Tag> {
    [
        ("work", "Work"),
        ("personal", "Personal"),
        ("urgent", "Urgent"),
        ("idea", "Idea"),
        ("reference", "Reference"),
        ("later", "Later"),
    ]
    .into_iter()
    .map(|(id, label)| Tag::new(id, label, "slate"))
    .collect()
}

/// An independent partition of the board's graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Identifier
    pub id: RoomId,
    /// Display name
    pub name: String,
    /// Nodes, valid while the room is inactive
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Edges, valid while the room is inactive
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Room {
    /// An empty room.
    pub fn new(id: impl Into<RoomId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

/// The rooms a fresh board starts with; the first one is active.
pub fn default_rooms() -> Vec<Room> {
    vec![
        Room::new("living-room", "Living Room"),
        Room::new("kitchen", "Kitchen"),
        Room::new("bedroom", "Bedroom"),
        Room::new("toilet", "Toilet"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bookmark_creation() {
        let new = NewNode::bookmark("a", "Example", "https://example.com").at(10.0, 20.0);
        assert_eq!(new.id, "a");
        assert_eq!(new.position, Some((10.0, 20.0)));
        assert_eq!(new.data.kind(), NodeKind::Bookmark);
        assert_eq!(new.data.url(), Some("https://example.com"));
    }

    #[test]
    fn test_patch_merges_only_applicable_fields() {
        let mut data = NewNode::note("n", "Todo", "milk").data;
        data.apply(&NodePatch {
            content: Some("milk, eggs".into()),
            url: Some("https://ignored.example".into()),
            ..Default::default()
        });

        assert_eq!(data.title(), "Todo");
        assert_eq!(data.url(), None);
        if let NodeData::Note(note) = &data {
            assert_eq!(note.content, "milk, eggs");
        } else {
            panic!("Expected Note payload");
        }
    }

    #[test]
    fn test_patch_normalizes_tags() {
        let mut data = NewNode::bookmark("b", "", "https://x.com").data;
        data.apply(&NodePatch {
            tags: Some(vec![" Work ".into(), "work".into(), "".into(), "IDEA".into()]),
            ..Default::default()
        });

        let tags: Vec<&str> = data.tags().unwrap().iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["idea", "work"]);
    }

    #[test]
    fn test_group_has_no_tags() {
        let mut data = NewNode::group("g", "Frame").data;
        data.apply(&NodePatch {
            tags: Some(vec!["work".into()]),
            color: Some("blue".into()),
            ..Default::default()
        });
        assert!(data.tags().is_none());
        assert_eq!(data.color(), Some("blue"));
    }

    #[test]
    fn test_node_json_shape() {
        let node = Node::new("a", (1.0, 2.0), NewNode::note("a", "T", "C").data);
        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(value["data"]["kind"], "note");
        assert_eq!(value["position"], json!([1.0, 2.0]));
        assert!(value.get("parentId").is_none());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_legacy_parent_alias_is_read() {
        let value = json!({
            "id": "child",
            "position": [5.0, 5.0],
            "parentNode": "group-1",
            "data": { "kind": "bookmark", "title": "t", "url": "https://a.com" },
            "createdAt": "2024-01-01T00:00:00Z"
        });
        let node: Node = serde_json::from_value(value).unwrap();
        assert_eq!(node.parent_id.as_deref(), Some("group-1"));

        let written = serde_json::to_value(&node).unwrap();
        assert_eq!(written["parentId"], "group-1");
        assert!(written.get("parentNode").is_none());
    }

    #[test]
    fn test_default_rooms_and_tags() {
        let rooms = default_rooms();
        assert_eq!(rooms.len(), 4);
        assert_eq!(rooms[0].id, "living-room");
        assert!(rooms.iter().all(|r| r.nodes.is_empty() && r.edges.is_empty()));

        let tags = default_tags();
        assert_eq!(tags.len(), 6);
        assert!(tags.iter().all(|t| t.color == "slate"));
    }

    #[test]
    fn test_edge_touches() {
        let edge = Edge {
            id: "e".into(),
            source: "a".into(),
            target: "b".into(),
            stroke_color: "#fff".into(),
        };
        assert!(edge.touches("a"));
        assert!(edge.touches("b"));
        assert!(!edge.touches("c"));
    }
}
