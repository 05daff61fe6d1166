//! The board: canonical graph state and every operation that mutates it.
//!
//! A [`Board`] owns the nodes and edges of the active room, the inactive
//! rooms, tags, selection, clipboard and undo/redo history. All mutations go
//! through its methods; structural ones record the prior state in history.
//!
//! Operations never fail. Targeting an id that no longer exists, or acting on
//! an empty selection, clipboard or history, is a silent no-op.

mod arrange;
mod capture;
mod clipboard;
mod containment;
pub mod history;

pub use capture::{is_web_url, CapturedPage, MetadataRequest};
pub use history::{History, HistoryEntry};

use crate::clustering::find_placement;
use crate::config::BoardConfig;
use crate::constants::{accent_hex, BOOKMARK_COLORS, DEFAULT_ACCENT, NOTE_COLORS};
use crate::geometry;
use crate::types::*;
use uuid::Uuid;

/// The graph state engine.
#[derive(Debug, Clone)]
pub struct Board {
    pub(crate) config: BoardConfig,
    /// Nodes of the active room; groups come before the nodes they own
    pub(crate) nodes: Vec<Node>,
    /// Edges of the active room
    pub(crate) edges: Vec<Edge>,
    pub(crate) tags: Vec<Tag>,
    pub(crate) active_tag_filters: Vec<String>,
    pub(crate) selection: Vec<NodeId>,
    pub(crate) clipboard: Vec<Node>,
    pub(crate) history: History,
    /// All rooms; the entry for the active room is stale until it is switched away from
    pub(crate) rooms: Vec<Room>,
    pub(crate) current_room: RoomId,
    /// Node currently being dragged
    pub(crate) dragging: Option<NodeId>,
    /// Group the dragged node is currently over
    pub(crate) drop_target: Option<NodeId>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Board {
    /// Creates an empty board with the default rooms and tags.
    pub fn new(config: BoardConfig) -> Self {
        let rooms = default_rooms();
        let current_room = rooms
            .first()
            .map(|r| r.id.clone())
            .unwrap_or_default();
        Self {
            history: History::new(config.history_limit),
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            tags: default_tags(),
            active_tag_filters: Vec::new(),
            selection: Vec::new(),
            clipboard: Vec::new(),
            rooms,
            current_room,
            dragging: None,
            drop_target: None,
        }
    }

    /// The configuration this board was built with.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Nodes of the active room, in render order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges of the active room.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up a node of the active room.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Looks up an edge of the active room.
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Group nodes of the active room.
    pub fn groups(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_group())
    }

    /// Nodes parented to `group_id`.
    pub fn children_of<'a>(&'a self, group_id: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.parent_id.as_deref() == Some(group_id))
    }

    /// Absolute canvas position of a node.
    pub fn absolute_position(&self, id: &str) -> Option<(f32, f32)> {
        self.node(id)
            .map(|node| geometry::absolute_position(node, &self.nodes))
    }

    /// Undo/redo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether [`Board::undo`] would do anything.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether [`Board::redo`] would do anything.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Current `(nodes, edges)` as a history entry.
    pub(crate) fn current_entry(&self) -> HistoryEntry {
        HistoryEntry {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Records the current state before a structural mutation.
    pub(crate) fn record(&mut self) {
        let entry = self.current_entry();
        self.history.push(entry);
    }

    /// Whether `id` names a node in any room.
    pub(crate) fn id_in_use(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
            || self
                .rooms
                .iter()
                .filter(|r| r.id != self.current_room)
                .any(|r| r.nodes.iter().any(|n| n.id == id))
    }

    /// A random node id not used anywhere on the board.
    pub(crate) fn fresh_id(&self) -> NodeId {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.id_in_use(&id) {
                return id;
            }
        }
    }

    /// Records the current state explicitly.
    ///
    /// Payload edits through [`Board::update_node`] are not recorded on their own;
    /// callers coalescing a burst of edits (e.g. on field blur) call this first.
    pub fn snapshot(&mut self) {
        self.record();
    }

    /// Adds a node.
    ///
    /// Without a position, one is chosen by [`find_placement`]. Without a
    /// color, bookmarks and notes get one from their palette. Groups are
    /// inserted before every other node, anything else is appended. A parent
    /// that is not an existing group is dropped, as is any parent on a group.
    ///
    /// Returns the id, or `None` if it is already used anywhere on the board.
    pub fn add_node(&mut self, new: NewNode) -> Option<NodeId> {
        if self.id_in_use(&new.id) {
            log::warn!("add_node: id `{}` already in use, ignoring", new.id);
            return None;
        }

        let NewNode {
            id,
            mut data,
            position,
            width,
            height,
            parent_id,
        } = new;

        let parent_id = match parent_id {
            Some(pid) if data.kind() == NodeKind::Group => {
                log::warn!("add_node: group `{id}` cannot be parented to `{pid}`");
                None
            }
            Some(pid) if self.node(&pid).is_some_and(Node::is_group) => Some(pid),
            Some(pid) => {
                log::warn!("add_node: parent `{pid}` of `{id}` is not a group on this board");
                None
            }
            None => None,
        };

        // Placement yields an absolute point; a child stores it relative to its group
        let position = position.unwrap_or_else(|| {
            let placed = find_placement(&self.nodes, data.url(), &self.config.placement);
            match parent_id.as_deref().and_then(|pid| self.node(pid)) {
                Some(parent) => geometry::to_relative(placed, parent.position),
                None => placed,
            }
        });

        if data.color().is_none() {
            let palette: &[&str] = match data.kind() {
                NodeKind::Bookmark => BOOKMARK_COLORS,
                NodeKind::Note => NOTE_COLORS,
                NodeKind::Group => &[],
            };
            if !palette.is_empty() {
                data.set_color(palette[self.nodes.len() % palette.len()]);
            }
        }

        let mut node = Node::new(id.clone(), position, data);
        node.width = width;
        node.height = height;
        node.parent_id = parent_id;

        self.record();
        if node.is_group() {
            self.nodes.insert(0, node);
        } else {
            self.nodes.push(node);
        }
        log::debug!("Added node `{id}`");
        Some(id)
    }

    /// Shallow-merges `patch` into a node's payload. Not recorded in history.
    ///
    /// Returns `false` if the node no longer exists.
    pub fn update_node(&mut self, id: &str, patch: &NodePatch) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.data.apply(patch);
                true
            }
            None => {
                log::debug!("update_node: node `{id}` no longer exists");
                false
            }
        }
    }

    /// Deletes a node and every edge touching it.
    ///
    /// Deleting a group detaches its children instead of deleting them, as
    /// [`Board::remove_group`] does.
    pub fn delete_node(&mut self, id: &str) -> bool {
        let Some(node) = self.node(id) else {
            log::debug!("delete_node: node `{id}` no longer exists");
            return false;
        };
        if node.is_group() {
            return self.remove_group(id);
        }

        self.record();
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| !e.touches(id));
        self.selection.retain(|s| s != id);
        log::debug!("Deleted node `{id}`");
        true
    }

    /// Removes a group, converting its children back to absolute positions.
    ///
    /// Edges touching the group are removed with it. Returns `false` if `id`
    /// is not a group of the active room.
    pub fn remove_group(&mut self, id: &str) -> bool {
        let Some(origin) = self.node(id).filter(|n| n.is_group()).map(|g| g.position) else {
            log::debug!("remove_group: `{id}` is not a group");
            return false;
        };

        self.record();
        self.nodes.retain(|n| n.id != id);
        for child in self
            .nodes
            .iter_mut()
            .filter(|n| n.parent_id.as_deref() == Some(id))
        {
            child.position = geometry::to_absolute(child.position, origin);
            child.parent_id = None;
        }
        self.edges.retain(|e| !e.touches(id));
        self.selection.retain(|s| s != id);
        if self.drop_target.as_deref() == Some(id) {
            self.drop_target = None;
        }
        log::debug!("Removed group `{id}`");
        true
    }

    /// Connects two nodes.
    ///
    /// The stroke color is the accent of the source node's color at this
    /// moment. Returns `None` if either end is missing, the ends are the same
    /// node, or the connection already exists.
    pub fn connect(&mut self, source: &str, target: &str) -> Option<EdgeId> {
        if source == target {
            log::debug!("connect: refusing self-loop on `{source}`");
            return None;
        }
        let Some(source_node) = self.node(source) else {
            log::debug!("connect: source `{source}` no longer exists");
            return None;
        };
        if self.node(target).is_none() {
            log::debug!("connect: target `{target}` no longer exists");
            return None;
        }
        if self
            .edges
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            return None;
        }

        let stroke_color = source_node
            .data
            .color()
            .and_then(accent_hex)
            .unwrap_or(DEFAULT_ACCENT)
            .to_string();
        let edge = Edge {
            id: format!("edge-{}", Uuid::new_v4()),
            source: source.to_string(),
            target: target.to_string(),
            stroke_color,
        };
        let id = edge.id.clone();

        self.record();
        self.edges.push(edge);
        Some(id)
    }

    /// Deletes one edge.
    pub fn delete_edge(&mut self, id: &str) -> bool {
        if self.edge(id).is_none() {
            log::debug!("delete_edge: edge `{id}` no longer exists");
            return false;
        }
        self.record();
        self.edges.retain(|e| e.id != id);
        true
    }

    /// Currently selected node ids.
    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    /// Replaces the selection. Unknown ids are dropped. Not recorded in history.
    pub fn set_selection<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        let mut selection: Vec<NodeId> = Vec::new();
        for id in ids.into_iter().map(Into::into) {
            if self.node(&id).is_some() && !selection.contains(&id) {
                selection.push(id);
            }
        }
        self.selection = selection;
    }

    /// Restores the state before the most recent recorded mutation.
    pub fn undo(&mut self) -> bool {
        self.abandon_drag();
        let current = self.current_entry();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    /// Re-applies the most recently undone mutation.
    pub fn redo(&mut self) -> bool {
        self.abandon_drag();
        let current = self.current_entry();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, entry: HistoryEntry) {
        self.nodes = entry.nodes;
        self.edges = entry.edges;
        // Clear selection to avoid pointing at nodes that are gone
        self.selection.clear();
        self.drop_target = None;
    }

    /// Tags known to the board.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Adds a tag; a tag with the same id is replaced.
    pub fn add_tag(&mut self, tag: Tag) {
        match self.tags.iter_mut().find(|t| t.id == tag.id) {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
    }

    /// Removes a tag. Node payloads keep their labels.
    pub fn remove_tag(&mut self, id: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t.id != id);
        self.active_tag_filters.retain(|f| f != id);
        self.tags.len() != before
    }

    /// Tag labels currently used as a visibility filter.
    pub fn active_tag_filters(&self) -> &[String] {
        &self.active_tag_filters
    }

    /// Turns filtering by `label` on or off.
    pub fn toggle_tag_filter(&mut self, label: &str) {
        let label = label.trim().to_lowercase();
        if let Some(index) = self.active_tag_filters.iter().position(|f| *f == label) {
            self.active_tag_filters.remove(index);
        } else if !label.is_empty() {
            self.active_tag_filters.push(label);
        }
    }

    /// Nodes passing the active tag filters.
    ///
    /// With no filter active every node passes; otherwise a node passes if it
    /// carries any active tag. Groups always pass.
    pub fn visible_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |node| {
            self.active_tag_filters.is_empty()
                || match node.data.tags() {
                    Some(tags) => self.active_tag_filters.iter().any(|f| tags.contains(f)),
                    None => true,
                }
        })
    }

    /// All rooms. The active room's entry is only up to date after [`Board::sync_current_room`].
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Id of the active room.
    pub fn current_room(&self) -> &str {
        &self.current_room
    }

    /// Writes the live nodes and edges back into the active room's entry.
    pub fn sync_current_room(&mut self) {
        if let Some(room) = self.rooms.iter_mut().find(|r| r.id == self.current_room) {
            room.nodes = self.nodes.clone();
            room.edges = self.edges.clone();
        }
    }

    /// Adds an empty room. Returns `false` if the id is taken.
    pub fn add_room(&mut self, id: impl Into<RoomId>, name: impl Into<String>) -> bool {
        let id = id.into();
        if self.rooms.iter().any(|r| r.id == id) {
            return false;
        }
        self.rooms.push(Room::new(id, name));
        true
    }

    /// Makes another room active.
    ///
    /// The live graph is stored into the current room and the target room's
    /// graph becomes live. History, selection and any drag in progress are
    /// discarded. Switching to the active room or an unknown room does nothing.
    pub fn switch_room(&mut self, id: &str) -> bool {
        if id == self.current_room {
            return false;
        }
        let Some(index) = self.rooms.iter().position(|r| r.id == id) else {
            log::debug!("switch_room: unknown room `{id}`");
            return false;
        };

        self.sync_current_room();
        let target = &self.rooms[index];
        self.nodes = target.nodes.clone();
        self.edges = target.edges.clone();
        self.current_room = target.id.clone();

        self.history.clear();
        self.dragging = None;
        self.drop_target = None;
        self.selection.clear();
        log::info!(
            "Switched to room `{}` ({} nodes, {} edges)",
            self.current_room,
            self.nodes.len(),
            self.edges.len()
        );
        true
    }
}
