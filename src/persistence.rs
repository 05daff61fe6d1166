//! Saving and restoring boards.
//!
//! A board is stored as one JSON document, a [`PersistedState`], under the
//! configured storage key of a [`KeyValueStore`]. Only the graph, rooms and
//! tags are kept; history, selection, clipboard and drag state are not.

use crate::board::Board;
use crate::config::BoardConfig;
use crate::constants::SNAPSHOT_VERSION;
use crate::error::PersistenceError;
use crate::types::{default_rooms, Edge, Node, Room, RoomId, Tag};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// String key-value storage backing board persistence.
pub trait KeyValueStore {
    /// Reads the value under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Writes `value` under `key`.
    fn set_item(&mut self, key: &str, value: String) -> Result<(), PersistenceError>;

    /// Removes the value under `key`.
    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// A store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Adapter over the storage eframe hands to `App::save`.
///
/// eframe storage cannot delete keys, so removal writes an empty value and
/// reads treat an empty value as absent.
pub struct EframeStore<'a> {
    storage: &'a mut dyn eframe::Storage,
}

impl<'a> EframeStore<'a> {
    /// Wraps eframe's storage.
    pub fn new(storage: &'a mut dyn eframe::Storage) -> Self {
        Self { storage }
    }

    /// Flushes pending writes to disk.
    pub fn flush(&mut self) {
        self.storage.flush();
    }
}

impl KeyValueStore for EframeStore<'_> {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.storage.get_string(key).filter(|v| !v.is_empty()))
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.storage.set_string(key, value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.storage.set_string(key, String::new());
        Ok(())
    }
}

/// The persisted form of a board.
///
/// `nodes` and `edges` are the live graph of the active room and win over
/// that room's entry in `rooms`. State written before rooms existed has only
/// `nodes` and `edges`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedState {
    /// Format version
    pub version: u32,
    /// Active room
    pub current_room_id: Option<RoomId>,
    /// Every room
    pub rooms: Vec<Room>,
    /// Nodes of the active room
    pub nodes: Vec<Node>,
    /// Edges of the active room
    pub edges: Vec<Edge>,
    /// Tag definitions
    pub tags: Vec<Tag>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            current_room_id: None,
            rooms: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl PersistedState {
    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Drops parent references to missing groups and edges to missing nodes.
fn sanitize_graph(nodes: &mut [Node], edges: &mut Vec<Edge>) {
    let groups: HashSet<String> = nodes
        .iter()
        .filter(|n| n.is_group())
        .map(|n| n.id.clone())
        .collect();
    for node in nodes.iter_mut() {
        let dangling = node
            .parent_id
            .as_ref()
            .is_some_and(|pid| node.is_group() || !groups.contains(pid));
        if dangling {
            log::warn!("Dropping invalid parent of node `{}`", node.id);
            node.parent_id = None;
        }
    }

    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let before = edges.len();
    edges.retain(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()));
    if edges.len() != before {
        log::warn!("Dropped {} edges with missing endpoints", before - edges.len());
    }
}

/// Drops nodes whose id was already `seen`, in this room or an earlier one.
fn drop_duplicate_ids(nodes: &mut Vec<Node>, seen: &mut HashSet<String>, room_id: &str) {
    nodes.retain(|node| {
        let fresh = seen.insert(node.id.clone());
        if !fresh {
            log::warn!("Dropping duplicate node `{}` in room `{room_id}`", node.id);
        }
        fresh
    });
}

impl Board {
    /// Captures the persistent part of the board.
    pub fn to_persisted(&self) -> PersistedState {
        let mut rooms = self.rooms.clone();
        if let Some(room) = rooms.iter_mut().find(|r| r.id == self.current_room) {
            room.nodes = self.nodes.clone();
            room.edges = self.edges.clone();
        }
        PersistedState {
            version: SNAPSHOT_VERSION,
            current_room_id: Some(self.current_room.clone()),
            rooms,
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            tags: self.tags.clone(),
        }
    }

    /// Rebuilds a board from persisted state, with empty history.
    ///
    /// State without rooms is moved into the first default room. State whose
    /// active room is unknown falls back to the first room.
    pub fn from_persisted(
        state: PersistedState,
        config: BoardConfig,
    ) -> Result<Self, PersistenceError> {
        if state.version > SNAPSHOT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: state.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let PersistedState {
            current_room_id,
            mut rooms,
            mut nodes,
            mut edges,
            tags,
            ..
        } = state;

        let mut current_room = current_room_id;
        if rooms.is_empty() {
            log::info!("Migrating room-less state into the default rooms");
            rooms = default_rooms();
            current_room = None;
        }
        let current_room = current_room
            .filter(|id| rooms.iter().any(|r| r.id == *id))
            .or_else(|| rooms.first().map(|r| r.id.clone()))
            .unwrap_or_default();

        let mut seen = HashSet::new();
        drop_duplicate_ids(&mut nodes, &mut seen, &current_room);
        sanitize_graph(&mut nodes, &mut edges);
        for room in rooms.iter_mut().filter(|r| r.id != current_room) {
            drop_duplicate_ids(&mut room.nodes, &mut seen, &room.id);
            sanitize_graph(&mut room.nodes, &mut room.edges);
        }

        let mut board = Board::new(config);
        if !tags.is_empty() {
            board.tags = tags;
        }
        board.rooms = rooms;
        board.current_room = current_room;
        board.nodes = nodes;
        board.edges = edges;
        board.sync_current_room();
        log::info!(
            "Restored board: {} rooms, {} nodes in `{}`",
            board.rooms.len(),
            board.nodes.len(),
            board.current_room
        );
        Ok(board)
    }

    /// Writes the board under the configured storage key.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        let json = self.to_persisted().to_json()?;
        store.set_item(&self.config.storage_key, json)?;
        log::debug!("Saved board under `{}`", self.config.storage_key);
        Ok(())
    }

    /// Reads a board from `store`, or returns a fresh one if nothing is saved.
    pub fn load(store: &dyn KeyValueStore, config: BoardConfig) -> Result<Self, PersistenceError> {
        match store.get_item(&config.storage_key)? {
            Some(json) => {
                let state = PersistedState::from_json(&json)?;
                Self::from_persisted(state, config)
            }
            None => {
                log::info!("No saved board under `{}`, starting fresh", config.storage_key);
                Ok(Self::new(config))
            }
        }
    }

    /// Removes the saved board from `store`.
    pub fn clear_saved(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        store.remove_item(&self.config.storage_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewNode, NodeData, NoteData};

    #[test]
    fn save_and_load_round_trip() {
        let mut board = Board::default();
        board.add_node(NewNode::group("g", "G").at(0.0, 0.0).with_size(400.0, 400.0));
        board.add_node(NewNode::note("a", "A", "body").at(10.0, 10.0).inside("g"));
        board.add_node(NewNode::bookmark("b", "B", "https://b.com").at(600.0, 0.0));
        board.connect("a", "b");
        board.switch_room("kitchen");
        board.add_node(NewNode::note("k", "K", ""));

        let mut store = MemoryStore::new();
        board.save(&mut store).unwrap();
        let restored = Board::load(&store, BoardConfig::default()).unwrap();

        assert_eq!(restored.current_room(), "kitchen");
        assert_eq!(restored.nodes(), board.nodes());
        assert!(!restored.can_undo());

        let living = restored
            .rooms()
            .iter()
            .find(|r| r.id == "living-room")
            .unwrap();
        assert_eq!(living.nodes.len(), 3);
        assert_eq!(living.edges.len(), 1);
    }

    #[test]
    fn missing_key_gives_fresh_board() {
        let store = MemoryStore::new();
        let board = Board::load(&store, BoardConfig::default()).unwrap();
        assert!(board.nodes().is_empty());
        assert_eq!(board.rooms().len(), 4);
        assert_eq!(board.tags().len(), 6);
    }

    #[test]
    fn clear_saved_removes_state() {
        let board = Board::default();
        let mut store = MemoryStore::new();
        board.save(&mut store).unwrap();
        board.clear_saved(&mut store).unwrap();
        assert!(store.get_item(&board.config().storage_key).unwrap().is_none());
    }

    #[test]
    fn legacy_state_moves_into_first_room() {
        let json = r#"{
            "nodes": [
                {"id": "g", "position": [0, 0], "data": {"kind": "group", "title": "G"}},
                {"id": "a", "position": [5, 5], "parentNode": "g",
                 "data": {"kind": "note", "title": "A", "content": ""}}
            ],
            "edges": []
        }"#;
        let state = PersistedState::from_json(json).unwrap();
        let board = Board::from_persisted(state, BoardConfig::default()).unwrap();

        assert_eq!(board.current_room(), "living-room");
        assert_eq!(board.node("a").and_then(|n| n.parent_id.as_deref()), Some("g"));
        assert_eq!(board.rooms()[0].nodes.len(), 2);
        assert_eq!(board.tags().len(), 6);

        // Written back with the canonical field name only
        let written = board.to_persisted().to_json().unwrap();
        assert!(written.contains("\"parentId\""));
        assert!(!written.contains("parentNode"));
    }

    #[test]
    fn live_nodes_win_over_stale_room_entry() {
        let mut board = Board::default();
        board.add_node(NewNode::note("a", "A", ""));
        let mut state = board.to_persisted();
        state.rooms[0].nodes.clear();

        let restored = Board::from_persisted(state, BoardConfig::default()).unwrap();
        assert_eq!(restored.rooms()[0].nodes.len(), 1);
    }

    #[test]
    fn dangling_references_are_dropped() {
        let mut board = Board::default();
        board.add_node(NewNode::note("a", "A", ""));
        board.add_node(NewNode::note("b", "B", ""));
        board.connect("a", "b");
        let mut state = board.to_persisted();
        state.nodes.retain(|n| n.id != "b");
        state.nodes[0].parent_id = Some("nowhere".into());

        let restored = Board::from_persisted(state, BoardConfig::default()).unwrap();
        assert!(restored.edges().is_empty());
        assert!(restored.node("a").is_some_and(|n| n.parent_id.is_none()));
    }

    #[test]
    fn duplicate_ids_across_rooms_keep_the_active_copy() {
        let mut board = Board::default();
        board.add_node(NewNode::note("a", "Live", ""));
        board.add_node(NewNode::note("b", "B", ""));
        let mut state = board.to_persisted();
        let kitchen = state
            .rooms
            .iter_mut()
            .find(|r| r.id == "kitchen")
            .unwrap();
        kitchen.nodes = state.nodes.clone();
        kitchen.nodes[1].id = "c".into();
        kitchen.nodes[0].data = NodeData::Note(NoteData {
            title: "Stale".into(),
            ..Default::default()
        });
        kitchen.edges = vec![Edge {
            id: "e".into(),
            source: "a".into(),
            target: "c".into(),
            stroke_color: "#c8f135".into(),
        }];

        let mut restored = Board::from_persisted(state, BoardConfig::default()).unwrap();
        assert_eq!(restored.node("a").map(|n| n.data.title()), Some("Live"));

        restored.switch_room("kitchen");
        let ids: Vec<&str> = restored.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
        assert!(restored.edges().is_empty());
    }

    #[test]
    fn newer_versions_are_rejected() {
        let state = PersistedState {
            version: SNAPSHOT_VERSION + 1,
            ..Default::default()
        };
        let err = Board::from_persisted(state, BoardConfig::default()).unwrap_err();
        assert!(matches!(err, PersistenceError::UnsupportedVersion { .. }));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let mut store = MemoryStore::new();
        let config = BoardConfig::default();
        store.set_item(&config.storage_key, "{not json".into()).unwrap();
        let err = Board::load(&store, config).unwrap_err();
        assert!(matches!(err, PersistenceError::Serialization(_)));
    }
}
