//! # Spatial Board
//!
//! The state engine of a spatial bookmark board: an infinite canvas holding
//! bookmarks, notes and groups, connected by edges. Supports:
//! - **Graph store**: adding, updating, deleting and connecting nodes
//! - **History**: bounded undo/redo, with drag gestures coalesced into one step
//! - **Containment**: dropping nodes into groups converts their coordinates
//! - **Clipboard**: copy, cut and paste of selections including group contents
//! - **Auto-arrange**: domain grouping, connectivity clustering and row packing
//!
//! ## Features
//! - Independent rooms, each with its own graph
//! - Tags and tag filtering
//! - Capture ingestion and pasted text
//! - Versioned persistence over any key-value store
//!
//! All state lives in an explicitly constructed [`Board`]; rendering and
//! input handling are left to the host application.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod board;
pub mod clustering;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod metadata;
pub mod persistence;
pub mod samples;
mod types;

// Re-export public types and functions
pub use board::{is_web_url, Board, CapturedPage, History, HistoryEntry, MetadataRequest};
pub use config::BoardConfig;
pub use error::{ConfigError, MetadataError, PersistenceError};
pub use metadata::{resolve_metadata, MetadataResolver, PageMetadata};
pub use persistence::{EframeStore, KeyValueStore, MemoryStore, PersistedState};
pub use types::*;
