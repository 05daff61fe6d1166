//! Undo/redo history for the board.
//!
//! History is snapshot based: every entry is the complete `(nodes, edges)`
//! pair as it was before a structural mutation. Continuous drag gestures are
//! coalesced: the state at drag start is held aside and only recorded once the
//! gesture ends, and only if something actually moved.

use crate::types::{Edge, Node};
use serde::{Deserialize, Serialize};

/// A saved `(nodes, edges)` pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Nodes at the time of the snapshot
    pub nodes: Vec<Node>,
    /// Edges at the time of the snapshot
    pub edges: Vec<Edge>,
}

/// Manages undo/redo stacks and the held pre-drag snapshot.
#[derive(Debug, Clone)]
pub struct History {
    /// Stack of states that can be restored by undo; last is most recent
    undo_stack: Vec<HistoryEntry>,
    /// Stack of states that can be restored by redo; last is next
    redo_stack: Vec<HistoryEntry>,
    /// State captured at drag start, while a drag is in progress
    pre_drag: Option<HistoryEntry>,
    /// Capacity of each stack
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(crate::constants::MAX_HISTORY_ENTRIES)
    }
}

impl History {
    /// Creates an empty history keeping at most `limit` entries per stack.
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pre_drag: None,
            limit: limit.max(1),
        }
    }

    /// Records the state before a mutation.
    ///
    /// This clears the redo stack since a new action invalidates any previously undone states.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.redo_stack.clear();
        push_bounded(&mut self.undo_stack, entry, self.limit);
    }

    /// Returns true if there are states that can be restored by undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are states that can be restored by redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo entries.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo entries.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Steps back one entry.
    ///
    /// `current` is saved for redo and the state to restore is returned, or
    /// `None` (with `current` dropped) if there is nothing to undo.
    pub fn undo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let previous = self.undo_stack.pop()?;
        push_bounded(&mut self.redo_stack, current, self.limit);
        Some(previous)
    }

    /// Steps forward one entry; the mirror image of [`History::undo`].
    pub fn redo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let next = self.redo_stack.pop()?;
        push_bounded(&mut self.undo_stack, current, self.limit);
        Some(next)
    }

    /// Clears both stacks and any held drag snapshot.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pre_drag = None;
    }

    /// Whether a drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.pre_drag.is_some()
    }

    /// Holds `entry` as the pre-drag state.
    ///
    /// Returns the snapshot of a previous drag that was never ended, so the
    /// caller can settle it.
    pub fn begin_drag(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        self.pre_drag.replace(entry)
    }

    /// Ends the current drag.
    ///
    /// The held snapshot is recorded if any node in `live` moved further than
    /// `threshold` on either axis, or changed parent, relative to it;
    /// otherwise it is discarded. Returns whether an entry was recorded.
    pub fn end_drag(&mut self, live: &[Node], threshold: f32) -> bool {
        let Some(before) = self.pre_drag.take() else {
            return false;
        };
        if changed_since(&before.nodes, live, threshold) {
            self.push(before);
            true
        } else {
            false
        }
    }

    /// Drops the held drag snapshot without recording it.
    pub fn cancel_drag(&mut self) {
        self.pre_drag = None;
    }
}

/// Whether any node present in both lists moved beyond `threshold` or was reparented.
pub fn changed_since(before: &[Node], after: &[Node], threshold: f32) -> bool {
    after.iter().any(|node| {
        before.iter().find(|old| old.id == node.id).is_some_and(|old| {
            (old.position.0 - node.position.0).abs() > threshold
                || (old.position.1 - node.position.1).abs() > threshold
                || old.parent_id != node.parent_id
        })
    })
}

fn push_bounded(stack: &mut Vec<HistoryEntry>, entry: HistoryEntry, limit: usize) {
    stack.push(entry);
    // Limit history size
    if stack.len() > limit {
        let excess = stack.len() - limit;
        stack.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewNode;

    fn entry_with(id: &str, position: (f32, f32)) -> HistoryEntry {
        let new = NewNode::note(id, "", "");
        HistoryEntry {
            nodes: vec![Node::new(new.id, position, new.data)],
            edges: Vec::new(),
        }
    }

    #[test]
    fn push_clears_redo() {
        let mut history = History::new(10);
        history.push(entry_with("a", (0.0, 0.0)));
        let restored = history.undo(entry_with("a", (1.0, 1.0)));
        assert!(restored.is_some());
        assert!(history.can_redo());

        history.push(entry_with("a", (2.0, 2.0)));
        assert!(!history.can_redo());
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn stacks_drop_oldest_beyond_limit() {
        let mut history = History::new(3);
        for i in 0..5 {
            history.push(entry_with("a", (i as f32, 0.0)));
        }
        assert_eq!(history.undo_len(), 3);

        // The oldest surviving entry is the third push
        let mut last = None;
        while let Some(entry) = history.undo(HistoryEntry::default()) {
            last = Some(entry);
        }
        assert_eq!(last.unwrap().nodes[0].position, (2.0, 0.0));
        assert_eq!(history.redo_len(), 3);
    }

    #[test]
    fn undo_then_redo_round_trips_current() {
        let mut history = History::new(10);
        let before = entry_with("a", (0.0, 0.0));
        let after = entry_with("a", (50.0, 0.0));
        history.push(before.clone());

        let restored = history.undo(after.clone()).unwrap();
        assert_eq!(restored, before);
        let redone = history.redo(restored).unwrap();
        assert_eq!(redone, after);
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn empty_history_is_noop() {
        let mut history = History::new(10);
        assert!(history.undo(HistoryEntry::default()).is_none());
        assert!(history.redo(HistoryEntry::default()).is_none());
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn drag_below_threshold_is_discarded() {
        let mut history = History::new(10);
        let before = entry_with("a", (10.0, 10.0));
        history.begin_drag(before);
        assert!(history.is_dragging());

        let live = entry_with("a", (10.4, 9.6)).nodes;
        assert!(!history.end_drag(&live, 0.5));
        assert!(!history.is_dragging());
        assert!(!history.can_undo());
    }

    #[test]
    fn drag_beyond_threshold_records_pre_drag_state() {
        let mut history = History::new(10);
        let before = entry_with("a", (10.0, 10.0));
        history.begin_drag(before.clone());

        let live = entry_with("a", (10.0, 10.6)).nodes;
        assert!(history.end_drag(&live, 0.5));
        assert_eq!(history.undo(HistoryEntry::default()), Some(before));
    }

    #[test]
    fn reparenting_counts_as_change() {
        let before = entry_with("a", (10.0, 10.0)).nodes;
        let mut after = before.clone();
        after[0].parent_id = Some("g".into());
        assert!(changed_since(&before, &after, 0.5));
    }

    #[test]
    fn begin_drag_returns_unclosed_snapshot() {
        let mut history = History::new(10);
        assert!(history.begin_drag(entry_with("a", (0.0, 0.0))).is_none());
        let stale = history.begin_drag(entry_with("a", (5.0, 5.0)));
        assert_eq!(stale.unwrap().nodes[0].position, (0.0, 0.0));
    }
}
