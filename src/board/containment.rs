//! Drag gestures and group containment.
//!
//! A drag is modeled as `drag_start`, any number of `drag_update`s and a
//! `drag_commit`. Updates move the node live and track which group it is
//! over without touching history; the commit reparents the node and records
//! the pre-drag state only if something changed.

use super::Board;
use crate::geometry::{self, find_drop_target};
use crate::types::NodeId;

impl Board {
    /// Node currently being dragged, if any.
    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    /// Group the dragged node is currently over, if any. Never persisted.
    pub fn drop_target(&self) -> Option<&str> {
        self.drop_target.as_deref()
    }

    /// Whether `group_id` is highlighted as the current drop target.
    pub fn is_drop_target(&self, group_id: &str) -> bool {
        self.drop_target.as_deref() == Some(group_id)
    }

    /// Begins dragging `id`, holding the current state aside for history.
    ///
    /// A drag that was never committed is settled first: its pre-drag state is
    /// recorded if anything moved, so it cannot leak into this gesture.
    pub fn drag_start(&mut self, id: &str) {
        if self.node(id).is_none() {
            log::debug!("drag_start: node `{id}` no longer exists");
            return;
        }
        self.settle_open_drag();

        let entry = self.current_entry();
        if self.history.begin_drag(entry).is_some() {
            log::warn!("drag_start: discarded a stale pre-drag snapshot");
        }
        self.dragging = Some(id.to_string());
        self.drop_target = None;
        log::debug!("Drag started on `{id}`");
    }

    /// Moves the dragged node so its top-left corner is at `absolute`.
    ///
    /// The stored position stays in the node's current coordinate space: a
    /// grouped node keeps its parent during the gesture. Updating a node that
    /// is not being dragged starts a drag on it if none is in progress, and is
    /// ignored otherwise.
    pub fn drag_update(&mut self, id: &str, absolute: (f32, f32)) {
        if self.dragging.as_deref() != Some(id) {
            if self.dragging.is_some() {
                log::debug!("drag_update: `{id}` is not the node being dragged");
                return;
            }
            self.drag_start(id);
            if self.dragging.is_none() {
                return;
            }
        }
        let Some(index) = self.nodes.iter().position(|n| n.id == id) else {
            return;
        };

        let parent_origin = geometry::parent_of(&self.nodes[index], &self.nodes).map(|p| p.position);
        self.nodes[index].position = match parent_origin {
            Some(origin) => geometry::to_relative(absolute, origin),
            None => absolute,
        };

        let dragged = &self.nodes[index];
        self.drop_target = if dragged.is_group() {
            None
        } else {
            find_drop_target(dragged, absolute, &self.nodes, &self.config.containment)
                .map(|group| group.id.clone())
        };
    }

    /// Ends the drag of `id`.
    ///
    /// A non-group node whose center lies inside a group becomes that group's
    /// child with a position relative to it; otherwise it becomes top-level
    /// with its absolute position. The pre-drag state is recorded if any node
    /// moved beyond the drag threshold or changed parent.
    ///
    /// Returns the node's parent after the commit.
    pub fn drag_commit(&mut self, id: &str) -> Option<NodeId> {
        if self.dragging.as_deref() != Some(id) {
            log::debug!("drag_commit: `{id}` is not being dragged");
            return None;
        }
        self.dragging = None;
        self.drop_target = None;

        let index = self.nodes.iter().position(|n| n.id == id);
        if let Some(index) = index.filter(|&i| !self.nodes[i].is_group()) {
            self.reparent_at(index);
        }

        let threshold = self.config.drag_threshold;
        if self.history.end_drag(&self.nodes, threshold) {
            log::debug!("Drag of `{id}` recorded");
        }
        index.and_then(|i| self.nodes[i].parent_id.clone())
    }

    /// Rewrites the node at `index` into the coordinate space of the group
    /// under its center, or into absolute space if there is none.
    fn reparent_at(&mut self, index: usize) {
        let absolute = geometry::absolute_position(&self.nodes[index], &self.nodes);

        let mut detached = self.nodes[index].clone();
        detached.parent_id = None;
        let target = find_drop_target(&detached, absolute, &self.nodes, &self.config.containment)
            .map(|group| (group.id.clone(), group.position));

        let node = &mut self.nodes[index];
        match target {
            Some((group_id, origin)) => {
                node.position = geometry::to_relative(absolute, origin);
                if node.parent_id.as_deref() != Some(group_id.as_str()) {
                    log::debug!("Node `{}` moved into group `{group_id}`", node.id);
                }
                node.parent_id = Some(group_id);
            }
            None => {
                if let Some(old) = node.parent_id.take() {
                    log::debug!("Node `{}` moved out of group `{old}`", node.id);
                }
                node.position = absolute;
            }
        }
    }

    /// Closes a drag that never received its commit, keeping its movement undoable.
    fn settle_open_drag(&mut self) {
        if let Some(previous) = self.dragging.take() {
            log::warn!("Drag of `{previous}` was never committed; closing it");
            self.drop_target = None;
            let threshold = self.config.drag_threshold;
            self.history.end_drag(&self.nodes, threshold);
        }
    }

    /// Drops any drag in progress without recording it.
    pub(crate) fn abandon_drag(&mut self) {
        if self.dragging.take().is_some() {
            log::debug!("Abandoning drag in progress");
        }
        self.drop_target = None;
        self.history.cancel_drag();
    }
}
