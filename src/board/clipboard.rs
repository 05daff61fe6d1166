//! Copy, cut and paste of nodes.

use super::Board;
use crate::geometry;
use crate::types::{Node, NodeId};
use chrono::Utc;
use std::collections::{HashMap, HashSet};

impl Board {
    /// Nodes held by the clipboard.
    pub fn clipboard(&self) -> &[Node] {
        &self.clipboard
    }

    /// The selected nodes plus the children of every selected group.
    fn selection_closure(&self) -> Vec<Node> {
        let selected: Vec<&Node> = self
            .nodes
            .iter()
            .filter(|n| self.selection.contains(&n.id))
            .collect();
        let selected_groups: HashSet<&str> = selected
            .iter()
            .filter(|n| n.is_group())
            .map(|n| n.id.as_str())
            .collect();

        let children = self.nodes.iter().filter(|n| {
            n.parent_id
                .as_deref()
                .is_some_and(|pid| selected_groups.contains(pid))
                && !self.selection.contains(&n.id)
        });

        selected.into_iter().chain(children).cloned().collect()
    }

    /// Copies the selection, including the contents of selected groups.
    ///
    /// Returns the number of nodes copied; with nothing selected the clipboard
    /// is left as it was.
    pub fn copy(&mut self) -> usize {
        let copied = self.selection_closure();
        if copied.is_empty() {
            return 0;
        }
        self.clipboard = copied;
        self.clipboard.len()
    }

    /// Copies the selection and removes it, with every edge touching it.
    pub fn cut(&mut self) -> usize {
        let cut = self.selection_closure();
        if cut.is_empty() {
            return 0;
        }
        let cut_ids: HashSet<NodeId> = cut.iter().map(|n| n.id.clone()).collect();

        self.record();
        self.nodes.retain(|n| !cut_ids.contains(&n.id));
        self.edges
            .retain(|e| !cut_ids.contains(&e.source) && !cut_ids.contains(&e.target));
        self.selection.clear();
        self.clipboard = cut;
        log::debug!("Cut {} nodes", self.clipboard.len());
        self.clipboard.len()
    }

    /// Pastes fresh copies of the clipboard.
    ///
    /// Every copy gets a new id. Copies whose parent was copied along stay in
    /// that parent's copy at the same relative position; the others become
    /// top-level and are moved so their centroid lands on `center`, or by the
    /// configured paste offset if no center is given. The copies become the
    /// selection. The clipboard itself is left untouched.
    ///
    /// Returns the ids of the copies.
    pub fn paste(&mut self, center: Option<(f32, f32)>) -> Vec<NodeId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }

        let copied_ids: HashSet<&str> = self.clipboard.iter().map(|n| n.id.as_str()).collect();
        let mut id_map: HashMap<&str, NodeId> = HashMap::new();
        for node in &self.clipboard {
            let mut fresh = self.fresh_id();
            while id_map.values().any(|used| *used == fresh) {
                fresh = self.fresh_id();
            }
            id_map.insert(node.id.as_str(), fresh);
        }

        let keeps_parent =
            |node: &Node| node.parent_id.as_deref().is_some_and(|pid| copied_ids.contains(pid));

        // A copied child whose group stays behind leaves its group, so start
        // from where it is on the canvas if that group still exists.
        let top_level: Vec<(&str, (f32, f32))> = self
            .clipboard
            .iter()
            .filter(|n| !keeps_parent(n))
            .map(|n| (n.id.as_str(), geometry::absolute_position(n, &self.nodes)))
            .collect();

        let offset = match center {
            Some((cx, cy)) if !top_level.is_empty() => {
                let count = top_level.len() as f32;
                let sum_x: f32 = top_level.iter().map(|(_, p)| p.0).sum();
                let sum_y: f32 = top_level.iter().map(|(_, p)| p.1).sum();
                (cx - sum_x / count, cy - sum_y / count)
            }
            _ => self.config.paste_offset,
        };

        let now = Utc::now();
        let mut pasted: Vec<Node> = Vec::with_capacity(self.clipboard.len());
        for node in &self.clipboard {
            let mut copy = node.clone();
            copy.id = id_map[node.id.as_str()].clone();
            copy.created_at = now;
            if keeps_parent(node) {
                copy.parent_id = node.parent_id.as_deref().map(|pid| id_map[pid].clone());
            } else {
                let start = top_level
                    .iter()
                    .find(|(id, _)| *id == node.id)
                    .map_or(node.position, |(_, p)| *p);
                copy.parent_id = None;
                copy.position = (start.0 + offset.0, start.1 + offset.1);
            }
            pasted.push(copy);
        }

        let ids: Vec<NodeId> = pasted.iter().map(|n| n.id.clone()).collect();
        self.record();
        let (groups, others): (Vec<Node>, Vec<Node>) = pasted.into_iter().partition(Node::is_group);
        let existing = std::mem::take(&mut self.nodes);
        self.nodes = groups.into_iter().chain(existing).chain(others).collect();
        self.selection = ids.clone();
        log::debug!("Pasted {} nodes", ids.len());
        ids
    }
}
