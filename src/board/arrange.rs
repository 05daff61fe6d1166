//! One-shot automatic layout of the whole board.
//!
//! Strategy:
//! - Ungrouped bookmarks sharing a domain (two or more) are moved into a new
//!   group for that domain, laid out as a grid inside it.
//! - The remaining ungrouped nodes are clustered by edge connectivity.
//! - Groups and clusters become blocks, packed left to right into rows.
//!
//! The result depends only on the graph and its ordering; there is no randomness.

use super::Board;
use crate::clustering::extract_domain;
use crate::config::LayoutConfig;
use crate::types::{GroupData, Node, NodeData, NodeId, NodeKind};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Disjoint-set forest over indices, with path compression.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

/// A unit of the packing pass.
struct Block {
    /// Nodes placed by this block; a group block holds just the group
    members: Vec<NodeId>,
    width: f32,
    height: f32,
    /// Grid cell size used for multi-node blocks
    cell: (f32, f32),
    is_group: bool,
}

impl Block {
    fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Number of grid columns for `count` items: the ceiling of its square root.
fn grid_columns(count: usize) -> usize {
    ((count as f32).sqrt().ceil() as usize).max(1)
}

/// Row-major grid offset of item `index`.
fn grid_offset(index: usize, columns: usize, cell: (f32, f32), gap: f32) -> (f32, f32) {
    let col = (index % columns) as f32;
    let row = (index / columns) as f32;
    (col * (cell.0 + gap), row * (cell.1 + gap))
}

/// Orders blocks: groups first, then by descending area. Stable for equal keys.
fn sort_blocks(blocks: &mut [Block]) {
    blocks.sort_by(|a, b| {
        b.is_group
            .cmp(&a.is_group)
            .then_with(|| b.area().partial_cmp(&a.area()).unwrap_or(Ordering::Equal))
    });
}

/// Packs blocks into rows and returns each block's origin.
fn pack_rows(blocks: &[Block], layout: &LayoutConfig) -> Vec<(f32, f32)> {
    let gap = layout.cluster_gap;
    let total_area: f32 = blocks
        .iter()
        .map(|b| (b.width + gap) * (b.height + gap))
        .sum();
    let max_row_width = layout
        .min_row_width
        .max(total_area.sqrt() * layout.row_width_factor);

    let (mut x, mut y, mut row_height) = (0.0_f32, 0.0_f32, 0.0_f32);
    let mut origins = Vec::with_capacity(blocks.len());
    for block in blocks {
        if x > 0.0 && x + block.width > max_row_width {
            x = 0.0;
            y += row_height + gap;
            row_height = 0.0;
        }
        origins.push((x, y));
        x += block.width + gap;
        row_height = row_height.max(block.height);
    }
    origins
}

impl Board {
    /// Lays out the whole active room in one recorded step.
    ///
    /// Returns `false` (and records nothing) on an empty board.
    pub fn auto_arrange(&mut self) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        let layout = self.config.layout.clone();

        let existing_groups: Vec<Node> = self.nodes.iter().filter(|n| n.is_group()).cloned().collect();
        let group_ids: HashSet<&str> = existing_groups.iter().map(|g| g.id.as_str()).collect();
        let is_grouped = |n: &Node| {
            n.parent_id
                .as_deref()
                .is_some_and(|pid| group_ids.contains(pid))
        };

        let children: Vec<Node> = self
            .nodes
            .iter()
            .filter(|n| !n.is_group() && is_grouped(*n))
            .cloned()
            .collect();
        let top_bookmarks: Vec<&Node> = self
            .nodes
            .iter()
            .filter(|n| n.kind() == NodeKind::Bookmark && !is_grouped(*n))
            .collect();
        let top_notes: Vec<&Node> = self
            .nodes
            .iter()
            .filter(|n| n.kind() == NodeKind::Note && !is_grouped(*n))
            .collect();

        // Ungrouped bookmarks by domain, in order of first appearance
        let mut domains: Vec<(String, Vec<&Node>)> = Vec::new();
        for &bookmark in &top_bookmarks {
            let Some(domain) = bookmark.data.url().and_then(extract_domain) else {
                continue;
            };
            match domains.iter_mut().find(|(d, _)| *d == domain) {
                Some((_, members)) => members.push(bookmark),
                None => domains.push((domain, vec![bookmark])),
            }
        }

        let mut new_groups: Vec<Node> = Vec::new();
        let mut new_children: Vec<Node> = Vec::new();
        let mut domain_grouped: HashSet<&str> = HashSet::new();
        for (domain, members) in &domains {
            if members.len() < 2 || self.has_domain_group(&existing_groups, domain) {
                continue;
            }
            let group_id = self.domain_group_id(domain, &new_groups);
            let columns = grid_columns(members.len());
            let rows = members.len().div_ceil(columns);
            let cell = (layout.node_width, layout.node_height);
            let width = columns as f32 * cell.0
                + (columns - 1) as f32 * layout.node_gap
                + layout.group_padding * 2.0;
            let height = rows as f32 * cell.1
                + (rows - 1) as f32 * layout.node_gap
                + layout.group_padding * 2.0
                + layout.group_header;

            let mut group = Node::new(
                group_id.clone(),
                (0.0, 0.0),
                NodeData::Group(GroupData {
                    title: domain.to_uppercase(),
                    color: None,
                    domain: Some(domain.clone()),
                }),
            );
            group.width = Some(width.max(layout.min_group_width));
            group.height = Some(height.max(layout.min_group_height));
            new_groups.push(group);

            for (i, member) in members.iter().enumerate() {
                let (dx, dy) = grid_offset(i, columns, cell, layout.node_gap);
                let mut child = (*member).clone();
                child.parent_id = Some(group_id.clone());
                child.position = (layout.group_padding + dx, layout.group_padding + dy);
                new_children.push(child);
                domain_grouped.insert(member.id.as_str());
            }
        }

        let remaining: Vec<Node> = top_bookmarks
            .iter()
            .filter(|n| !domain_grouped.contains(n.id.as_str()))
            .chain(top_notes.iter())
            .map(|n| {
                let mut node = (*n).clone();
                node.parent_id = None;
                node
            })
            .collect();

        // Connectivity clusters among the remaining nodes
        let index_of: HashMap<&str, usize> = remaining
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();
        let mut forest = UnionFind::new(remaining.len());
        for edge in &self.edges {
            if let (Some(&a), Some(&b)) = (
                index_of.get(edge.source.as_str()),
                index_of.get(edge.target.as_str()),
            ) {
                forest.union(a, b);
            }
        }
        let mut clusters: Vec<Vec<usize>> = Vec::new();
        let mut cluster_of_root: HashMap<usize, usize> = HashMap::new();
        for i in 0..remaining.len() {
            let root = forest.find(i);
            let slot = *cluster_of_root.entry(root).or_insert_with(|| {
                clusters.push(Vec::new());
                clusters.len() - 1
            });
            clusters[slot].push(i);
        }

        let mut blocks: Vec<Block> = existing_groups
            .iter()
            .chain(new_groups.iter())
            .map(|group| {
                let width = group.width.unwrap_or(layout.min_group_width);
                let height = group.height.unwrap_or(layout.min_group_height);
                Block {
                    members: vec![group.id.clone()],
                    width,
                    height,
                    cell: (width, height),
                    is_group: true,
                }
            })
            .collect();
        for cluster in &clusters {
            let members: Vec<&Node> = cluster.iter().map(|&i| &remaining[i]).collect();
            let columns = grid_columns(members.len());
            let rows = members.len().div_ceil(columns);
            let cell_w = members
                .iter()
                .map(|n| n.width.unwrap_or(layout.node_width))
                .fold(0.0, f32::max);
            let cell_h = members
                .iter()
                .map(|n| n.height.unwrap_or(layout.node_height))
                .fold(0.0, f32::max);
            blocks.push(Block {
                members: members.iter().map(|n| n.id.clone()).collect(),
                width: columns as f32 * cell_w + (columns - 1) as f32 * layout.node_gap,
                height: rows as f32 * cell_h + (rows - 1) as f32 * layout.node_gap,
                cell: (cell_w, cell_h),
                is_group: false,
            });
        }

        let existing_count = existing_groups.len();
        let new_group_count = new_groups.len();
        sort_blocks(&mut blocks);
        let origins = pack_rows(&blocks, &layout);

        let mut positions: HashMap<NodeId, (f32, f32)> = HashMap::new();
        for (block, origin) in blocks.iter().zip(&origins) {
            let columns = grid_columns(block.members.len());
            for (i, id) in block.members.iter().enumerate() {
                let (dx, dy) = grid_offset(i, columns, block.cell, layout.node_gap);
                positions.insert(id.clone(), (origin.0 + dx, origin.1 + dy));
            }
        }

        let place = |mut node: Node| {
            if let Some(position) = positions.get(&node.id) {
                node.position = *position;
            }
            node
        };
        let arranged: Vec<Node> = existing_groups
            .into_iter()
            .chain(new_groups)
            .map(&place)
            .chain(children)
            .chain(new_children)
            .chain(remaining.into_iter().map(&place))
            .collect();

        log::info!(
            "Auto-arrange placed {} blocks in {} rows ({} groups, {} new for domains)",
            blocks.len(),
            origins
                .iter()
                .map(|o| o.1.to_bits())
                .collect::<HashSet<_>>()
                .len(),
            existing_count + new_group_count,
            new_group_count
        );

        self.record();
        self.nodes = arranged;
        true
    }

    /// Whether a group for `domain` already exists, either tagged with the
    /// domain or carrying the conventional `group-<domain>` id.
    fn has_domain_group(&self, groups: &[Node], domain: &str) -> bool {
        let conventional = format!("group-{domain}");
        groups.iter().any(|g| {
            g.id == conventional
                || matches!(&g.data, NodeData::Group(data) if data.domain.as_deref() == Some(domain))
        })
    }

    /// `group-<domain>`, unless that id is taken somewhere on the board.
    fn domain_group_id(&self, domain: &str, pending: &[Node]) -> NodeId {
        let conventional = format!("group-{domain}");
        let taken = |id: &str| self.id_in_use(id) || pending.iter().any(|g| g.id == id);
        if !taken(&conventional) {
            return conventional;
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{conventional}-{suffix}");
            if !taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(width: f32, height: f32, is_group: bool) -> Block {
        Block {
            members: vec![format!("{width}x{height}")],
            width,
            height,
            cell: (width, height),
            is_group,
        }
    }

    #[test]
    fn union_find_merges_transitively() {
        let mut forest = UnionFind::new(5);
        forest.union(0, 1);
        forest.union(3, 4);
        forest.union(1, 4);
        assert_eq!(forest.find(0), forest.find(3));
        assert_ne!(forest.find(0), forest.find(2));
    }

    #[test]
    fn grid_columns_is_ceil_sqrt() {
        assert_eq!(grid_columns(1), 1);
        assert_eq!(grid_columns(2), 2);
        assert_eq!(grid_columns(4), 2);
        assert_eq!(grid_columns(5), 3);
        assert_eq!(grid_columns(10), 4);
    }

    #[test]
    fn groups_sort_first_then_by_area() {
        let mut blocks = vec![
            block(100.0, 100.0, false),
            block(550.0, 450.0, true),
            block(400.0, 400.0, false),
            block(600.0, 500.0, true),
        ];
        sort_blocks(&mut blocks);
        let order: Vec<(f32, bool)> = blocks.iter().map(|b| (b.width, b.is_group)).collect();
        assert_eq!(order, vec![(600.0, true), (550.0, true), (400.0, false), (100.0, false)]);
    }

    #[test]
    fn rows_wrap_at_max_width() {
        let layout = LayoutConfig::default();
        // Three 600-wide blocks: total area keeps the row bound at its 1400 floor
        let blocks = vec![
            block(600.0, 100.0, false),
            block(600.0, 200.0, false),
            block(600.0, 100.0, false),
        ];
        let origins = pack_rows(&blocks, &layout);
        assert_eq!(origins[0], (0.0, 0.0));
        assert_eq!(origins[1], (720.0, 0.0));
        // 1440 + 600 > 1400 => new row below the tallest block of the first row
        assert_eq!(origins[2], (0.0, 320.0));
    }

    #[test]
    fn oversized_first_block_does_not_wrap() {
        let layout = LayoutConfig::default();
        let blocks = vec![block(5000.0, 100.0, false)];
        assert_eq!(pack_rows(&blocks, &layout), vec![(0.0, 0.0)]);
    }
}
