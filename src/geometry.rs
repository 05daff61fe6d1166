//! Geometry and containment utilities.
//!
//! Pure functions over node positions: converting between the absolute canvas
//! space and the parent-relative space of grouped nodes, and hit testing a
//! dragged node against group bounds.

use crate::config::ContainmentConfig;
use crate::types::Node;
use egui::{pos2, vec2, Pos2, Rect};

/// Converts a stored position tuple into an egui point.
pub fn to_pos(position: (f32, f32)) -> Pos2 {
    pos2(position.0, position.1)
}

/// Converts an egui point back into the stored tuple form.
pub fn from_pos(pos: Pos2) -> (f32, f32) {
    (pos.x, pos.y)
}

/// Converts a parent-relative position into absolute canvas coordinates.
pub fn to_absolute(relative: (f32, f32), parent_origin: (f32, f32)) -> (f32, f32) {
    from_pos(to_pos(parent_origin) + to_pos(relative).to_vec2())
}

/// Converts an absolute position into coordinates relative to `parent_origin`.
pub fn to_relative(absolute: (f32, f32), parent_origin: (f32, f32)) -> (f32, f32) {
    from_pos((to_pos(absolute) - to_pos(parent_origin)).to_pos2())
}

/// Absolute position of `node`, resolving its parent among `nodes`.
///
/// A node whose parent cannot be found is treated as top-level.
pub fn absolute_position(node: &Node, nodes: &[Node]) -> (f32, f32) {
    match parent_of(node, nodes) {
        Some(parent) => to_absolute(node.position, parent.position),
        None => node.position,
    }
}

/// Looks up the group `node` is parented to.
pub fn parent_of<'a>(node: &Node, nodes: &'a [Node]) -> Option<&'a Node> {
    let parent_id = node.parent_id.as_deref()?;
    nodes.iter().find(|n| n.id == parent_id)
}

/// Bounding box of a group. Groups are never parented, so their position is absolute.
pub fn group_bounds(group: &Node, default_size: (f32, f32)) -> Rect {
    let width = group.width.unwrap_or(default_size.0);
    let height = group.height.unwrap_or(default_size.1);
    Rect::from_min_size(to_pos(group.position), vec2(width, height))
}

/// Center of `node` if its top-left corner were at `absolute`.
pub fn center_at(node: &Node, absolute: (f32, f32), default_size: (f32, f32)) -> Pos2 {
    let width = node.width.unwrap_or(default_size.0);
    let height = node.height.unwrap_or(default_size.1);
    to_pos(absolute) + vec2(width / 2.0, height / 2.0)
}

/// Whether `point` lies strictly inside `rect` (points on the border are outside).
pub fn strictly_contains(rect: Rect, point: Pos2) -> bool {
    point.x > rect.min.x && point.x < rect.max.x && point.y > rect.min.y && point.y < rect.max.y
}

/// Returns the first group, in `nodes` order, whose bounds strictly contain the
/// center of `dragged` placed at the absolute position `absolute`.
pub fn find_drop_target<'a>(
    dragged: &Node,
    absolute: (f32, f32),
    nodes: &'a [Node],
    config: &ContainmentConfig,
) -> Option<&'a Node> {
    let center = center_at(dragged, absolute, config.node_size);
    nodes.iter().find(|candidate| {
        candidate.is_group()
            && candidate.id != dragged.id
            && strictly_contains(group_bounds(candidate, config.group_size), center)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewNode;

    fn node(new: NewNode) -> Node {
        let mut node = Node::new(new.id, new.position.unwrap_or((0.0, 0.0)), new.data);
        node.width = new.width;
        node.height = new.height;
        node.parent_id = new.parent_id;
        node
    }

    #[test]
    fn relative_and_absolute_are_inverse() {
        let parent = (120.0, -40.0);
        let absolute = (300.0, 75.5);
        let relative = to_relative(absolute, parent);
        assert_eq!(relative, (180.0, 115.5));
        assert_eq!(to_absolute(relative, parent), absolute);
    }

    #[test]
    fn absolute_position_adds_parent_origin() {
        let group = node(NewNode::group("g", "G").at(100.0, 200.0));
        let child = node(NewNode::note("c", "", "").at(10.0, 20.0).inside("g"));
        let nodes = vec![group, child.clone()];
        assert_eq!(absolute_position(&child, &nodes), (110.0, 220.0));
    }

    #[test]
    fn missing_parent_is_treated_as_top_level() {
        let orphan = node(NewNode::note("c", "", "").at(10.0, 20.0).inside("gone"));
        assert_eq!(absolute_position(&orphan, &[]), (10.0, 20.0));
    }

    #[test]
    fn border_points_are_outside() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 100.0));
        assert!(strictly_contains(rect, pos2(50.0, 50.0)));
        assert!(!strictly_contains(rect, pos2(0.0, 50.0)));
        assert!(!strictly_contains(rect, pos2(50.0, 100.0)));
    }

    #[test]
    fn drop_target_uses_center_of_dragged_node() {
        let config = ContainmentConfig::default();
        let group = node(NewNode::group("g", "G").at(0.0, 0.0).with_size(300.0, 300.0));
        let dragged = node(NewNode::note("n", "", "").with_size(100.0, 100.0));
        let nodes = vec![group, dragged.clone()];

        // top-left at (100,100) puts the center at (150,150)
        let hit = find_drop_target(&dragged, (100.0, 100.0), &nodes, &config);
        assert_eq!(hit.map(|g| g.id.as_str()), Some("g"));

        // center at (310,310) is outside
        let miss = find_drop_target(&dragged, (260.0, 260.0), &nodes, &config);
        assert!(miss.is_none());
    }

    #[test]
    fn first_matching_group_wins() {
        let config = ContainmentConfig::default();
        let first = node(NewNode::group("first", "").at(0.0, 0.0));
        let second = node(NewNode::group("second", "").at(50.0, 50.0));
        let dragged = node(NewNode::note("n", "", "").with_size(20.0, 20.0));
        let nodes = vec![first, second, dragged.clone()];

        let hit = find_drop_target(&dragged, (100.0, 100.0), &nodes, &config);
        assert_eq!(hit.map(|g| g.id.as_str()), Some("first"));
    }

    #[test]
    fn group_default_size_applies() {
        let group = node(NewNode::group("g", "").at(10.0, 10.0));
        let rect = group_bounds(&group, (300.0, 300.0));
        assert_eq!(rect.max, pos2(310.0, 310.0));
    }
}
