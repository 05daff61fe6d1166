//! Domain extraction and the placement heuristic for new nodes.

use crate::config::PlacementConfig;
use crate::geometry::absolute_position;
use crate::types::{Node, NodeKind};
use url::Url;

/// Extracts the host of `url`, without a leading `www.`.
///
/// Returns `None` for empty or unparsable URLs and for URLs without a host.
pub fn extract_domain(url: &str) -> Option<String> {
    if url.trim().is_empty() {
        return None;
    }
    match Url::parse(url.trim()) {
        Ok(parsed) => parsed.host_str().map(|host| {
            host.strip_prefix("www.").unwrap_or(host).to_string()
        }),
        Err(err) => {
            log::debug!("Cannot extract domain from `{url}`: {err}");
            None
        }
    }
}

/// Picks a position for a node added without one.
///
/// A bookmark whose domain already appears on the board is placed on a spiral
/// around the first bookmark of that domain; everything else cascades
/// diagonally from the origin by the current node count.
pub fn find_placement(nodes: &[Node], url: Option<&str>, config: &PlacementConfig) -> (f32, f32) {
    if let Some(domain) = url.and_then(extract_domain) {
        let siblings: Vec<&Node> = nodes
            .iter()
            .filter(|n| {
                n.kind() == NodeKind::Bookmark
                    && n.data.url().and_then(extract_domain).as_deref() == Some(domain.as_str())
            })
            .collect();

        if let Some(anchor) = siblings.first() {
            let (x, y) = absolute_position(anchor, nodes);
            let angle = siblings.len() as f32 * config.angle_step;
            return (x + config.radius * angle.cos(), y + config.radius * angle.sin());
        }
    }

    let step = nodes.len() as f32 * config.cascade_step;
    (step, step)
}
