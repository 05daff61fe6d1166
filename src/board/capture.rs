//! Ingesting pages captured elsewhere and text pasted from the system clipboard.

use super::Board;
use crate::types::{normalize_tags, BookmarkData, NewNode, NodeData, NodeId, NodePatch, NoteData};
use serde::{Deserialize, Serialize};
use url::Url;

/// A page captured outside the board, e.g. by a browser extension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapturedPage {
    /// Page title
    pub title: String,
    /// Page URL
    pub url: String,
    /// Favicon URL
    pub favicon: Option<String>,
    /// Screenshot URL or data URI
    pub screenshot: Option<String>,
    /// Page description
    pub description: Option<String>,
    /// Tag labels
    pub tags: Vec<String>,
}

/// A bookmark whose metadata should be fetched and applied with
/// [`Board::apply_metadata`] once available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRequest {
    /// Bookmark to update
    pub node_id: NodeId,
    /// URL to fetch metadata for
    pub url: String,
}

/// Whether `text` is a single http(s) URL and nothing else.
pub fn is_web_url(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || text.chars().any(char::is_whitespace) {
        return false;
    }
    Url::parse(text).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Host of `url` without a leading `www.`, or `url` itself if it has none.
fn display_host(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.strip_prefix("www.").unwrap_or(h).to_string()))
        .unwrap_or_else(|| url.to_string())
}

impl Board {
    /// Adds captured pages as bookmarks laid out in a grid centered on `center`.
    ///
    /// Returns metadata requests for the captures that came without a screenshot.
    pub fn import_captures(
        &mut self,
        captures: &[CapturedPage],
        center: (f32, f32),
    ) -> Vec<MetadataRequest> {
        if captures.is_empty() {
            return Vec::new();
        }
        let capture = self.config.capture.clone();
        let columns = ((captures.len() as f32).sqrt().ceil() as usize).max(1);
        let rows = captures.len().div_ceil(columns);
        let origin = (
            center.0 - (columns - 1) as f32 * capture.column_width / 2.0,
            center.1 - (rows - 1) as f32 * capture.row_height / 2.0,
        );

        let mut requests = Vec::new();
        for (index, page) in captures.iter().enumerate() {
            let col = (index % columns) as f32;
            let row = (index / columns) as f32;
            let data = NodeData::Bookmark(BookmarkData {
                title: page.title.clone(),
                url: page.url.clone(),
                favicon: page.favicon.clone(),
                description: page.description.clone(),
                screenshot: page.screenshot.clone(),
                color: None,
                tags: normalize_tags(&page.tags),
            });
            let new = NewNode::new(self.fresh_id(), data)
                .at(
                    origin.0 + col * capture.column_width,
                    origin.1 + row * capture.row_height,
                )
                .with_width(capture.bookmark_width);
            let Some(node_id) = self.add_node(new) else {
                continue;
            };
            if page.screenshot.is_none() && !page.url.is_empty() {
                requests.push(MetadataRequest {
                    node_id,
                    url: page.url.clone(),
                });
            }
        }
        log::info!(
            "Imported {} captured pages, {} awaiting metadata",
            captures.len(),
            requests.len()
        );
        requests
    }

    /// Adds pasted text at `center`.
    ///
    /// A lone http(s) URL becomes a bookmark titled with its host, with a
    /// metadata request for it; any other non-blank text becomes a note.
    pub fn paste_text(
        &mut self,
        text: &str,
        center: (f32, f32),
    ) -> Option<(NodeId, Option<MetadataRequest>)> {
        if text.trim().is_empty() {
            return None;
        }
        let capture = self.config.capture.clone();

        if is_web_url(text) {
            let url = text.trim().to_string();
            let new = NewNode::bookmark(self.fresh_id(), display_host(&url), url.clone())
                .at(center.0, center.1)
                .with_width(capture.bookmark_width);
            let node_id = self.add_node(new)?;
            let request = MetadataRequest {
                node_id: node_id.clone(),
                url,
            };
            Some((node_id, Some(request)))
        } else {
            let data = NodeData::Note(NoteData {
                title: "Pasted Note".to_string(),
                content: text.to_string(),
                ..Default::default()
            });
            let new = NewNode::new(self.fresh_id(), data)
                .at(center.0, center.1)
                .with_width(capture.note_width);
            self.add_node(new).map(|id| (id, None))
        }
    }

    /// Applies fetched metadata to a bookmark. Not recorded in history.
    ///
    /// The node may have been deleted while the fetch was in flight, in which
    /// case nothing happens and `false` is returned.
    pub fn apply_metadata(&mut self, id: &str, patch: &NodePatch) -> bool {
        self.update_node(id, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;

    fn page(title: &str, url: &str, screenshot: Option<&str>) -> CapturedPage {
        CapturedPage {
            title: title.into(),
            url: url.into(),
            screenshot: screenshot.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_is_web_url() {
        assert!(is_web_url("https://example.com/a?b=c"));
        assert!(is_web_url("  http://example.com  "));
        assert!(!is_web_url("ftp://example.com"));
        assert!(!is_web_url("see https://example.com"));
        assert!(!is_web_url("example.com"));
        assert!(!is_web_url(""));
    }

    #[test]
    fn test_import_captures_centers_grid() {
        let mut board = Board::default();
        let captures = vec![
            page("A", "https://a.com", None),
            page("B", "https://b.com", Some("data:image/png;base64,xx")),
            page("C", "https://c.com", None),
        ];
        let requests = board.import_captures(&captures, (1000.0, 1000.0));

        // 3 captures => 2 columns, 2 rows
        let positions: Vec<(f32, f32)> = board.nodes().iter().map(|n| n.position).collect();
        assert_eq!(
            positions,
            vec![(890.0, 860.0), (1110.0, 860.0), (890.0, 1140.0)]
        );
        assert!(board.nodes().iter().all(|n| n.width == Some(180.0)));
        assert!(board.nodes().iter().all(|n| n.kind() == NodeKind::Bookmark));

        let urls: Vec<&str> = requests.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.com", "https://c.com"]);
        assert_eq!(requests[0].node_id, board.nodes()[0].id);
    }

    #[test]
    fn test_import_captures_normalizes_tags() {
        let mut board = Board::default();
        let mut capture = page("A", "https://a.com", Some("shot"));
        capture.tags = vec![" Work ".into(), "work".into(), "Idea".into()];
        board.import_captures(&[capture], (0.0, 0.0));

        let tags: Vec<&String> = board.nodes()[0].data.tags().unwrap().iter().collect();
        assert_eq!(tags, vec!["idea", "work"]);
    }

    #[test]
    fn test_paste_url_creates_bookmark() {
        let mut board = Board::default();
        let (id, request) = board
            .paste_text(" https://www.rust-lang.org/learn ", (10.0, 20.0))
            .unwrap();

        let node = board.node(&id).unwrap();
        assert_eq!(node.data.title(), "rust-lang.org");
        assert_eq!(node.data.url(), Some("https://www.rust-lang.org/learn"));
        assert_eq!(node.position, (10.0, 20.0));
        assert_eq!(node.width, Some(180.0));
        assert_eq!(request.unwrap().url, "https://www.rust-lang.org/learn");
    }

    #[test]
    fn test_paste_plain_text_creates_note() {
        let mut board = Board::default();
        let (id, request) = board.paste_text("remember the milk", (0.0, 0.0)).unwrap();

        let node = board.node(&id).unwrap();
        assert_eq!(node.kind(), NodeKind::Note);
        assert_eq!(node.data.title(), "Pasted Note");
        assert_eq!(node.width, Some(300.0));
        assert!(request.is_none());
        assert!(board.paste_text("   ", (0.0, 0.0)).is_none());
    }

    #[test]
    fn test_apply_metadata_after_delete_is_noop() {
        let mut board = Board::default();
        let (id, _) = board.paste_text("https://example.com", (0.0, 0.0)).unwrap();
        board.delete_node(&id);

        let patch = NodePatch {
            title: Some("Example".into()),
            ..Default::default()
        };
        assert!(!board.apply_metadata(&id, &patch));
        assert!(board.nodes().is_empty());
    }
}
