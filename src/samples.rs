//! Built-in sample boards.
//!
//! These are small, realistic boards used by the `demo` command and as
//! fixtures in tests. Every sample is built at fixed positions so it lays out
//! the same way each time.

use crate::board::Board;
use crate::types::*;

/// Kinds of built-in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// Loose bookmarks from a few sites plus linked notes, ready for auto-arrange
    ResearchBoard,
    /// A trip plan already organized into groups
    TripPlanning,
    /// A single chain of linked notes
    ReadingTrail,
}

/// Metadata for a single sample.
pub struct SampleInfo {
    /// Stable identifier for the sample
    pub kind: SampleKind,
    /// Human-friendly display name
    pub name: &'static str,
}

/// Returns all samples with their display names.
pub const fn all_samples() -> &'static [SampleInfo] {
    const SAMPLES: &[SampleInfo] = &[
        SampleInfo {
            kind: SampleKind::ResearchBoard,
            name: "Research Board",
        },
        SampleInfo {
            kind: SampleKind::TripPlanning,
            name: "Trip Planning",
        },
        SampleInfo {
            kind: SampleKind::ReadingTrail,
            name: "Reading Trail",
        },
    ];
    SAMPLES
}

/// Builds a board for the given sample kind, with empty history.
pub fn build_sample(kind: SampleKind) -> Board {
    let mut board = match kind {
        SampleKind::ResearchBoard => build_research_board(),
        SampleKind::TripPlanning => build_trip_planning(),
        SampleKind::ReadingTrail => build_reading_trail(),
    };
    board.history.clear();
    board
}

fn build_research_board() -> Board {
    let mut board = Board::default();

    // Three Rust docs pages end up in one domain group
    let bookmarks = [
        ("rust-book", "The Book", "https://doc.rust-lang.org/book/", (40.0, 60.0)),
        ("rust-nomicon", "The Rustonomicon", "https://doc.rust-lang.org/nomicon/", (900.0, 420.0)),
        ("rust-ref", "The Reference", "https://doc.rust-lang.org/reference/", (310.0, 780.0)),
        ("serde-docs", "serde", "https://docs.rs/serde", (1200.0, 90.0)),
        ("tokio-docs", "tokio", "https://docs.rs/tokio", (640.0, 1100.0)),
        ("egui-repo", "egui", "https://github.com/emilk/egui", (120.0, 1300.0)),
    ];
    for (id, title, url, (x, y)) in bookmarks {
        board.add_node(NewNode::bookmark(id, title, url).at(x, y).with_width(180.0));
    }

    let notes = [
        ("note-async", "Async", "Compare executors before picking one.", (1500.0, 600.0)),
        ("note-ui", "UI", "Immediate mode fits the canvas well.", (800.0, 1500.0)),
        ("note-todo", "Todo", "Read the nomicon chapter on variance.", (60.0, 400.0)),
    ];
    for (id, title, content, (x, y)) in notes {
        board.add_node(NewNode::note(id, title, content).at(x, y));
    }

    board.connect("tokio-docs", "note-async");
    board.connect("serde-docs", "note-async");
    board.connect("egui-repo", "note-ui");
    board.update_node(
        "note-todo",
        &NodePatch {
            tags: Some(vec!["later".into(), "reference".into()]),
            ..Default::default()
        },
    );
    board
}

fn build_trip_planning() -> Board {
    let mut board = Board::default();

    board.add_node(
        NewNode::group("group-flights", "Flights")
            .at(0.0, 0.0)
            .with_size(600.0, 450.0),
    );
    board.add_node(
        NewNode::group("group-stays", "Stays")
            .at(720.0, 0.0)
            .with_size(600.0, 450.0),
    );

    board.add_node(
        NewNode::bookmark("outbound", "Outbound", "https://www.skyscanner.net/outbound")
            .at(60.0, 130.0)
            .inside("group-flights"),
    );
    board.add_node(
        NewNode::bookmark("return", "Return", "https://www.skyscanner.net/return")
            .at(300.0, 130.0)
            .inside("group-flights"),
    );
    board.add_node(
        NewNode::bookmark("hotel", "Hotel", "https://www.booking.com/hotel")
            .at(60.0, 130.0)
            .inside("group-stays"),
    );
    board.add_node(NewNode::note("budget", "Budget", "Flights under 400 total.").at(0.0, 600.0));

    board.connect("budget", "outbound");
    board.connect("budget", "hotel");
    board
}

fn build_reading_trail() -> Board {
    let mut board = Board::default();
    let chapters = ["Ownership", "Borrowing", "Lifetimes", "Traits", "Generics"];
    let mut previous: Option<NodeId> = None;
    for (i, title) in chapters.iter().enumerate() {
        let id = format!("chapter-{}", i + 1);
        let x = i as f32 * 260.0;
        board.add_node(NewNode::note(id.clone(), *title, "").at(x, (i % 2) as f32 * 140.0));
        if let Some(prev) = &previous {
            board.connect(prev, &id);
        }
        previous = Some(id);
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_samples_build() {
        for sample in all_samples() {
            let board = build_sample(sample.kind);
            assert!(!board.nodes().is_empty(), "{} is empty", sample.name);
            assert!(!board.can_undo(), "{} carries history", sample.name);
        }
    }

    #[test]
    fn research_board_arranges_into_domain_groups() {
        let mut board = build_sample(SampleKind::ResearchBoard);
        assert!(board.auto_arrange());

        let groups: Vec<&str> = board.groups().map(|g| g.data.title()).collect();
        assert_eq!(groups, vec!["DOC.RUST-LANG.ORG", "DOCS.RS"]);
        assert_eq!(board.children_of("group-doc.rust-lang.org").count(), 3);
        assert_eq!(board.children_of("group-docs.rs").count(), 2);
    }

    #[test]
    fn trip_planning_children_are_relative() {
        let board = build_sample(SampleKind::TripPlanning);
        assert_eq!(board.absolute_position("hotel"), Some((780.0, 130.0)));
        assert_eq!(board.edges().len(), 2);
    }

    #[test]
    fn reading_trail_is_one_cluster() {
        let mut board = build_sample(SampleKind::ReadingTrail);
        assert_eq!(board.edges().len(), 4);
        board.auto_arrange();

        // Five connected notes share a 3-column grid
        let rows: std::collections::BTreeSet<i32> =
            board.nodes().iter().map(|n| n.position.1 as i32).collect();
        assert_eq!(rows.len(), 2);
    }
}
