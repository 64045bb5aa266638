//! Commit-graph fragment collapsing engine for VCS log views.
//!
//! A commit history laid out in ordered display rows usually contains
//! long runs of "uninteresting" linear history. This crate detects such
//! runs ("fragments"), collapses each into a single synthetic edge, and
//! re-expands them without information loss, reporting the minimal row
//! range a renderer has to repaint after every change.
//!
//! The graph is an arena of nodes and edges addressed by integer
//! handles; rows hold handle lists in stable order. Collapsed elements
//! stay in the arena, flagged invisible, so expansion restores the
//! original graph edge-for-edge.
//!
//! # Example
//!
//! Collapse the linear run below the newest commit of a small history:
//!
//! ```
//! use revgraph::{CommitData, FragmentManager, GraphBuilder, GraphElement};
//!
//! let commits = [
//!     CommitData::new("a", ["b"]),
//!     CommitData::new("b", ["c"]),
//!     CommitData::new("c", ["d"]),
//!     CommitData::new("d", Vec::<&str>::new()),
//! ];
//! let mut manager = FragmentManager::new(GraphBuilder::build(&commits)?);
//!
//! let newest = manager.graph().node_by_commit_id("a").unwrap();
//! let fragment = manager
//!     .relate_fragment(GraphElement::Node(newest))?
//!     .expect("a linear run is collapsible");
//! let update = manager.toggle_visibility(&fragment)?;
//!
//! // Rows b and c are now hidden behind one synthetic edge, and the
//! // update names the row range to repaint.
//! assert_eq!(update.row_range(manager.graph()), Some((0, 3)));
//! assert_eq!(manager.graph().visible_nodes_in_row(1).count(), 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use revgraph_core::{core, fragment, graph, manager};

pub use revgraph_core::{
    BuildError, CommitData, EdgeId, EdgeKind, Fragment, FragmentFinder, FragmentManager, Graph,
    GraphBuilder, GraphElement, GraphError, NodeId, NodeKind, ReplaceError, RowIndex, ToggleError,
    Update,
};
