//! Definitions for the core types used in the commit graph.
//!
//! These types are re-exported in the root of the crate.

use derive_more::From;

/// Position of a [`crate::graph::NodeRow`] in the layout.
///
/// Row indices are contiguous integers starting at 0, assigned by the graph
/// builder and never changed afterwards.
pub type RowIndex = usize;

/// A handle to a node in the commit graph.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct NodeId {
    index: u32,
}

/// A handle to an edge in the commit graph.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct EdgeId {
    index: u32,
}

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index: index as u32,
        }
    }

    /// Returns the index of the node in the graph's node arena.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl EdgeId {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index: index as u32,
        }
    }

    /// Returns the index of the edge in the graph's edge arena.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// The role a node plays in the row layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    /// A node standing for a commit on its own row.
    Commit,
    /// A placeholder routing an edge through a row with no commit on it.
    ///
    /// Stubs are never valid fragment endpoints.
    EdgeStub,
}

/// The role an edge plays in the visible graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EdgeKind {
    /// An ordinary parent link.
    Usual,
    /// A synthetic edge summarising a collapsed fragment.
    ///
    /// The nodes it stands for still exist in the model but are excluded
    /// from visible row iteration.
    HiddenFragment,
}

/// A selectable element of the graph: a node or an edge.
///
/// This is the unit the UI hands back to the engine when the user clicks
/// somewhere in the rendered graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, From)]
pub enum GraphElement {
    /// A node, addressed by its handle.
    Node(NodeId),
    /// An edge, addressed by its handle.
    Edge(EdgeId),
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NodeId").field(&self.index()).finish()
    }
}

impl std::fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EdgeId").field(&self.index()).finish()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node({})", self.index())
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "edge({})", self.index())
    }
}
