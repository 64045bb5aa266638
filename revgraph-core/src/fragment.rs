//! Collapsible spans of linear history, and the machinery that finds,
//! hides and shows them.

pub mod finder;
pub mod patch;
pub mod scan;

use fxhash::FxHashSet;

use crate::core::{NodeId, RowIndex};
use crate::graph::Graph;

pub use finder::FragmentFinder;
pub use patch::{HideFragment, Patch, ReplaceError, ShowFragment};

/// A contiguous vertical span of the graph between two commit nodes.
///
/// With a non-empty interior the fragment is a candidate for collapsing;
/// with an empty interior it denotes a span that is already collapsed
/// into a single [`HiddenFragment`] edge.
///
/// Fragments are computed on demand from the current graph state and
/// never stored; a fragment held across a graph mutation is stale.
///
/// [`HiddenFragment`]: crate::core::EdgeKind::HiddenFragment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    up_node: NodeId,
    down_node: NodeId,
    intermediate_nodes: FxHashSet<NodeId>,
}

impl Fragment {
    /// A fragment with the given interior.
    pub fn new(
        up_node: NodeId,
        down_node: NodeId,
        intermediate_nodes: impl IntoIterator<Item = NodeId>,
    ) -> Self {
        Self {
            up_node,
            down_node,
            intermediate_nodes: intermediate_nodes.into_iter().collect(),
        }
    }

    /// The span between two nodes with nothing visible in between, i.e.
    /// an already-collapsed fragment.
    pub fn collapsed(up_node: NodeId, down_node: NodeId) -> Self {
        Self::new(up_node, down_node, [])
    }

    /// The endpoint on the smaller row index.
    #[must_use]
    pub fn up_node(&self) -> NodeId {
        self.up_node
    }

    /// The endpoint on the larger row index.
    #[must_use]
    pub fn down_node(&self) -> NodeId {
        self.down_node
    }

    /// The nodes strictly between the endpoints.
    #[must_use]
    pub fn intermediate_nodes(&self) -> &FxHashSet<NodeId> {
        &self.intermediate_nodes
    }

    /// Whether this fragment denotes an already-collapsed span.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.intermediate_nodes.is_empty()
    }

    /// Whether the node is strictly inside the fragment.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.intermediate_nodes.contains(&node)
    }

    /// The inclusive row span covered by the fragment.
    #[must_use]
    pub fn row_span(&self, graph: &Graph) -> (RowIndex, RowIndex) {
        (
            graph.row_index(self.up_node),
            graph.row_index(self.down_node),
        )
    }

    /// Concatenate with a fragment starting at this fragment's down node.
    /// The joint node becomes part of the interior.
    pub(crate) fn extended(mut self, next: Fragment) -> Self {
        debug_assert_eq!(self.down_node, next.up_node);
        self.intermediate_nodes.insert(self.down_node);
        self.intermediate_nodes.extend(next.intermediate_nodes);
        self.down_node = next.down_node;
        self
    }
}
