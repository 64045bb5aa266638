//! Patches flipping fragment visibility.
//!
//! These are the only operations that mutate the visible graph. Hiding a
//! fragment swaps its interior for a single [`HiddenFragment`] edge;
//! showing reverses the swap exactly. Everything a hidden edge stands
//! for is remembered on the edge, so a show needs no rescan.
//!
//! [`HiddenFragment`]: crate::core::EdgeKind::HiddenFragment

use fxhash::FxHashSet;
use thiserror::Error;

use crate::core::{EdgeId, EdgeKind, NodeId, NodeKind};
use crate::fragment::Fragment;
use crate::graph::{Graph, ReplacedFragment};

/// A verified transformation of the visible graph.
pub trait Patch {
    /// The type of error with which this patch may fail.
    type Error: std::error::Error;

    /// The type returned on successful application.
    type Outcome;

    /// If `true`, a failed [`Patch::apply`] is guaranteed to leave the
    /// graph unchanged.
    const UNCHANGED_ON_FAILURE: bool;

    /// Checks whether the patch would succeed on the given graph.
    ///
    /// If this call succeeds, [`Patch::apply`] on the same graph also
    /// succeeds; if it fails, apply would fail with the same error.
    fn verify(&self, graph: &Graph) -> Result<(), Self::Error>;

    /// Mutate the graph, or fail with an error.
    fn apply(self, graph: &mut Graph) -> Result<Self::Outcome, Self::Error>;
}

impl Graph {
    /// Verify and apply a patch.
    pub fn apply_patch<P: Patch>(&mut self, patch: P) -> Result<P::Outcome, P::Error> {
        patch.verify(self)?;
        patch.apply(self)
    }
}

/// Error from a fragment visibility patch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReplaceError {
    /// A show was requested for a span not represented by a hidden edge.
    #[error("no hidden fragment edge joins {up} and {down}")]
    NotHidden {
        /// The span's upper endpoint.
        up: NodeId,
        /// The span's lower endpoint.
        down: NodeId,
    },
    /// A fragment endpoint was a routing stub.
    #[error("fragment endpoint {node} is an edge stub")]
    StubEndpoint {
        /// The offending endpoint.
        node: NodeId,
    },
}

/// Collapse a fragment: hide its interior and summarise it with one
/// [`HiddenFragment`] edge between the endpoints.
///
/// Hiding a span that is already collapsed is a no-op.
///
/// [`HiddenFragment`]: crate::core::EdgeKind::HiddenFragment
#[derive(Clone, Debug)]
pub struct HideFragment {
    /// The fragment to collapse.
    pub fragment: Fragment,
}

impl HideFragment {
    /// Create a new [`HideFragment`] patch.
    #[must_use]
    pub fn new(fragment: Fragment) -> Self {
        Self { fragment }
    }
}

impl Patch for HideFragment {
    type Error = ReplaceError;
    /// The synthetic edge, or `None` if the span was already collapsed.
    type Outcome = Option<EdgeId>;
    const UNCHANGED_ON_FAILURE: bool = true;

    fn verify(&self, graph: &Graph) -> Result<(), ReplaceError> {
        for node in [self.fragment.up_node(), self.fragment.down_node()] {
            if graph.node_kind(node) != NodeKind::Commit {
                return Err(ReplaceError::StubEndpoint { node });
            }
        }
        Ok(())
    }

    fn apply(self, graph: &mut Graph) -> Result<Option<EdgeId>, ReplaceError> {
        let (up, down) = (self.fragment.up_node(), self.fragment.down_node());
        if self.fragment.is_collapsed() || graph.hidden_fragment_edge_between(up, down).is_some() {
            return Ok(None);
        }

        // Every visible edge touching an interior node lies strictly
        // between the endpoints.
        let mut interior_edges = FxHashSet::default();
        for &node in self.fragment.intermediate_nodes() {
            interior_edges.extend(graph.up_edges(node));
            interior_edges.extend(graph.down_edges(node));
        }
        let edges: Vec<EdgeId> = interior_edges.into_iter().collect();
        let nodes: Vec<NodeId> = self.fragment.intermediate_nodes().iter().copied().collect();

        for &edge in &edges {
            graph.set_edge_hidden(edge, true);
        }
        for &node in &nodes {
            graph.set_node_hidden(node, true);
        }
        let synthetic = graph.add_edge(up, down, EdgeKind::HiddenFragment);
        graph.set_replaced(synthetic, ReplacedFragment { edges, nodes });
        Ok(Some(synthetic))
    }
}

/// Expand a collapsed fragment: remove its [`HiddenFragment`] edge and
/// restore the hidden interior exactly as it was.
///
/// [`HiddenFragment`]: crate::core::EdgeKind::HiddenFragment
#[derive(Clone, Debug)]
pub struct ShowFragment {
    /// The collapsed fragment to expand. Only the endpoints matter; the
    /// hidden edge between them is authoritative for the interior.
    pub fragment: Fragment,
}

impl ShowFragment {
    /// Create a new [`ShowFragment`] patch.
    #[must_use]
    pub fn new(fragment: Fragment) -> Self {
        Self { fragment }
    }
}

impl Patch for ShowFragment {
    type Error = ReplaceError;
    type Outcome = ();
    const UNCHANGED_ON_FAILURE: bool = true;

    fn verify(&self, graph: &Graph) -> Result<(), ReplaceError> {
        let (up, down) = (self.fragment.up_node(), self.fragment.down_node());
        match graph.hidden_fragment_edge_between(up, down) {
            Some(_) => Ok(()),
            None => Err(ReplaceError::NotHidden { up, down }),
        }
    }

    fn apply(self, graph: &mut Graph) -> Result<(), ReplaceError> {
        let (up, down) = (self.fragment.up_node(), self.fragment.down_node());
        let edge = graph
            .hidden_fragment_edge_between(up, down)
            .ok_or(ReplaceError::NotHidden { up, down })?;
        let replaced = graph.take_replaced(edge).unwrap_or_default();
        graph.remove_edge(edge);
        for edge in replaced.edges {
            graph.set_edge_hidden(edge, false);
        }
        for node in replaced.nodes {
            graph.set_node_hidden(node, false);
        }
        Ok(())
    }
}
