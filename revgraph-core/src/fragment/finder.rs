//! Higher-level fragment queries built on the minimal scans.

use fxhash::FxHashSet;
use itertools::Itertools;

use crate::core::NodeId;
use crate::fragment::{Fragment, scan};
use crate::graph::{Graph, GraphError};

/// Resolves graph elements to collapsible fragments.
///
/// Borrows the graph for the duration of a query; results are plain
/// values and stay valid only until the graph is next mutated.
#[derive(Clone, Copy, Debug)]
pub struct FragmentFinder<'g> {
    graph: &'g Graph,
}

impl<'g> FragmentFinder<'g> {
    /// A finder over the given graph.
    #[must_use]
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// The minimal fragment starting downwards at `node`, if any.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotACommit`] if `node` is a routing stub.
    pub fn fragment_for(
        &self,
        node: NodeId,
        is_pinned: impl Fn(NodeId) -> bool,
    ) -> Result<Option<Fragment>, GraphError> {
        scan::down_fragment(self.graph, node, is_pinned)
    }

    /// The maximal collapsible run starting downwards at `node`.
    ///
    /// Chains minimal fragments end to end: whenever the current run's
    /// down node starts another fragment, the two are merged and the
    /// joint node moves into the interior. Guarantees a single maximal
    /// run rather than a sequence of minimal ones, which is what keeps
    /// collapse-all down to the fewest possible hidden edges.
    ///
    /// Returns `None` when the merged run still spans a single edge;
    /// there is nothing to hide in that case.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotACommit`] if `node` is a routing stub.
    pub fn maximum_down_fragment(
        &self,
        node: NodeId,
        is_pinned: impl Fn(NodeId) -> bool,
    ) -> Result<Option<Fragment>, GraphError> {
        let Some(mut fragment) = scan::down_fragment(self.graph, node, &is_pinned)? else {
            return Ok(None);
        };
        // A pinned joint node would end up in the merged interior, so it
        // stops the extension just like a pinned interior stops a scan.
        while !is_pinned(fragment.down_node()) {
            match scan::down_fragment(self.graph, fragment.down_node(), &is_pinned)? {
                Some(next) => fragment = fragment.extended(next),
                None => break,
            }
        }
        Ok((!fragment.is_collapsed()).then_some(fragment))
    }

    /// All nodes on the strictly linear run through `start`: the walk
    /// extends in both directions while each step crosses the only edge
    /// on both of its endpoints' facing sides.
    #[must_use]
    pub fn current_branch(&self, start: NodeId) -> FxHashSet<NodeId> {
        let mut nodes: FxHashSet<NodeId> = std::iter::once(start).collect();

        let mut cur = start;
        while let Ok(edge) = self.graph.up_edges(cur).exactly_one() {
            let up = self.graph.up_node(edge);
            if self.graph.down_edges(up).exactly_one().is_err() {
                break;
            }
            nodes.insert(up);
            cur = up;
        }

        let mut cur = start;
        while let Ok(edge) = self.graph.down_edges(cur).exactly_one() {
            let down = self.graph.down_node(edge);
            if self.graph.up_edges(down).exactly_one().is_err() {
                break;
            }
            nodes.insert(down);
            cur = down;
        }

        nodes
    }
}
