//! The public façade over the fragment engine.
//!
//! Owns the graph, decides whether a toggle means hide or show, and
//! reports the affected row range of every mutation as a returned
//! [`Update`] value for the renderer to act on.

use thiserror::Error;

use crate::core::{EdgeKind, GraphElement, NodeId, NodeKind, RowIndex};
use crate::fragment::{Fragment, FragmentFinder, HideFragment, ReplaceError, ShowFragment};
use crate::graph::{Graph, GraphError};

/// Re-render request produced by a visibility change.
///
/// Propagated back to the caller of the mutating operation so UI code
/// can schedule exactly the repaint that is needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Update {
    /// Only the rows between the two nodes (inclusive) changed.
    Rows {
        /// Top of the dirty range.
        up: NodeId,
        /// Bottom of the dirty range.
        down: NodeId,
    },
    /// The whole layout must be rebuilt.
    Full,
    /// Nothing to repaint yet; produced by the individual steps of a
    /// batched bulk operation.
    Deferred,
}

impl Update {
    /// The inclusive row range to re-render, or `None` for [`Update::Full`]
    /// and [`Update::Deferred`].
    #[must_use]
    pub fn row_range(&self, graph: &Graph) -> Option<(RowIndex, RowIndex)> {
        match *self {
            Update::Rows { up, down } => Some((graph.row_index(up), graph.row_index(down))),
            Update::Full | Update::Deferred => None,
        }
    }
}

/// Errors from the visibility operations on [`FragmentManager`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ToggleError {
    /// A scan precondition was violated.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// A visibility patch precondition was violated.
    #[error(transparent)]
    Replace(#[from] ReplaceError),
}

/// Owns a graph and drives fragment collapsing on it.
pub struct FragmentManager {
    graph: Graph,
    is_pinned: Box<dyn Fn(NodeId) -> bool>,
    /// When unset, per-fragment updates are suppressed in favour of one
    /// full update at the end of a bulk operation.
    live_updates: bool,
}

impl FragmentManager {
    /// A manager over the given graph, with nothing pinned.
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            is_pinned: Box::new(|_| false),
            live_updates: true,
        }
    }

    /// The managed graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Consume the manager, yielding the graph.
    #[must_use]
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Install the predicate marking nodes that must stay individually
    /// visible. It is re-evaluated on every scan, so it may consult live
    /// UI state such as the current selection.
    pub fn set_pinned_fn(&mut self, is_pinned: impl Fn(NodeId) -> bool + 'static) {
        self.is_pinned = Box::new(is_pinned);
    }

    /// Resolve a selected element to the fragment a toggle would act on.
    ///
    /// An element already represented by a hidden edge yields that
    /// collapsed fragment, ready for expansion. Anything else yields the
    /// maximal collapsible fragment starting at the element's commit,
    /// provided the fragment actually covers the element's row.
    ///
    /// # Errors
    ///
    /// [`GraphError`] if a scan precondition is violated.
    pub fn relate_fragment(&self, element: GraphElement) -> Result<Option<Fragment>, GraphError> {
        let (anchor, bottom_row) = match element {
            GraphElement::Node(node) => {
                if let Some(edge) = self.graph.hidden_fragment_edge_at(node) {
                    return Ok(Some(Fragment::collapsed(
                        self.graph.up_node(edge),
                        self.graph.down_node(edge),
                    )));
                }
                (self.anchor_commit(node), self.graph.row_index(node))
            }
            GraphElement::Edge(edge) => {
                if self.graph.edge_kind(edge) == EdgeKind::HiddenFragment {
                    return Ok(Some(Fragment::collapsed(
                        self.graph.up_node(edge),
                        self.graph.down_node(edge),
                    )));
                }
                (
                    self.anchor_commit(self.graph.up_node(edge)),
                    self.graph.row_index(self.graph.down_node(edge)),
                )
            }
        };
        let Some(anchor) = anchor else {
            return Ok(None);
        };
        let finder = FragmentFinder::new(&self.graph);
        let candidate = finder.maximum_down_fragment(anchor, &*self.is_pinned)?;
        Ok(candidate
            .filter(|fragment| self.graph.row_index(fragment.down_node()) >= bottom_row))
    }

    /// Collapse or expand, depending on which the fragment calls for.
    ///
    /// A fragment with interior nodes is a collapse candidate; one
    /// without denotes an already-hidden span to expand. Callers never
    /// need to know which direction a click implies.
    ///
    /// # Errors
    ///
    /// [`ReplaceError`] if the fragment violates a patch precondition.
    pub fn toggle_visibility(&mut self, fragment: &Fragment) -> Result<Update, ReplaceError> {
        if fragment.is_collapsed() {
            self.show(fragment)
        } else {
            self.hide(fragment)
        }
    }

    /// Collapse a fragment.
    ///
    /// # Errors
    ///
    /// [`ReplaceError`] if an endpoint is a routing stub.
    pub fn hide(&mut self, fragment: &Fragment) -> Result<Update, ReplaceError> {
        self.graph.apply_patch(HideFragment::new(fragment.clone()))?;
        Ok(self.rows_update(fragment))
    }

    /// Expand a collapsed fragment.
    ///
    /// # Errors
    ///
    /// [`ReplaceError::NotHidden`] if no hidden edge joins the endpoints.
    pub fn show(&mut self, fragment: &Fragment) -> Result<Update, ReplaceError> {
        self.graph.apply_patch(ShowFragment::new(fragment.clone()))?;
        Ok(self.rows_update(fragment))
    }

    /// Collapse every maximal fragment in the graph, top to bottom.
    ///
    /// Runs in batch mode: the per-fragment row updates are suppressed
    /// and a single [`Update::Full`] is produced at the end, so a
    /// renderer repaints once rather than once per row.
    ///
    /// Idempotent: collapsing an already fully collapsed graph changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// [`ToggleError`] if a scan or patch precondition is violated.
    pub fn hide_all(&mut self) -> Result<Update, ToggleError> {
        self.live_updates = false;
        let result = self.hide_all_rows();
        self.live_updates = true;
        result.map(|()| Update::Full)
    }

    fn hide_all_rows(&mut self) -> Result<(), ToggleError> {
        for row in 0..self.graph.num_rows() {
            let Some(start) = self
                .graph
                .visible_nodes_in_row(row)
                .find(|&n| self.graph.node_kind(n) == NodeKind::Commit)
            else {
                continue;
            };
            let fragment =
                FragmentFinder::new(&self.graph).maximum_down_fragment(start, &*self.is_pinned)?;
            if let Some(fragment) = fragment {
                self.hide(&fragment)?;
            }
        }
        Ok(())
    }

    /// Expand every collapsed fragment, innermost ones included.
    ///
    /// # Errors
    ///
    /// [`ReplaceError`] if a hidden edge fails its patch precondition.
    pub fn show_all(&mut self) -> Result<Update, ReplaceError> {
        loop {
            let hidden: Vec<_> = self.graph.hidden_fragment_edges().collect();
            if hidden.is_empty() {
                break;
            }
            // Expanding an outer fragment can make further hidden edges
            // visible, hence the rescan.
            for edge in hidden {
                let fragment =
                    Fragment::collapsed(self.graph.up_node(edge), self.graph.down_node(edge));
                self.graph.apply_patch(ShowFragment::new(fragment))?;
            }
        }
        Ok(Update::Full)
    }

    /// All elements on the strictly linear run through the element's
    /// node: the nodes themselves plus their outgoing down edges.
    #[must_use]
    pub fn current_branch(&self, element: GraphElement) -> Vec<GraphElement> {
        let node = match element {
            GraphElement::Node(node) => node,
            GraphElement::Edge(edge) => self.graph.up_node(edge),
        };
        let nodes = FragmentFinder::new(&self.graph).current_branch(node);
        let mut elements = Vec::with_capacity(nodes.len() * 2);
        for &node in &nodes {
            elements.push(GraphElement::Node(node));
            elements.extend(self.graph.down_edges(node).map(GraphElement::Edge));
        }
        elements
    }

    /// Walk a routing stub chain up to the commit the edge leaves from.
    fn anchor_commit(&self, mut node: NodeId) -> Option<NodeId> {
        while self.graph.node_kind(node) == NodeKind::EdgeStub {
            node = self.graph.up_node(self.graph.up_edges(node).next()?);
        }
        Some(node)
    }

    fn rows_update(&self, fragment: &Fragment) -> Update {
        if self.live_updates {
            Update::Rows {
                up: fragment.up_node(),
                down: fragment.down_node(),
            }
        } else {
            Update::Deferred
        }
    }
}

impl std::fmt::Debug for FragmentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentManager")
            .field("graph", &self.graph)
            .field("live_updates", &self.live_updates)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use cool_asserts::assert_matches;
    use rstest::rstest;

    use crate::fragment::scan::test::{chain, diamond, node};

    #[rstest]
    fn toggle_collapses_then_expands(diamond: Graph) {
        let mut manager = FragmentManager::new(diamond);
        let c0 = node(manager.graph(), "c0");
        let c3 = node(manager.graph(), "c3");

        let fragment = manager
            .relate_fragment(GraphElement::Node(c0))
            .unwrap()
            .unwrap();
        assert!(!fragment.is_collapsed());

        let update = manager.toggle_visibility(&fragment).unwrap();
        assert_eq!(
            update,
            Update::Rows {
                up: fragment.up_node(),
                down: fragment.down_node()
            }
        );
        assert_eq!(update.row_range(manager.graph()), Some((0, 3)));

        // The same element now resolves to the collapsed span.
        let collapsed = manager
            .relate_fragment(GraphElement::Node(c0))
            .unwrap()
            .unwrap();
        assert!(collapsed.is_collapsed());
        assert_eq!(collapsed.down_node(), c3);

        manager.toggle_visibility(&collapsed).unwrap();
        assert_eq!(manager.graph().hidden_fragment_edges().count(), 0);
        assert_eq!(manager.graph().visible_nodes_in_row(1).count(), 1);
    }

    #[rstest]
    fn relate_on_the_synthetic_edge(diamond: Graph) {
        let mut manager = FragmentManager::new(diamond);
        let c0 = node(manager.graph(), "c0");
        let fragment = manager
            .relate_fragment(GraphElement::Node(c0))
            .unwrap()
            .unwrap();
        manager.hide(&fragment).unwrap();

        let edge = manager.graph().hidden_fragment_edges().next().unwrap();
        let related = manager
            .relate_fragment(GraphElement::Edge(edge))
            .unwrap()
            .unwrap();
        assert!(related.is_collapsed());
        assert_eq!(related.up_node(), fragment.up_node());
        assert_eq!(related.down_node(), fragment.down_node());
    }

    #[rstest]
    fn relate_rejects_fragments_above_the_element(diamond: Graph) {
        let manager = FragmentManager::new(diamond);
        // The last row can start nothing downwards.
        let c3 = node(manager.graph(), "c3");
        let related = manager.relate_fragment(GraphElement::Node(c3)).unwrap();
        assert_eq!(related, None);
    }

    #[rstest]
    fn relate_resolves_stubs_to_their_edge_origin(diamond: Graph) {
        let manager = FragmentManager::new(diamond);
        let stub = manager
            .graph()
            .visible_nodes_in_row(2)
            .find(|&n| manager.graph().node_kind(n) == NodeKind::EdgeStub)
            .unwrap();
        // The stub routes c1 -> c3; the candidate is the fragment at c1,
        // which covers the stub's row.
        let related = manager
            .relate_fragment(GraphElement::Node(stub))
            .unwrap()
            .unwrap();
        assert_eq!(related.up_node(), node(manager.graph(), "c1"));
        assert_eq!(related.down_node(), node(manager.graph(), "c3"));
    }

    #[rstest]
    fn hide_all_collapses_and_reports_once(chain: Graph) {
        let mut manager = FragmentManager::new(chain);
        let update = manager.hide_all().unwrap();
        assert_eq!(update, Update::Full);
        assert_eq!(manager.graph().hidden_fragment_edges().count(), 1);
        // Only the two endpoints stay visible.
        let visible: Vec<_> = (0..manager.graph().num_rows())
            .flat_map(|row| manager.graph().visible_nodes_in_row(row))
            .collect();
        assert_eq!(visible.len(), 2);
    }

    #[rstest]
    fn hide_all_is_idempotent(diamond: Graph) {
        let mut manager = FragmentManager::new(diamond);
        manager.hide_all().unwrap();
        let once = manager.graph().clone();
        manager.hide_all().unwrap();
        assert_eq!(manager.graph(), &once);
    }

    #[rstest]
    fn show_all_restores_every_row(diamond: Graph) {
        let mut manager = FragmentManager::new(diamond);
        manager.hide_all().unwrap();
        let update = manager.show_all().unwrap();
        assert_eq!(update, Update::Full);
        assert_eq!(manager.graph().hidden_fragment_edges().count(), 0);
        for row in 0..manager.graph().num_rows() {
            assert!(manager.graph().visible_nodes_in_row(row).count() >= 1);
        }
    }

    #[rstest]
    fn pinned_nodes_never_collapse(diamond: Graph) {
        let mut manager = FragmentManager::new(diamond);
        let c2 = node(manager.graph(), "c2");
        manager.set_pinned_fn(move |n| n == c2);
        manager.hide_all().unwrap();
        assert!(manager.graph().is_visible_node(c2));
    }

    #[rstest]
    fn show_on_an_expanded_span_is_an_error(diamond: Graph) {
        let mut manager = FragmentManager::new(diamond);
        let fragment = Fragment::collapsed(
            node(manager.graph(), "c0"),
            node(manager.graph(), "c3"),
        );
        assert_matches!(
            manager.toggle_visibility(&fragment),
            Err(ReplaceError::NotHidden { .. })
        );
    }

    #[rstest]
    fn branch_elements_include_down_edges(chain: Graph) {
        let manager = FragmentManager::new(chain);
        let c0 = node(manager.graph(), "c0");
        let elements = manager.current_branch(GraphElement::Node(c0));
        // Four nodes and the three edges between them.
        assert_eq!(elements.len(), 7);
    }
}
