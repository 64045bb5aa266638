//! The row-indexed commit graph: an arena of nodes and edges plus the
//! ordered row layout.
//!
//! The arena is append-only for nodes and rows. Edges may additionally be
//! created and removed by the fragment patches in
//! [`crate::fragment::patch`], which are the only code allowed to change
//! edge kinds or element visibility.

pub mod builder;

use fxhash::FxHashMap;
use smol_str::SmolStr;
use thiserror::Error;

use crate::core::{EdgeId, EdgeKind, NodeId, NodeKind, RowIndex};

pub use builder::{BuildError, CommitData, GraphBuilder};

/// The commit graph data structure.
///
/// Nodes and edges are stored in arenas and addressed by [`NodeId`] /
/// [`EdgeId`] handles; rows store handle lists in stable order. Hidden
/// elements stay in the arena so that expanding a collapsed fragment can
/// restore them exactly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<NodeData>,
    /// Edge slots; `None` marks a slot freed by a fragment expansion.
    edges: Vec<Option<EdgeData>>,
    rows: Vec<NodeRow>,
    /// Reverse lookup from commit id to its node.
    commit_nodes: FxHashMap<SmolStr, NodeId>,
    /// Interior remembered by each `HiddenFragment` edge.
    replaced: FxHashMap<EdgeId, ReplacedFragment>,
    free_edges: Vec<EdgeId>,
}

#[derive(Clone, Debug, PartialEq)]
struct NodeData {
    row: RowIndex,
    kind: NodeKind,
    commit_id: Option<SmolStr>,
    up_edges: Vec<EdgeId>,
    down_edges: Vec<EdgeId>,
    hidden: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct EdgeData {
    up_node: NodeId,
    down_node: NodeId,
    kind: EdgeKind,
    hidden: bool,
}

/// An ordered sequence of nodes sharing the same row index.
///
/// Node order within a row is assigned at construction and never altered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeRow {
    nodes: Vec<NodeId>,
}

impl NodeRow {
    /// All nodes on the row, hidden ones included, in stable order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }
}

/// The elements a `HiddenFragment` edge stands for, kept so that showing
/// the fragment restores the original graph edge-for-edge.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ReplacedFragment {
    pub(crate) edges: Vec<EdgeId>,
    pub(crate) nodes: Vec<NodeId>,
}

/// Errors that can occur while querying the graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GraphError {
    /// A fragment scan was started from a routing stub.
    #[error("fragment scans must start at a commit node, but {node} is an edge stub")]
    NotACommit {
        /// The offending start node.
        node: NodeId,
    },
}

/// Read access. The fragment engine never constructs or deletes nodes or
/// rows through this interface.
impl Graph {
    /// Create an empty graph. Use [`GraphBuilder`] to populate one.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in the layout.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of nodes in the arena, hidden ones included.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The row at the given index.
    ///
    /// # Panics
    ///
    /// If the index is out of range.
    #[must_use]
    pub fn row(&self, row: RowIndex) -> &NodeRow {
        &self.rows[row]
    }

    /// The ordered list of rows.
    pub fn rows(&self) -> impl Iterator<Item = &NodeRow> {
        self.rows.iter()
    }

    /// Nodes on a row that are currently visible, in stable order.
    pub fn visible_nodes_in_row(&self, row: RowIndex) -> impl Iterator<Item = NodeId> + '_ {
        self.rows[row]
            .nodes()
            .filter(|&n| !self.node_data(n).hidden)
    }

    /// Returns `true` if the node handle points into the arena.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.nodes.len()
    }

    /// Returns `true` if the edge handle points at a live edge slot.
    #[must_use]
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges.get(edge.index()).is_some_and(Option::is_some)
    }

    /// The kind of a node.
    #[must_use]
    pub fn node_kind(&self, node: NodeId) -> NodeKind {
        self.node_data(node).kind
    }

    /// The row a node sits on.
    #[must_use]
    pub fn row_index(&self, node: NodeId) -> RowIndex {
        self.node_data(node).row
    }

    /// The commit id attached to a node, if it is a commit node.
    #[must_use]
    pub fn commit_id(&self, node: NodeId) -> Option<&str> {
        self.node_data(node).commit_id.as_deref()
    }

    /// Looks up the node carrying the given commit id.
    #[must_use]
    pub fn node_by_commit_id(&self, id: &str) -> Option<NodeId> {
        self.commit_nodes.get(id).copied()
    }

    /// Whether the node is part of the visible row set.
    #[must_use]
    pub fn is_visible_node(&self, node: NodeId) -> bool {
        !self.node_data(node).hidden
    }

    /// Whether the edge is part of the visible edge set.
    #[must_use]
    pub fn is_visible_edge(&self, edge: EdgeId) -> bool {
        !self.edge_data(edge).hidden
    }

    /// The kind of an edge.
    #[must_use]
    pub fn edge_kind(&self, edge: EdgeId) -> EdgeKind {
        self.edge_data(edge).kind
    }

    /// The endpoint of an edge on the smaller row index.
    #[must_use]
    pub fn up_node(&self, edge: EdgeId) -> NodeId {
        self.edge_data(edge).up_node
    }

    /// The endpoint of an edge on the larger row index.
    #[must_use]
    pub fn down_node(&self, edge: EdgeId) -> NodeId {
        self.edge_data(edge).down_node
    }

    /// Visible edges entering the node from above, in stable order.
    pub fn up_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.node_data(node)
            .up_edges
            .iter()
            .copied()
            .filter(|&e| !self.edge_data(e).hidden)
    }

    /// Visible edges leaving the node downwards, in stable order.
    pub fn down_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.node_data(node)
            .down_edges
            .iter()
            .copied()
            .filter(|&e| !self.edge_data(e).hidden)
    }

    /// Visible neighbours of the node on smaller row indices.
    pub fn up_neighbours(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.up_edges(node).map(|e| self.up_node(e))
    }

    /// Visible neighbours of the node on larger row indices.
    pub fn down_neighbours(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.down_edges(node).map(|e| self.down_node(e))
    }

    /// A `HiddenFragment` edge touching this node, if any.
    ///
    /// Down edges are searched before up edges, so for a node that is both
    /// the bottom of one collapsed fragment and the top of another, the
    /// fragment below it wins.
    #[must_use]
    pub fn hidden_fragment_edge_at(&self, node: NodeId) -> Option<EdgeId> {
        self.down_edges(node)
            .chain(self.up_edges(node))
            .find(|&e| self.edge_kind(e) == EdgeKind::HiddenFragment)
    }

    /// The `HiddenFragment` edge joining the two nodes, if any.
    #[must_use]
    pub fn hidden_fragment_edge_between(&self, up: NodeId, down: NodeId) -> Option<EdgeId> {
        self.down_edges(up)
            .find(|&e| self.edge_kind(e) == EdgeKind::HiddenFragment && self.down_node(e) == down)
    }

    /// All visible `HiddenFragment` edges, in arena order.
    pub fn hidden_fragment_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().enumerate().filter_map(|(i, slot)| {
            let data = slot.as_ref()?;
            (data.kind == EdgeKind::HiddenFragment && !data.hidden).then(|| EdgeId::new(i))
        })
    }

    fn node_data(&self, node: NodeId) -> &NodeData {
        panic_invalid_node(self, node);
        &self.nodes[node.index()]
    }

    fn edge_data(&self, edge: EdgeId) -> &EdgeData {
        panic_invalid_edge(self, edge);
        self.edges[edge.index()].as_ref().unwrap()
    }
}

/// Mutation, reserved for the graph builder and the fragment patches.
impl Graph {
    pub(crate) fn add_row(&mut self) -> RowIndex {
        self.rows.push(NodeRow::default());
        self.rows.len() - 1
    }

    pub(crate) fn add_node(
        &mut self,
        row: RowIndex,
        kind: NodeKind,
        commit_id: Option<SmolStr>,
    ) -> NodeId {
        let node = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            row,
            kind,
            commit_id: commit_id.clone(),
            up_edges: Vec::new(),
            down_edges: Vec::new(),
            hidden: false,
        });
        self.rows[row].nodes.push(node);
        if let Some(id) = commit_id {
            self.commit_nodes.insert(id, node);
        }
        node
    }

    /// Connect two nodes. The up endpoint must sit on a strictly smaller
    /// row than the down endpoint.
    pub(crate) fn add_edge(&mut self, up: NodeId, down: NodeId, kind: EdgeKind) -> EdgeId {
        debug_assert!(
            self.row_index(up) < self.row_index(down),
            "edge endpoints out of row order: {up} -> {down}"
        );
        let data = EdgeData {
            up_node: up,
            down_node: down,
            kind,
            hidden: false,
        };
        let edge = match self.free_edges.pop() {
            Some(edge) => {
                self.edges[edge.index()] = Some(data);
                edge
            }
            None => {
                self.edges.push(Some(data));
                EdgeId::new(self.edges.len() - 1)
            }
        };
        self.nodes[up.index()].down_edges.push(edge);
        self.nodes[down.index()].up_edges.push(edge);
        edge
    }

    /// Detach an edge from its endpoints and free its slot.
    pub(crate) fn remove_edge(&mut self, edge: EdgeId) {
        let data = self.edges[edge.index()]
            .take()
            .unwrap_or_else(|| panic!("removing freed edge slot {edge}"));
        self.nodes[data.up_node.index()]
            .down_edges
            .retain(|&e| e != edge);
        self.nodes[data.down_node.index()]
            .up_edges
            .retain(|&e| e != edge);
        self.replaced.remove(&edge);
        self.free_edges.push(edge);
    }

    pub(crate) fn set_node_hidden(&mut self, node: NodeId, hidden: bool) {
        panic_invalid_node(self, node);
        self.nodes[node.index()].hidden = hidden;
    }

    pub(crate) fn set_edge_hidden(&mut self, edge: EdgeId, hidden: bool) {
        panic_invalid_edge(self, edge);
        self.edges[edge.index()].as_mut().unwrap().hidden = hidden;
    }

    pub(crate) fn set_replaced(&mut self, edge: EdgeId, replaced: ReplacedFragment) {
        self.replaced.insert(edge, replaced);
    }

    pub(crate) fn take_replaced(&mut self, edge: EdgeId) -> Option<ReplacedFragment> {
        self.replaced.remove(&edge)
    }
}

fn panic_invalid_node(graph: &Graph, node: NodeId) {
    assert!(
        graph.contains_node(node),
        "received an invalid node handle {node}"
    );
}

fn panic_invalid_edge(graph: &Graph, edge: EdgeId) {
    assert!(
        graph.contains_edge(edge),
        "received an invalid edge handle {edge}"
    );
}
