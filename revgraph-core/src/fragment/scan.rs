//! Minimal-fragment scans.
//!
//! [`down_fragment`] and [`up_fragment`] find the smallest span starting
//! at a commit node whose interior is fully enclosed: every neighbour of
//! an interior node on the scanned side lies inside the span. Higher
//! level queries ([`crate::fragment::FragmentFinder`]) are built by
//! chaining these.

use fxhash::FxHashSet;

use crate::core::{NodeId, NodeKind};
use crate::fragment::Fragment;
use crate::graph::{Graph, GraphError};

/// Finds the minimal fragment extending downwards from `start`.
///
/// Scans rows below `start` in increasing order, tracking the frontier of
/// nodes already inside the span and the set of nodes reached but not yet
/// scanned. The first commit node that empties the reachable set and
/// whose up-neighbours are all enclosed becomes the fragment's down node.
///
/// `is_pinned` marks nodes that must not be swallowed into a fragment
/// interior; the predicate is re-evaluated on every call, never cached.
/// An enclosed pinned node stops the scan from growing past its row.
///
/// Returns `None` if no enclosed span exists below `start`; this is a
/// normal outcome, not an error.
///
/// # Errors
///
/// [`GraphError::NotACommit`] if `start` is an [`EdgeStub`] node.
///
/// [`EdgeStub`]: crate::core::NodeKind::EdgeStub
pub fn down_fragment(
    graph: &Graph,
    start: NodeId,
    is_pinned: impl Fn(NodeId) -> bool,
) -> Result<Option<Fragment>, GraphError> {
    if graph.node_kind(start) != NodeKind::Commit {
        return Err(GraphError::NotACommit { node: start });
    }

    let mut enclosed: FxHashSet<NodeId> = std::iter::once(start).collect();
    let mut pending: FxHashSet<NodeId> = graph.down_neighbours(start).collect();

    let mut end = None;
    // Set once the fragment cannot extend below the current row; the rest
    // of the row is still scanned, so an end node later in the same row
    // can still be accepted.
    let mut bounded = false;

    for row in graph.row_index(start) + 1..graph.num_rows() {
        for node in graph.visible_nodes_in_row(row) {
            if !pending.remove(&node) {
                continue;
            }
            if pending.is_empty() && graph.node_kind(node) == NodeKind::Commit {
                if graph.up_neighbours(node).all(|up| enclosed.contains(&up)) {
                    end = Some(node);
                }
                bounded = true;
                break;
            }
            if !graph.up_neighbours(node).all(|up| enclosed.contains(&up)) || is_pinned(node) {
                bounded = true;
            }
            enclosed.insert(node);
            pending.extend(graph.down_neighbours(node));
        }
        if bounded {
            break;
        }
    }

    Ok(end.map(|down| {
        enclosed.remove(&start);
        Fragment::new(start, down, enclosed)
    }))
}

/// Mirror of [`down_fragment`], scanning rows above `start` in decreasing
/// order with the edge directions swapped. The returned fragment has the
/// discovered ancestor as its up node and `start` as its down node.
///
/// # Errors
///
/// [`GraphError::NotACommit`] if `start` is an [`EdgeStub`] node.
///
/// [`EdgeStub`]: crate::core::NodeKind::EdgeStub
pub fn up_fragment(
    graph: &Graph,
    start: NodeId,
    is_pinned: impl Fn(NodeId) -> bool,
) -> Result<Option<Fragment>, GraphError> {
    if graph.node_kind(start) != NodeKind::Commit {
        return Err(GraphError::NotACommit { node: start });
    }

    let mut enclosed: FxHashSet<NodeId> = std::iter::once(start).collect();
    let mut pending: FxHashSet<NodeId> = graph.up_neighbours(start).collect();

    let mut end = None;
    let mut bounded = false;

    for row in (0..graph.row_index(start)).rev() {
        for node in graph.visible_nodes_in_row(row) {
            if !pending.remove(&node) {
                continue;
            }
            if pending.is_empty() && graph.node_kind(node) == NodeKind::Commit {
                if graph
                    .down_neighbours(node)
                    .all(|down| enclosed.contains(&down))
                {
                    end = Some(node);
                }
                bounded = true;
                break;
            }
            if !graph
                .down_neighbours(node)
                .all(|down| enclosed.contains(&down))
                || is_pinned(node)
            {
                bounded = true;
            }
            enclosed.insert(node);
            pending.extend(graph.up_neighbours(node));
        }
        if bounded {
            break;
        }
    }

    Ok(end.map(|up| {
        enclosed.remove(&start);
        Fragment::new(up, start, enclosed)
    }))
}

/// A predicate that pins nothing; the default for scans with no external
/// visibility constraints.
pub fn unpinned(_: NodeId) -> bool {
    false
}
