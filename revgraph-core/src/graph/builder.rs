//! Construction of a [`Graph`] from an ordered commit list.
//!
//! This is the only way to populate a graph. Commits are appended in
//! display order, one row per commit; an edge whose parent sits more than
//! one row below its child is routed through an [`EdgeStub`] node on every
//! row in between, so every edge in the arena spans exactly one row.
//!
//! [`EdgeStub`]: crate::core::NodeKind::EdgeStub

use fxhash::FxHashMap;
use smol_str::SmolStr;
use thiserror::Error;

use super::Graph;
use crate::core::{EdgeKind, NodeId, NodeKind};

/// One commit of the input list: its id and the ids of its parents, in
/// first-parent order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CommitData {
    /// Commit identifier (typically an abbreviated hash).
    pub id: SmolStr,
    /// Parent commit ids. Parents must appear later in the commit list.
    #[serde(default)]
    pub parents: Vec<SmolStr>,
}

impl CommitData {
    /// Convenience constructor.
    pub fn new(id: impl Into<SmolStr>, parents: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        Self {
            id: id.into(),
            parents: parents.into_iter().map(Into::into).collect(),
        }
    }
}

/// Errors raised while building a graph from a commit list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// The same commit id appeared twice.
    #[error("duplicate commit id {id:?}")]
    DuplicateId {
        /// The repeated id.
        id: SmolStr,
    },
    /// A commit named a parent that never appears in the list.
    #[error("commit {child:?} names an unknown parent {parent:?}")]
    UnknownParent {
        /// The commit naming the parent.
        child: SmolStr,
        /// The missing parent id.
        parent: SmolStr,
    },
    /// A commit named a parent already placed on an earlier row.
    #[error("parent {parent:?} is listed before its child {child:?}")]
    ParentAbove {
        /// The commit naming the parent.
        child: SmolStr,
        /// The out-of-order parent id.
        parent: SmolStr,
    },
}

/// An edge that has left its child commit but not yet reached its parent.
/// `end` is the lowest node of the stub chain routed so far.
#[derive(Clone, Debug)]
struct OpenEdge {
    child: SmolStr,
    parent: SmolStr,
    end: NodeId,
}

/// Incremental builder appending one commit row at a time.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
    placed: FxHashMap<SmolStr, NodeId>,
    /// Edges still looking for their parent, in creation order.
    open: Vec<OpenEdge>,
}

impl GraphBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a complete commit list.
    pub fn build(commits: &[CommitData]) -> Result<Graph, BuildError> {
        let mut builder = Self::new();
        for commit in commits {
            builder.add_commit(commit)?;
        }
        builder.finish()
    }

    /// Append the next commit row.
    pub fn add_commit(&mut self, commit: &CommitData) -> Result<(), BuildError> {
        if self.placed.contains_key(&commit.id) {
            return Err(BuildError::DuplicateId {
                id: commit.id.clone(),
            });
        }
        let row = self.graph.add_row();
        let node = self
            .graph
            .add_node(row, NodeKind::Commit, Some(commit.id.clone()));
        self.placed.insert(commit.id.clone(), node);

        // Close edges arriving at this commit; route the rest through a
        // stub on this row.
        let open = std::mem::take(&mut self.open);
        for mut edge in open {
            if edge.parent == commit.id {
                self.graph.add_edge(edge.end, node, EdgeKind::Usual);
            } else {
                let stub = self.graph.add_node(row, NodeKind::EdgeStub, None);
                self.graph.add_edge(edge.end, stub, EdgeKind::Usual);
                edge.end = stub;
                self.open.push(edge);
            }
        }

        for parent in &commit.parents {
            if self.placed.contains_key(parent) {
                return Err(BuildError::ParentAbove {
                    child: commit.id.clone(),
                    parent: parent.clone(),
                });
            }
            self.open.push(OpenEdge {
                child: commit.id.clone(),
                parent: parent.clone(),
                end: node,
            });
        }
        Ok(())
    }

    /// Finish the build, failing if any edge never found its parent.
    pub fn finish(self) -> Result<Graph, BuildError> {
        if let Some(edge) = self.open.first() {
            return Err(BuildError::UnknownParent {
                child: edge.child.clone(),
                parent: edge.parent.clone(),
            });
        }
        Ok(self.graph)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    use cool_asserts::assert_matches;
    use rstest::rstest;

    /// A single chain `c0 -> c1 -> ... -> c{n-1}`.
    pub(crate) fn linear_commits(n: usize) -> Vec<CommitData> {
        (0..n)
            .map(|i| {
                let parents: Vec<String> = if i + 1 < n {
                    vec![format!("c{}", i + 1)]
                } else {
                    vec![]
                };
                CommitData::new(format!("c{i}"), parents)
            })
            .collect()
    }

    pub(crate) fn commit(id: &str, parents: &[&str]) -> CommitData {
        CommitData::new(id, parents.iter().copied())
    }

    #[rstest]
    fn linear_chain_has_no_stubs() {
        let graph = GraphBuilder::build(&linear_commits(4)).unwrap();
        assert_eq!(graph.num_rows(), 4);
        assert_eq!(graph.num_nodes(), 4);
        for row in graph.rows() {
            assert_eq!(row.nodes().count(), 1);
        }
    }

    #[rstest]
    fn long_edge_is_routed_through_stubs() {
        // c0's second parent is three rows down, so rows 1 and 2 each
        // carry one stub for it.
        let commits = [
            commit("c0", &["c1", "c3"]),
            commit("c1", &["c2"]),
            commit("c2", &["c3"]),
            commit("c3", &[]),
        ];
        let graph = GraphBuilder::build(&commits).unwrap();
        for (row, expected_stubs) in [(0, 0), (1, 1), (2, 1), (3, 0)] {
            let stubs = graph
                .visible_nodes_in_row(row)
                .filter(|&n| graph.node_kind(n) == NodeKind::EdgeStub)
                .count();
            assert_eq!(stubs, expected_stubs, "row {row}");
        }
        // The stub chain still connects c0 to c3.
        let c3 = graph.node_by_commit_id("c3").unwrap();
        assert_eq!(graph.up_edges(c3).count(), 2);
    }

    #[rstest]
    fn commit_list_parses_from_json() {
        let json = r#"[{"id": "a", "parents": ["b"]}, {"id": "b"}]"#;
        let commits: Vec<CommitData> = serde_json::from_str(json).unwrap();
        let graph = GraphBuilder::build(&commits).unwrap();
        assert_eq!(graph.num_rows(), 2);
        assert_eq!(graph.node_by_commit_id("b").map(|n| graph.row_index(n)), Some(1));
    }

    #[rstest]
    fn duplicate_id_is_rejected() {
        let commits = [commit("c0", &[]), commit("c0", &[])];
        assert_matches!(
            GraphBuilder::build(&commits),
            Err(BuildError::DuplicateId { .. })
        );
    }

    #[rstest]
    fn unknown_parent_is_rejected() {
        let commits = [commit("c0", &["ghost"])];
        assert_matches!(
            GraphBuilder::build(&commits),
            Err(BuildError::UnknownParent { .. })
        );
    }

    #[rstest]
    fn parent_above_child_is_rejected() {
        let commits = [commit("c0", &[]), commit("c1", &["c0"])];
        assert_matches!(
            GraphBuilder::build(&commits),
            Err(BuildError::ParentAbove { .. })
        );
    }
}
