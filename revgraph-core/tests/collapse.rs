//! End-to-end collapse/expand scenarios over the public API.

use rstest::{fixture, rstest};

use revgraph_core::{
    CommitData, EdgeKind, Fragment, FragmentManager, GraphBuilder, GraphElement, NodeId, Update,
};

fn commit(id: &str, parents: &[&str]) -> CommitData {
    CommitData::new(id, parents.iter().copied())
}

/// A short feature branch merged back into a linear mainline:
///
/// ```text
///   row 0   m0          merge commit
///   row 1   a1  |
///   row 2   a2  |
///   row 3   m3          merge base
///   row 4   m4
///   row 5   m5
///   row 6   m6
/// ```
#[fixture]
fn history() -> FragmentManager {
    let commits = [
        commit("m0", &["a1", "m3"]),
        commit("a1", &["a2"]),
        commit("a2", &["m3"]),
        commit("m3", &["m4"]),
        commit("m4", &["m5"]),
        commit("m5", &["m6"]),
        commit("m6", &[]),
    ];
    FragmentManager::new(GraphBuilder::build(&commits).unwrap())
}

fn node(manager: &FragmentManager, id: &str) -> NodeId {
    manager.graph().node_by_commit_id(id).unwrap()
}

fn visible_commits(manager: &FragmentManager) -> Vec<String> {
    let graph = manager.graph();
    (0..graph.num_rows())
        .flat_map(|row| graph.visible_nodes_in_row(row))
        .filter_map(|n| graph.commit_id(n).map(str::to_owned))
        .collect()
}

#[rstest]
fn collapse_all_then_expand_all_round_trips(history: FragmentManager) {
    let mut manager = history;
    let before = visible_commits(&manager);

    let update = manager.hide_all().unwrap();
    assert_eq!(update, Update::Full);
    // The whole history collapses into one hidden edge.
    assert_eq!(manager.graph().hidden_fragment_edges().count(), 1);
    assert_eq!(visible_commits(&manager), ["m0", "m6"]);

    let update = manager.show_all().unwrap();
    assert_eq!(update, Update::Full);
    assert_eq!(manager.graph().hidden_fragment_edges().count(), 0);
    assert_eq!(visible_commits(&manager), before);
}

#[rstest]
fn collapse_all_twice_changes_nothing(history: FragmentManager) {
    let mut manager = history;
    manager.hide_all().unwrap();
    let once = visible_commits(&manager);
    manager.hide_all().unwrap();
    assert_eq!(visible_commits(&manager), once);
    assert_eq!(manager.graph().hidden_fragment_edges().count(), 1);
}

#[rstest]
fn toggling_the_mainline_tail(history: FragmentManager) {
    let mut manager = history;
    let m3 = node(&manager, "m3");

    // A branch interior cannot collapse: the mainline edge routed past
    // it keeps its merge point from being enclosed.
    let a1 = node(&manager, "a1");
    assert_eq!(manager.relate_fragment(GraphElement::Node(a1)).unwrap(), None);

    let fragment = manager
        .relate_fragment(GraphElement::Node(m3))
        .unwrap()
        .unwrap();
    assert_eq!(fragment.down_node(), node(&manager, "m6"));
    assert_eq!(fragment.row_span(manager.graph()), (3, 6));

    let update = manager.toggle_visibility(&fragment).unwrap();
    assert_eq!(update.row_range(manager.graph()), Some((3, 6)));
    assert_eq!(
        visible_commits(&manager),
        ["m0", "a1", "a2", "m3", "m6"]
    );

    // The synthetic edge resolves back to the collapsed span, and
    // toggling it restores the tail.
    let edge = manager.graph().hidden_fragment_edges().next().unwrap();
    assert_eq!(manager.graph().edge_kind(edge), EdgeKind::HiddenFragment);
    let collapsed = manager
        .relate_fragment(GraphElement::Edge(edge))
        .unwrap()
        .unwrap();
    assert_eq!(collapsed, Fragment::collapsed(m3, node(&manager, "m6")));

    manager.toggle_visibility(&collapsed).unwrap();
    assert_eq!(visible_commits(&manager).len(), 7);
}

#[rstest]
fn pinned_commit_splits_the_collapse(history: FragmentManager) {
    let mut manager = history;
    let m4 = node(&manager, "m4");
    manager.set_pinned_fn(move |n| n == m4);

    manager.hide_all().unwrap();
    assert!(manager.graph().is_visible_node(m4));
    // m0..m4 collapses above the pin; m4..m6 collapses below it.
    assert_eq!(manager.graph().hidden_fragment_edges().count(), 2);
    assert_eq!(visible_commits(&manager), ["m0", "m4", "m6"]);
}

#[rstest]
fn branch_highlight_follows_the_linear_run(history: FragmentManager) {
    let manager = history;
    let elements = manager.current_branch(GraphElement::Node(node(&manager, "m4")));
    let mut nodes: Vec<_> = elements
        .iter()
        .filter_map(|e| match e {
            GraphElement::Node(n) => manager.graph().commit_id(*n).map(str::to_owned),
            GraphElement::Edge(_) => None,
        })
        .collect();
    nodes.sort();
    assert_eq!(nodes, ["m3", "m4", "m5", "m6"]);
}
