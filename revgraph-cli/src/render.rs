//! The `render` subcommand.

use std::io::Write;

use clap::Parser;

use revgraph::{EdgeKind, FragmentManager, Graph, NodeKind};

use crate::CliError;
use crate::graph_io::GraphInputArgs;

/// Render a commit list as graph rows.
#[derive(Parser, Debug)]
#[clap(version = "1.0", long_about = None)]
#[clap(about = "Render a commit graph.")]
#[group(id = "revgraph")]
#[non_exhaustive]
pub struct RenderArgs {
    /// Commit list input.
    #[command(flatten)]
    pub input_args: GraphInputArgs,
    /// Start with all linear history collapsed.
    #[arg(long)]
    pub collapsed: bool,
}

impl RenderArgs {
    /// Read the input and print one line per visible row.
    pub fn run(&mut self, out: &mut impl Write) -> Result<(), CliError> {
        let mut manager = FragmentManager::new(self.input_args.get_graph()?);
        if self.collapsed {
            manager.hide_all()?;
            tracing::info!(
                "collapsed into {} hidden edges",
                manager.graph().hidden_fragment_edges().count()
            );
        }
        write_rows(manager.graph(), out)?;
        Ok(())
    }
}

/// Print the visible rows of a graph, one line each.
///
/// Commits are marked `*`, routing stubs `|`; a commit followed by a
/// collapsed span carries a `+N` marker with the number of rows hidden
/// below it.
pub fn write_rows(graph: &Graph, out: &mut impl Write) -> std::io::Result<()> {
    for row in 0..graph.num_rows() {
        let cells: Vec<String> = graph
            .visible_nodes_in_row(row)
            .map(|node| match graph.node_kind(node) {
                NodeKind::Commit => {
                    let id = graph.commit_id(node).unwrap_or("?");
                    match collapsed_rows_below(graph, node) {
                        0 => format!("* {id}"),
                        hidden => format!("* {id} +{hidden}"),
                    }
                }
                NodeKind::EdgeStub => "|".to_owned(),
            })
            .collect();
        if !cells.is_empty() {
            writeln!(out, "{row:>4}  {}", cells.join("  "))?;
        }
    }
    Ok(())
}

/// Rows hidden behind the collapsed spans hanging off this commit.
fn collapsed_rows_below(graph: &Graph, node: revgraph::NodeId) -> usize {
    graph
        .down_edges(node)
        .filter(|&e| graph.edge_kind(e) == EdgeKind::HiddenFragment)
        .map(|e| graph.row_index(graph.down_node(e)) - graph.row_index(node) - 1)
        .sum()
}
