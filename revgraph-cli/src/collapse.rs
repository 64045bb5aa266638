//! The `collapse` subcommand.

use std::io::Write;

use clap::Parser;

use revgraph::{FragmentManager, GraphElement, ToggleError};

use crate::CliError;
use crate::graph_io::GraphInputArgs;
use crate::render::write_rows;

/// Collapse linear history and show what remains.
#[derive(Parser, Debug)]
#[clap(version = "1.0", long_about = None)]
#[clap(about = "Collapse a commit graph.")]
#[group(id = "revgraph")]
#[non_exhaustive]
pub struct CollapseArgs {
    /// Commit list input.
    #[command(flatten)]
    pub input_args: GraphInputArgs,
    /// Toggle only the fragment at this commit instead of collapsing
    /// everything.
    #[arg(short, long)]
    pub commit: Option<String>,
}

impl CollapseArgs {
    /// Run the collapse subcommand.
    pub fn run(&mut self, out: &mut impl Write) -> Result<(), CliError> {
        let mut manager = FragmentManager::new(self.input_args.get_graph()?);

        match &self.commit {
            Some(id) => {
                let node =
                    manager
                        .graph()
                        .node_by_commit_id(id)
                        .ok_or_else(|| CliError::UnknownCommit { id: id.clone() })?;
                let fragment = manager
                    .relate_fragment(GraphElement::Node(node))
                    .map_err(ToggleError::from)?;
                match fragment {
                    Some(fragment) => {
                        let update = manager
                            .toggle_visibility(&fragment)
                            .map_err(ToggleError::from)?;
                        match update.row_range(manager.graph()) {
                            Some((top, bottom)) => writeln!(out, "rows {top}..={bottom} changed")?,
                            None => writeln!(out, "full rebuild")?,
                        }
                    }
                    None => writeln!(out, "nothing to collapse at {id}")?,
                }
            }
            None => {
                manager.hide_all()?;
                tracing::info!(
                    "collapsed into {} hidden edges",
                    manager.graph().hidden_fragment_edges().count()
                );
                writeln!(out, "full rebuild")?;
            }
        }

        write_rows(manager.graph(), out)?;
        Ok(())
    }
}
