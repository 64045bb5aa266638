//! Reading commit lists from the command line.
//!
//! The input format is a JSON array of `{"id": "...", "parents": [...]}`
//! objects in display order; the graph builder assigns one row per
//! commit by list position.

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use clio::Input;

use revgraph::{CommitData, Graph, GraphBuilder};

use crate::CliError;

/// Arguments for reading a commit list.
#[derive(Parser, Debug)]
pub struct GraphInputArgs {
    /// Input commit list (JSON), use '-' for stdin.
    #[clap(value_parser, default_value = "-")]
    pub input: Input,
    /// Verbosity.
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl GraphInputArgs {
    /// Read the commit list from the input.
    pub fn get_commits(&mut self) -> Result<Vec<CommitData>, CliError> {
        let commits = serde_json::from_reader(&mut self.input)?;
        Ok(commits)
    }

    /// Read the commit list and build the row-indexed graph.
    pub fn get_graph(&mut self) -> Result<Graph, CliError> {
        let commits = self.get_commits()?;
        tracing::debug!("building graph from {} commits", commits.len());
        Ok(GraphBuilder::build(&commits)?)
    }
}
