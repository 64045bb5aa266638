//! Standard command line tools, used by the revgraph binary.

use std::ffi::OsString;

use clap::Parser;
use thiserror::Error;

pub mod collapse;
pub mod graph_io;
pub mod render;

/// CLI arguments.
#[derive(Parser, Debug)]
#[clap(version = "1.0", long_about = None)]
#[clap(about = "Commit graph CLI tools.")]
#[group(id = "revgraph")]
#[non_exhaustive]
pub enum CliArgs {
    /// Render a commit list as graph rows.
    Render(render::RenderArgs),
    /// Collapse linear history and show what remains.
    Collapse(collapse::CollapseArgs),
    /// External commands
    #[command(external_subcommand)]
    External(Vec<OsString>),
}

/// Error type for the CLI.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    /// Error reading input.
    #[error("Error reading from path: {0}")]
    InputFile(#[from] std::io::Error),
    /// Error parsing the commit list.
    #[error("Error parsing input: {0}")]
    Parse(#[from] serde_json::Error),
    /// The commit list does not describe a valid graph.
    #[error(transparent)]
    Build(#[from] revgraph::BuildError),
    /// A collapse operation failed.
    #[error(transparent)]
    Toggle(#[from] revgraph::ToggleError),
    /// A commit named on the command line is not in the input.
    #[error("No commit {id:?} in the input")]
    UnknownCommit {
        /// The missing commit id.
        id: String,
    },
}
