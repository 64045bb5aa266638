//! Row-indexed commit graph model with collapsible linear-history fragments.
//!
//! This crate contains the core definitions for the revgraph engine.
//! See the [top-level crate documentation](https://docs.rs/revgraph/latest/revgraph/)
//! for more information.

pub mod core;
pub mod fragment;
pub mod graph;
pub mod manager;

pub use crate::core::{EdgeId, EdgeKind, GraphElement, NodeId, NodeKind, RowIndex};
pub use crate::fragment::{Fragment, FragmentFinder, ReplaceError};
pub use crate::graph::{BuildError, CommitData, Graph, GraphBuilder, GraphError};
pub use crate::manager::{FragmentManager, ToggleError, Update};
