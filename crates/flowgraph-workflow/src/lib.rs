//! Flowgraph Workflow
//!
//! This crate provides the "locked" workflow representation for flowgraph.
//! A locked workflow is a validated form of a submitted [`FlowDef`] that is
//! ready for execution.
//!
//! Key differences from `flowgraph-config`:
//! - Node ids are non-empty and unique
//! - Every node type tag is a known [`NodeKind`]
//! - Every edge endpoint exists
//! - The graph is acyclic, and a deterministic execution order is computed
//!
//! [`FlowDef`]: flowgraph_config::FlowDef

mod error;
mod graph;
mod limits;
mod node;
mod validate;
mod workflow;

pub use error::ValidationError;
pub use graph::Graph;
pub use limits::Limits;
pub use node::{Node, NodeKind};
pub use validate::validate;
pub use workflow::Workflow;
