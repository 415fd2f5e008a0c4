//! Flowgraph Config
//!
//! This crate contains the serializable flow graph types accepted at the
//! request boundary. These types represent a flow before it is validated
//! and locked by `flowgraph-workflow`.
//!
//! Definitions arrive as:
//! - JSON request bodies (`POST /api/flow/execute`)
//! - JSON files (via CLI with `flowgraph run flow.json`)
//!
//! Node `type` tags are kept as raw strings here. Deciding whether a tag is
//! a known node kind is the validator's job, so an unknown tag is reported
//! as a validation error rather than a parse error.

mod edge;
mod flow;
mod node;

pub use edge::EdgeDef;
pub use flow::FlowDef;
pub use node::{NodeDef, Position};
