//! Flowgraph Runtime
//!
//! This crate executes validated flows. It owns the per-run
//! [`ExecutionContext`], resolves `{{ path }}` templates against it, and
//! dispatches each node to the executor for its kind.
//!
//! The entry point is [`Runtime`]: `invoke(workflow, principal, cancel)`
//! walks the workflow in topological order, one node at a time, and returns
//! a [`RunResult`] with one [`NodeResult`] per node. Node failures are
//! recorded in the result, never returned as errors; only cancellation and
//! validation failures surface as [`RuntimeError`].

mod context;
mod error;
mod events;
pub mod executor;
mod result;
mod runtime;
pub mod template;

pub use context::{ExecutionContext, Scope};
pub use error::{NodeError, RuntimeError};
pub use events::{
  ChannelNotifier, ExecutionEvent, ExecutionNotifier, NoopNotifier, TracingNotifier,
};
pub use executor::{BuiltinExecutor, NodeExecutor};
pub use result::{NodeResult, NodeStatus, RunResult};
pub use runtime::{Runtime, RuntimeConfig};
