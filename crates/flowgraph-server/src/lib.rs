//! Flowgraph Server
//!
//! HTTP boundary over the flowgraph runtime. A request is authenticated,
//! parsed, validated and executed, in that order:
//!
//! - `401` when the [`IdentityProvider`] reports no principal (unless the
//!   development bypass is on),
//! - `400` for bodies that are not JSON, not a flow, or fail validation,
//! - `200` with the [`RunResult`](flowgraph_runtime::RunResult) otherwise,
//!   even when individual nodes failed.

mod auth;
mod config;
mod error;
mod middleware;
mod routes;
mod server;
mod state;

pub use auth::{ANONYMOUS, IdentityProvider, Principal, TokenIdentityProvider, bearer_token};
pub use config::{
  AuthConfig, ConfigError, Environment, ListenConfig, RuntimeSettings, ServerConfig, TokenConfig,
};
pub use error::{ApiError, MALFORMED_GRAPH};
pub use middleware::Authenticated;
pub use routes::router;
pub use server::FlowServer;
pub use state::AppState;
