use std::sync::Arc;

use flowgraph_runtime::{Runtime, TracingNotifier};
use flowgraph_workflow::Limits;
use tokio_util::sync::CancellationToken;

use crate::auth::{IdentityProvider, TokenIdentityProvider};
use crate::config::ServerConfig;

/// Shared application state for axum handlers.
pub struct AppState {
  pub runtime: Runtime<TracingNotifier>,
  pub identity: Arc<dyn IdentityProvider>,
  /// Resolved once from the config; see [`ServerConfig::auth_bypass_enabled`].
  pub auth_bypass: bool,
  pub limits: Limits,
  /// Parent of every run's cancellation token.
  pub shutdown: CancellationToken,
}

impl AppState {
  pub fn new(
    config: &ServerConfig,
    identity: Arc<dyn IdentityProvider>,
    shutdown: CancellationToken,
  ) -> Self {
    Self {
      runtime: Runtime::with_notifier(config.runtime_config(), TracingNotifier),
      identity,
      auth_bypass: config.auth_bypass_enabled(),
      limits: config.limits,
      shutdown,
    }
  }

  /// State backed by the bearer tokens listed in the config.
  pub fn from_config(config: &ServerConfig, shutdown: CancellationToken) -> Self {
    let identity = Arc::new(TokenIdentityProvider::new(&config.auth.tokens));
    Self::new(config, identity, shutdown)
  }
}
