use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// HTTP server exposing flow execution.
pub struct FlowServer {
  config: ServerConfig,
}

impl FlowServer {
  pub fn new(config: ServerConfig) -> Self {
    Self { config }
  }

  /// Run the server until the cancellation token is triggered.
  ///
  /// In-flight runs observe the same token and stop before their next node.
  pub async fn run(&self, shutdown: CancellationToken) -> anyhow::Result<()> {
    self.config.validate()?;

    let state = Arc::new(AppState::from_config(&self.config, shutdown.clone()));
    if state.auth_bypass {
      warn!("authentication is DISABLED (development mode); every request runs as anonymous");
    } else if self.config.auth.tokens.is_empty() {
      warn!("no auth tokens configured; every flow execution request will be rejected");
    }

    let app = routes::router(state);

    let listener = TcpListener::bind(&self.config.server.bind).await?;
    info!(bind = %self.config.server.bind, "flowgraph listening");

    axum::serve(listener, app)
      .with_graceful_shutdown(async move { shutdown.cancelled().await })
      .await?;

    info!("flowgraph shut down");
    Ok(())
  }
}
