use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::state::AppState;

/// Extractor that resolves the caller through the configured identity
/// provider. Rejects with `401` before the body is read.
pub struct Authenticated(pub Principal);

impl FromRequestParts<Arc<AppState>> for Authenticated {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &Arc<AppState>,
  ) -> Result<Self, Self::Rejection> {
    if state.auth_bypass {
      return Ok(Authenticated(Principal::anonymous()));
    }

    match state.identity.authenticate(&parts.headers).await {
      Some(principal) => Ok(Authenticated(principal)),
      None => {
        debug!(path = %parts.uri.path(), "rejecting unauthenticated request");
        Err(ApiError::Unauthorized)
      }
    }
  }
}
