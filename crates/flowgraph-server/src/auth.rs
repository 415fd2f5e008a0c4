//! Identity seam.
//!
//! The server never decides who a caller is by itself: it asks an
//! [`IdentityProvider`]. The built-in [`TokenIdentityProvider`] maps static
//! bearer tokens from the config file to principals.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use crate::config::TokenConfig;

/// Principal reported when the development auth bypass is active.
pub const ANONYMOUS: &str = "anonymous";

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
  pub id: String,
}

impl Principal {
  pub fn new(id: impl Into<String>) -> Self {
    Self { id: id.into() }
  }

  pub fn anonymous() -> Self {
    Self::new(ANONYMOUS)
  }
}

/// Resolves the principal behind a request, or `None` if there is none.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
  async fn authenticate(&self, headers: &HeaderMap) -> Option<Principal>;
}

/// Accepts `Authorization: Bearer <token>` for a fixed set of tokens.
#[derive(Debug, Clone, Default)]
pub struct TokenIdentityProvider {
  tokens: HashMap<String, String>,
}

impl TokenIdentityProvider {
  pub fn new(tokens: &[TokenConfig]) -> Self {
    let tokens = tokens
      .iter()
      .filter(|t| !t.token.is_empty())
      .map(|t| (t.token.clone(), t.principal.clone()))
      .collect();
    Self { tokens }
  }

  pub fn is_empty(&self) -> bool {
    self.tokens.is_empty()
  }
}

#[async_trait]
impl IdentityProvider for TokenIdentityProvider {
  async fn authenticate(&self, headers: &HeaderMap) -> Option<Principal> {
    let token = bearer_token(headers)?;
    self.tokens.get(token).map(Principal::new)
  }
}

/// Extract the token from an `Authorization: Bearer` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
}
