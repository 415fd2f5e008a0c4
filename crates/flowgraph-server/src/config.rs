//! Server configuration, loaded from TOML.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8787"
//! environment = "development"
//!
//! [auth]
//! allow_unauthenticated = true
//!
//! [[auth.tokens]]
//! principal = "ci"
//! token = "${FLOWGRAPH_CI_TOKEN}"
//!
//! [runtime]
//! node_timeout_ms = 30000
//! condition_gating = false
//!
//! [limits]
//! max_nodes = 50
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use flowgraph_runtime::RuntimeConfig;
use flowgraph_workflow::Limits;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("failed to read config file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid config: {0}")]
  Parse(#[from] toml::de::Error),

  #[error(
    "auth.allow_unauthenticated cannot be enabled when server.environment is \"production\""
  )]
  InsecureAuthBypass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
  Development,
  /// The default, so that forgetting to set an environment never loosens auth.
  #[default]
  Production,
}

/// Top-level server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
  #[serde(default)]
  pub server: ListenConfig,
  #[serde(default)]
  pub auth: AuthConfig,
  #[serde(default)]
  pub runtime: RuntimeSettings,
  #[serde(default)]
  pub limits: Limits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenConfig {
  #[serde(default = "default_bind")]
  pub bind: String,
  #[serde(default)]
  pub environment: Environment,
}

impl Default for ListenConfig {
  fn default() -> Self {
    Self {
      bind: default_bind(),
      environment: Environment::default(),
    }
  }
}

fn default_bind() -> String {
  "127.0.0.1:8787".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
  /// Skip the identity check entirely. Only honoured in development.
  #[serde(default)]
  pub allow_unauthenticated: bool,
  /// Bearer tokens accepted by the built-in identity provider.
  #[serde(default)]
  pub tokens: Vec<TokenConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
  pub principal: String,
  pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSettings {
  /// Per-node timeout. `0` disables it.
  #[serde(default = "default_node_timeout_ms")]
  pub node_timeout_ms: u64,
  #[serde(default)]
  pub condition_gating: bool,
}

impl Default for RuntimeSettings {
  fn default() -> Self {
    Self {
      node_timeout_ms: default_node_timeout_ms(),
      condition_gating: false,
    }
  }
}

fn default_node_timeout_ms() -> u64 {
  30_000
}

impl ServerConfig {
  /// Load config from a TOML file, with env var expansion, and validate it.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::parse(&content)
  }

  /// Like [`load`](Self::load), but a missing file yields the defaults.
  pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
    if path.exists() {
      Self::load(path)
    } else {
      Ok(Self::default())
    }
  }

  /// Parse and validate TOML text.
  pub fn parse(content: &str) -> Result<Self, ConfigError> {
    let expanded = expand_env_vars(content);
    let config: Self = toml::from_str(&expanded)?;
    config.validate()?;
    Ok(config)
  }

  /// Reject combinations that would open the server up unintentionally.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.auth.allow_unauthenticated && self.server.environment == Environment::Production {
      return Err(ConfigError::InsecureAuthBypass);
    }
    Ok(())
  }

  /// Whether requests skip the identity check.
  ///
  /// Requires both `allow_unauthenticated` and a development environment,
  /// independently of whether [`validate`](Self::validate) was called.
  pub fn auth_bypass_enabled(&self) -> bool {
    self.auth.allow_unauthenticated && self.server.environment == Environment::Development
  }

  pub fn runtime_config(&self) -> RuntimeConfig {
    RuntimeConfig {
      node_timeout: match self.runtime.node_timeout_ms {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
      },
      condition_gating: self.runtime.condition_gating,
    }
  }
}

/// Expand `${ENV_VAR}` patterns in a string.
fn expand_env_vars(input: &str) -> String {
  let mut result = String::with_capacity(input.len());
  let mut chars = input.chars().peekable();

  while let Some(c) = chars.next() {
    if c == '$' && chars.peek() == Some(&'{') {
      chars.next();
      let mut var_name = String::new();
      for c in chars.by_ref() {
        if c == '}' {
          break;
        }
        var_name.push(c);
      }
      match std::env::var(&var_name) {
        Ok(val) => result.push_str(&val),
        // Leave the placeholder in place if the env var is not set
        Err(_) => result.push_str(&format!("${{{}}}", var_name)),
      }
    } else {
      result.push(c);
    }
  }
  result
}
