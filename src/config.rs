//! Service configuration file (`config.yaml`).
//!
//! ```yaml
//! spec_path: doc/openapi.yaml
//! http:
//!   addr: 0.0.0.0:8080
//!   stack_size: "0x8000"
//! logging:
//!   level: debug
//!   format: pretty
//! ```
//!
//! Every key is optional. A missing file yields the defaults; command-line
//! flags are applied on top with [`ServiceConfig::merge_cli`].

use crate::runtime_config::{parse_stack_size, RuntimeConfig};
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Address `serve` binds when neither the file nor the CLI names one.
pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";

fn default_addr() -> String {
    DEFAULT_ADDR.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    /// Coroutine stack size, decimal or `0x` hex
    pub stack_size: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            stack_size: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub spec_path: Option<PathBuf>,
}

impl ServiceConfig {
    /// Load `path`, falling back to defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No service config, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse YAML; an empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed YAML or mistyped keys.
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply command-line overrides.
    pub fn merge_cli(&mut self, spec: Option<PathBuf>, addr: Option<String>) {
        if let Some(spec) = spec {
            self.spec_path = Some(spec);
        }
        if let Some(addr) = addr {
            self.http.addr = addr;
        }
    }

    /// Environment runtime settings with `http.stack_size` taking precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if `http.stack_size` is not a positive number.
    pub fn runtime(&self) -> anyhow::Result<RuntimeConfig> {
        let mut runtime = RuntimeConfig::from_env();
        if let Some(raw) = &self.http.stack_size {
            runtime.stack_size = parse_stack_size(raw)
                .with_context(|| format!("invalid http.stack_size: {raw}"))?;
        }
        Ok(runtime)
    }
}
