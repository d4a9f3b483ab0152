// =============================================================================
// Runtime Configuration — service settings loaded once at startup
// =============================================================================
//
// Only the transport shell is configurable: listen address and the CORS
// origin allow-list.  Indicator parameters are fixed (`IndicatorParams`).
//
// Sources, lowest precedence first:
//   1. built-in defaults
//   2. `indicator_service.json` (every field optional)
//   3. `INDICATORS_BIND_ADDR` / `INDICATORS_ALLOWED_ORIGINS` env vars
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "indicator_service.json";

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["https://testindicators.onrender.com".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Browser origins allowed by CORS.  A single `*` allows any origin
    /// (without credentials).
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults
    /// with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            origins = ?config.allowed_origins,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("INDICATORS_BIND_ADDR") {
            let addr = addr.trim();
            if !addr.is_empty() {
                self.bind_addr = addr.to_string();
            }
        }

        if let Some(origins) = lookup("INDICATORS_ALLOWED_ORIGINS") {
            let parsed: Vec<String> = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !parsed.is_empty() {
                self.allowed_origins = parsed;
            }
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}
