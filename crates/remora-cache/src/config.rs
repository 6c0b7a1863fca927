//! Layer configuration and loading.

use config::{Config, Environment, File};
use remora_core::{RemoraError, RemoraResult, DEFAULT_TTL_SECS};
use remora_store::{BackendConfig, DEFAULT_NAMESPACE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Root configuration for the caching layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Backend selection and connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Namespace prefix for every key.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// TTL applied when the caller enables caching without one.
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,

    /// Annotate hit results with an origin marker.
    #[serde(default)]
    pub debug: bool,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

const fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            namespace: default_namespace(),
            default_ttl_secs: default_ttl_secs(),
            debug: false,
        }
    }
}

impl CacheConfig {
    /// Creates a configuration over the given backend with defaults for
    /// everything else.
    #[must_use]
    pub fn with_backend(backend: BackendConfig) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    /// Enables the debug origin marker.
    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Loads configuration from layered sources.
    ///
    /// Sources, in order: `<config_dir>/cache.toml` when present, then
    /// environment variables with the `REMORA_` prefix.
    pub fn load(config_dir: &str) -> RemoraResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let mut builder = Config::builder();

        let file_path = format!("{}/cache.toml", config_dir);
        if Path::new(&file_path).exists() {
            debug!("Loading cache config from: {}", file_path);
            builder = builder.add_source(File::with_name(&file_path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("REMORA")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| RemoraError::Configuration(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| RemoraError::Configuration(e.to_string()))
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> RemoraResult<Self> {
        Self::load("./config")
    }
}
