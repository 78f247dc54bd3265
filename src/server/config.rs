//! Configuration loading for tokenlensd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.tokenlens/config.toml` (user)
//! 3. `/etc/tokenlens/config.toml` (system)
//!
//! When no file is found the built-in defaults are used.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::reconstruct::PaddingConvention;
use crate::tokenizer::{CacheConfig, HfLoader, TokenizerSource};
use crate::{Result, TokenLensError};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub tokenizers: TokenizersConfig,
    #[serde(default)]
    pub padding: PaddingConvention,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8000).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:8000".to_string()
}

/// Tokenizer loading configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenizersConfig {
    /// Directory for Hub downloads.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Default Hub revision for unpinned models.
    #[serde(default)]
    pub revision: Option<String>,
    /// Per-model source overrides, keyed on the model identifier clients send.
    #[serde(default)]
    pub sources: HashMap<String, TokenizerSource>,
}

impl TokenizersConfig {
    /// Build the loader described by this section.
    pub fn loader(&self) -> HfLoader {
        let mut loader = HfLoader::new();
        if let Some(dir) = &self.cache_dir {
            loader = loader.cache_dir(dir);
        }
        if let Some(rev) = &self.revision {
            loader = loader.revision(rev);
        }
        for (model_id, source) in &self.sources {
            loader = loader.source(model_id, source.clone());
        }
        loader
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.tokenlens/config.toml`
    /// 3. `/etc/tokenlens/config.toml`
    /// 4. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| TokenLensError::Configuration(format!("Failed to parse config: {e}")))
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TokenLensError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            TokenLensError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(TokenLensError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".tokenlens").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/tokenlens/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}
