//! Tokenizer capabilities and model resolution.
//!
//! The core operations only need two things from a tokenizer: encoding text
//! into ids with character offsets, and decoding an id sequence back into
//! text. Both are modelled as small traits so that a deterministic test
//! double can stand in for a real vocabulary.
//!
//! Tokenizers are resolved from a model identifier by a [`TokenizerLoader`]
//! and memoized by [`TokenizerCache`].

pub mod cache;
mod hf;

pub use cache::{CacheConfig, TokenizerCache};
pub use hf::HfTokenizer;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TokenLensError};

/// Name of the serialized tokenizer inside a model repository or directory.
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Output of a native encode call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoding {
    /// Token ids, special tokens included.
    pub ids: Vec<u32>,
    /// Per-id `(start, end)` character offsets into the input, when the
    /// tokenizer can supply them.
    pub offsets: Option<Vec<(usize, usize)>>,
}

/// Turns an id sequence into text.
pub trait DecodeCapability: Send + Sync {
    /// Decode `ids` without skipping special tokens.
    fn decode(&self, ids: &[u32]) -> Result<String>;
}

/// Turns text into ids with offsets.
pub trait EncodeCapability: Send + Sync {
    /// Encode `text`, adding the model's special tokens.
    fn encode(&self, text: &str) -> Result<Encoding>;
}

/// A full tokenizer: both directions.
pub trait TokenizerProvider: EncodeCapability + DecodeCapability {}

impl<T: EncodeCapability + DecodeCapability + ?Sized> TokenizerProvider for T {}

/// Where a tokenizer is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenizerSource {
    /// Download from a HuggingFace Hub repository.
    #[serde(rename = "hub")]
    HuggingFace {
        repo_id: String,
        #[serde(default)]
        revision: Option<String>,
    },
    /// Load a `tokenizer.json` from the local filesystem.
    Local { path: PathBuf },
}

impl TokenizerSource {
    /// Guess the source for a bare model identifier.
    ///
    /// An existing file, or a directory containing `tokenizer.json`, is
    /// loaded locally. Anything else is treated as a Hub repository id.
    pub fn infer(model_id: &str) -> Self {
        let path = Path::new(model_id);
        if path.is_file() {
            return TokenizerSource::Local {
                path: path.to_path_buf(),
            };
        }
        let nested = path.join(TOKENIZER_FILE);
        if path.is_dir() && nested.is_file() {
            return TokenizerSource::Local { path: nested };
        }
        TokenizerSource::HuggingFace {
            repo_id: model_id.to_string(),
            revision: None,
        }
    }
}

/// Resolves a model identifier into a ready-to-use tokenizer.
pub trait TokenizerLoader: Send + Sync {
    fn load(&self, model_id: &str) -> Result<Arc<dyn TokenizerProvider>>;
}

/// Loads HuggingFace tokenizers from the Hub or from disk.
///
/// Explicit per-model sources take precedence over [`TokenizerSource::infer`].
#[derive(Debug, Clone, Default)]
pub struct HfLoader {
    cache_dir: Option<PathBuf>,
    revision: Option<String>,
    sources: HashMap<String, TokenizerSource>,
}

impl HfLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory for Hub downloads (defaults to the hf-hub cache).
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Revision used for Hub sources that do not pin their own.
    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    /// Pin `model_id` to a specific source.
    pub fn source(mut self, model_id: impl Into<String>, source: TokenizerSource) -> Self {
        self.sources.insert(model_id.into(), source);
        self
    }

    /// The source `model_id` would be loaded from.
    pub fn resolve_source(&self, model_id: &str) -> TokenizerSource {
        let source = self
            .sources
            .get(model_id)
            .cloned()
            .unwrap_or_else(|| TokenizerSource::infer(model_id));

        match source {
            TokenizerSource::HuggingFace {
                repo_id,
                revision: None,
            } => TokenizerSource::HuggingFace {
                repo_id,
                revision: self.revision.clone(),
            },
            other => other,
        }
    }
}

impl TokenizerLoader for HfLoader {
    fn load(&self, model_id: &str) -> Result<Arc<dyn TokenizerProvider>> {
        let source = self.resolve_source(model_id);
        debug!(model_id, ?source, "resolved tokenizer source");

        let tokenizer = match &source {
            TokenizerSource::HuggingFace { repo_id, revision } => {
                HfTokenizer::from_hub(repo_id, revision.as_deref(), self.cache_dir.as_deref())
            }
            TokenizerSource::Local { path } => HfTokenizer::from_file(path),
        }
        .map_err(|e| match e {
            TokenLensError::ModelLoad { message, .. } => {
                TokenLensError::model_load(model_id, message)
            }
            other => TokenLensError::model_load(model_id, other),
        })?;

        Ok(Arc::new(tokenizer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_treats_unknown_id_as_hub_repo() {
        let source = TokenizerSource::infer("gpt2");
        assert_eq!(
            source,
            TokenizerSource::HuggingFace {
                repo_id: "gpt2".to_string(),
                revision: None
            }
        );
    }

    #[test]
    fn loader_applies_default_revision_to_unpinned_hub_sources() {
        let loader = HfLoader::new()
            .revision("main")
            .source(
                "pinned",
                TokenizerSource::HuggingFace {
                    repo_id: "org/pinned".to_string(),
                    revision: Some("v2".to_string()),
                },
            );

        assert_eq!(
            loader.resolve_source("org/model"),
            TokenizerSource::HuggingFace {
                repo_id: "org/model".to_string(),
                revision: Some("main".to_string())
            }
        );
        assert_eq!(
            loader.resolve_source("pinned"),
            TokenizerSource::HuggingFace {
                repo_id: "org/pinned".to_string(),
                revision: Some("v2".to_string())
            }
        );
    }
}
