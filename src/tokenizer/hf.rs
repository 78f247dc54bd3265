//! HuggingFace tokenizers implementation.

use std::path::Path;

use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};

use super::{DecodeCapability, EncodeCapability, Encoding, TOKENIZER_FILE};
use crate::error::{Result, TokenLensError};

/// HuggingFace tokenizers implementation.
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
}

impl HfTokenizer {
    /// Load tokenizer from HuggingFace Hub.
    ///
    /// Downloads `tokenizer.json` if not cached locally.
    pub fn from_hub(
        repo_id: &str,
        revision: Option<&str>,
        cache_dir: Option<&Path>,
    ) -> Result<Self> {
        let mut builder = ApiBuilder::new().with_progress(false);
        if let Some(dir) = cache_dir {
            builder = builder.with_cache_dir(dir.to_path_buf());
        }
        let api = builder.build().map_err(|e| {
            TokenLensError::model_load(repo_id, format!("Failed to initialize HF API: {e}"))
        })?;

        let repo = match revision {
            Some(rev) => api.repo(Repo::with_revision(
                repo_id.to_string(),
                RepoType::Model,
                rev.to_string(),
            )),
            None => api.model(repo_id.to_string()),
        };

        let tokenizer_path = repo.get(TOKENIZER_FILE).map_err(|e| {
            TokenLensError::model_load(
                repo_id,
                format!("Failed to download tokenizer from {repo_id}: {e}"),
            )
        })?;

        Self::from_file(&tokenizer_path)
    }

    /// Load tokenizer from local file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            TokenLensError::model_load(
                path.display().to_string(),
                format!("Failed to load tokenizer from {path:?}: {e}"),
            )
        })?;

        Ok(Self { inner })
    }

    /// Load tokenizer from its serialized JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        let inner: tokenizers::Tokenizer = json.parse().map_err(|e| {
            TokenLensError::model_load("<inline>", format!("Failed to parse tokenizer: {e}"))
        })?;

        Ok(Self { inner })
    }
}

impl EncodeCapability for HfTokenizer {
    fn encode(&self, text: &str) -> Result<Encoding> {
        let encoding = self
            .inner
            .encode_char_offsets(text, true)
            .map_err(|e| TokenLensError::Encode(e.to_string()))?;

        Ok(Encoding {
            ids: encoding.get_ids().to_vec(),
            offsets: Some(encoding.get_offsets().to_vec()),
        })
    }
}

impl DecodeCapability for HfTokenizer {
    fn decode(&self, ids: &[u32]) -> Result<String> {
        self.inner
            .decode(ids, false)
            .map_err(|e| TokenLensError::Decode(e.to_string()))
    }
}
