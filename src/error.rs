//! Tokenlens error types

/// Tokenlens error types
#[derive(Debug, thiserror::Error)]
pub enum TokenLensError {
    // Tokenizer resolution errors
    /// The model identifier could not be resolved or its tokenizer failed to load.
    #[error("Failed to load model {model}: {message}")]
    ModelLoad { model: String, message: String },

    // Tokenizer call errors
    /// The underlying detokenizer rejected a decode call. Carries its message as-is.
    #[error("{0}")]
    Decode(String),

    /// The underlying tokenizer rejected an encode call. Carries its message as-is.
    #[error("{0}")]
    Encode(String),

    // Request errors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl TokenLensError {
    /// Whether the caller can fix this error by changing the request.
    ///
    /// The HTTP layer maps client errors to 400 and everything else to 500.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TokenLensError::ModelLoad { .. } | TokenLensError::InvalidInput(_)
        )
    }

    /// Build a [`TokenLensError::ModelLoad`] for `model` from any upstream error.
    pub fn model_load(model: impl Into<String>, upstream: impl std::fmt::Display) -> Self {
        TokenLensError::ModelLoad {
            model: model.into(),
            message: upstream.to_string(),
        }
    }
}

/// Result type alias for Tokenlens operations
pub type Result<T> = std::result::Result<T, TokenLensError>;
