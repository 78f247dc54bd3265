//! JSON request and response bodies for the HTTP API.
//!
//! Field names match the original web service so existing browser clients
//! keep working. Absent offsets serialize as `null`, not as missing fields.

use serde::{Deserialize, Serialize};

use crate::types::{Reconstruction, Token};

/// Body of `POST /api/tokenize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizeRequest {
    pub text: String,
    /// HuggingFace model id or local tokenizer path.
    pub model_id: String,
}

/// Body of `POST /api/decode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeRequest {
    pub ids: Vec<i64>,
    /// HuggingFace model id or local tokenizer path.
    pub model_id: String,
}

/// One token on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenInfo {
    pub id: i64,
    pub text: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl From<Token> for TokenInfo {
    fn from(token: Token) -> Self {
        Self {
            id: token.id,
            start: token.start(),
            end: token.end(),
            text: token.text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizeResponse {
    pub tokens: Vec<TokenInfo>,
}

impl From<Vec<Token>> for TokenizeResponse {
    fn from(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().map(TokenInfo::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeResponse {
    pub text: String,
    pub tokens: Vec<TokenInfo>,
}

impl From<Reconstruction> for DecodeResponse {
    fn from(r: Reconstruction) -> Self {
        Self {
            text: r.text,
            tokens: r.tokens.into_iter().map(TokenInfo::from).collect(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
