//! Token types for tokenization and decode results.

use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` range of character offsets into a text.
///
/// Offsets count Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start character offset (inclusive).
    pub start: usize,
    /// End character offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(end >= start, "span end {end} precedes start {start}");
        Self { start, end }
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

/// A single token from an encode or decode operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Token ID: a vocabulary index, or the ignore sentinel.
    pub id: i64,
    /// Display text for this token, rendered in isolation.
    pub text: String,
    /// Location in the original or reconstructed text, when known.
    pub span: Option<Span>,
}

impl Token {
    /// Create a new token.
    pub fn new(id: i64, text: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            id,
            text: text.into(),
            span,
        }
    }

    /// Create a token whose location is unknown.
    pub fn unspanned(id: i64, text: impl Into<String>) -> Self {
        Self::new(id, text, None)
    }

    pub fn start(&self) -> Option<usize> {
        self.span.map(|s| s.start)
    }

    pub fn end(&self) -> Option<usize> {
        self.span.map(|s| s.end)
    }
}
