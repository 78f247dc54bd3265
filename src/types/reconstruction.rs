//! Result of rebuilding text from a raw id sequence.

use serde::{Deserialize, Serialize};

use super::{Span, Token};

/// Reconstructed display text plus one [`Token`] per input id.
///
/// Every token carries a span into `text`. Tokens from the same sentinel
/// run share one span.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reconstruction {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl Reconstruction {
    /// The slice of `text` covered by `span`, in character offsets.
    ///
    /// Out-of-range offsets are clamped to the end of the text.
    pub fn slice(&self, span: &Span) -> &str {
        char_slice(&self.text, span.start, span.end)
    }

    /// Concatenate every token's slice in order, emitting a shared span only once.
    ///
    /// For a well-formed reconstruction this equals `text`.
    pub fn covered_text(&self) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut previous: Option<Span> = None;
        for span in self.tokens.iter().filter_map(|t| t.span) {
            if previous != Some(span) {
                out.push_str(self.slice(&span));
            }
            previous = Some(span);
        }
        out
    }
}

fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let byte_at = |chars: usize| {
        text.char_indices()
            .nth(chars)
            .map_or(text.len(), |(i, _)| i)
    };
    let (from, to) = (byte_at(start), byte_at(end));
    &text[from..to.max(from)]
}
