//! Span reconstruction for raw id sequences.
//!
//! Given only token ids (no offsets), [`Reconstructor`] rebuilds a single
//! display text and a character span for every id. Subword detokenization is
//! context dependent: a token's rendering can change with its neighbours
//! (leading-space markers, byte-level merges), so the text a token
//! contributes is found by decoding the running context before and after
//! appending it and keeping the new suffix.
//!
//! Ids equal to the ignore sentinel (conventionally `-100`, the label
//! masking value used in training data) are not vocabulary entries. They are
//! never passed to the tokenizer. Each maximal run of sentinels is rendered
//! as one synthetic label, e.g. `(padding x 3)`, and every position in the
//! run shares that label's span.
//!
//! # Append-only assumption
//!
//! Suffix diffing assumes that appending a token never rewrites text already
//! rendered for earlier tokens. Standard left-to-right detokenizers satisfy
//! this. Detokenizers with lookback normalization may not; when the previous
//! rendering is not a prefix of the new one, the new token receives whatever
//! lies beyond the previous rendering's length and a debug event is logged.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TokenLensError};
use crate::tokenizer::DecodeCapability;
use crate::types::{Reconstruction, Span, Token};

/// Conventional "ignore this position" label id.
pub const IGNORE_INDEX: i64 = -100;

/// How ignore-sentinel positions are recognised and labelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddingConvention {
    /// Id value treated as the sentinel. Default: [`IGNORE_INDEX`].
    #[serde(default = "default_sentinel")]
    pub sentinel: i64,
    /// Word used in labels. Default: `"padding"`.
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_sentinel() -> i64 {
    IGNORE_INDEX
}

fn default_name() -> String {
    "padding".to_string()
}

impl Default for PaddingConvention {
    fn default() -> Self {
        Self {
            sentinel: default_sentinel(),
            name: default_name(),
        }
    }
}

impl PaddingConvention {
    pub fn new(sentinel: i64, name: impl Into<String>) -> Self {
        Self {
            sentinel,
            name: name.into(),
        }
    }

    /// Label attached to each individual sentinel token, e.g. `(padding)`.
    pub fn token_label(&self) -> String {
        format!("({})", self.name)
    }

    /// Text inserted into the reconstruction for a run of `count` sentinels,
    /// e.g. `(padding x 3)`.
    pub fn run_label(&self, count: usize) -> String {
        format!("({} x {count})", self.name)
    }
}

/// Rebuilds text and per-token spans from raw ids.
#[derive(Debug, Clone, Default)]
pub struct Reconstructor {
    convention: PaddingConvention,
}

impl Reconstructor {
    pub fn new(convention: PaddingConvention) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> &PaddingConvention {
        &self.convention
    }

    /// Reconstruct the display text and one [`Token`] per id.
    ///
    /// Issues two context decodes plus one isolated decode per real id and
    /// none for sentinel runs. Fails with [`TokenLensError::InvalidInput`]
    /// before decoding anything if a non-sentinel id is not a valid
    /// vocabulary index, and with the tokenizer's error if a decode fails.
    pub fn reconstruct<D>(&self, ids: &[i64], tokenizer: &D) -> Result<Reconstruction>
    where
        D: DecodeCapability + ?Sized,
    {
        let slots = ids
            .iter()
            .map(|&id| self.vocab_index(id))
            .collect::<Result<Vec<_>>>()?;

        let mut out = TextBuilder::default();
        let mut tokens = Vec::with_capacity(ids.len());
        // Real ids only: sentinels would corrupt detokenization.
        let mut context: Vec<u32> = Vec::new();

        let mut pos = 0;
        while pos < slots.len() {
            match slots[pos] {
                None => {
                    let run = slots[pos..].iter().take_while(|s| s.is_none()).count();
                    let span = out.push(&self.convention.run_label(run));
                    let label = self.convention.token_label();
                    tokens.extend((0..run).map(|_| {
                        Token::new(self.convention.sentinel, label.clone(), Some(span))
                    }));
                    pos += run;
                }
                Some(id) => {
                    let prev_text = tokenizer.decode(&context)?;
                    context.push(id);
                    let curr_text = tokenizer.decode(&context)?;
                    if !curr_text.starts_with(&prev_text) {
                        debug!(
                            position = pos,
                            id, "detokenizer rewrote earlier text; span inferred by length"
                        );
                    }

                    let span = out.push(suffix_after(&curr_text, &prev_text));
                    let label = tokenizer.decode(&[id])?;
                    tokens.push(Token::new(i64::from(id), label, Some(span)));
                    pos += 1;
                }
            }
        }

        Ok(Reconstruction {
            text: out.text,
            tokens,
        })
    }

    /// `None` for the sentinel, the vocabulary index otherwise.
    fn vocab_index(&self, id: i64) -> Result<Option<u32>> {
        if id == self.convention.sentinel {
            return Ok(None);
        }
        u32::try_from(id).map(Some).map_err(|_| {
            TokenLensError::InvalidInput(format!("token id {id} is not a valid vocabulary index"))
        })
    }
}

/// Reconstruct with the default `-100` padding convention.
pub fn reconstruct<D>(ids: &[i64], tokenizer: &D) -> Result<Reconstruction>
where
    D: DecodeCapability + ?Sized,
{
    Reconstructor::default().reconstruct(ids, tokenizer)
}

/// Output buffer that tracks its length in characters.
#[derive(Default)]
struct TextBuilder {
    text: String,
    chars: usize,
}

impl TextBuilder {
    fn push(&mut self, piece: &str) -> Span {
        let start = self.chars;
        self.text.push_str(piece);
        self.chars += piece.chars().count();
        Span::new(start, self.chars)
    }
}

/// Characters of `curr` beyond the character length of `prev`.
fn suffix_after<'a>(curr: &'a str, prev: &str) -> &'a str {
    let skip = prev.chars().count();
    curr.char_indices()
        .nth(skip)
        .map_or("", |(byte, _)| &curr[byte..])
}
