//! Encode text and annotate each token with its isolated rendering.

use crate::error::Result;
use crate::tokenizer::TokenizerProvider;
use crate::types::{Span, Token};

/// Tokenize `text` and describe every resulting id.
///
/// Spans come straight from the tokenizer's character offsets; a position
/// the tokenizer has no offset for gets `None`. Each token's text is the id
/// decoded on its own, the same rendering [`reconstruct`](crate::reconstruct())
/// reports for that id.
pub fn annotate<T>(text: &str, tokenizer: &T) -> Result<Vec<Token>>
where
    T: TokenizerProvider + ?Sized,
{
    let encoding = tokenizer.encode(text)?;
    let offsets = encoding.offsets.as_deref();

    encoding
        .ids
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let label = tokenizer.decode(&[id])?;
            let span = offsets.and_then(|o| o.get(i)).map(|&o| Span::from(o));
            Ok(Token::new(i64::from(id), label, span))
        })
        .collect()
}
