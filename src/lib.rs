//! Tokenlens - token-level introspection for subword tokenizers
//!
//! Two operations sit on top of a tokenizer resolved by model identifier:
//!
//! - [`annotate`] encodes text and reports every token with its character
//!   span and isolated rendering.
//! - [`reconstruct`] takes a raw id sequence, possibly containing the `-100`
//!   ignore sentinel, and rebuilds the display text plus a span per id.
//!
//! # Decode Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokenlens::{CacheConfig, HfLoader, Reconstructor, TokenizerCache};
//!
//! fn main() -> tokenlens::Result<()> {
//!     let cache = TokenizerCache::new(Arc::new(HfLoader::new()), &CacheConfig::default());
//!     let tokenizer = cache.resolve("gpt2")?;
//!
//!     let out = Reconstructor::default().reconstruct(&[15496, 995, -100, -100], tokenizer.as_ref())?;
//!     println!("{}", out.text); // "Hello world(padding x 2)"
//!     for token in &out.tokens {
//!         println!("{} {:?} {:?}", token.id, token.text, token.span);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The `server` feature (on by default) adds the HTTP transport and the
//! `tokenlensd` daemon.

pub mod annotate;
pub mod error;
pub mod reconstruct;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod tokenizer;
pub mod types;
mod version;

// Re-export main types at crate root
pub use annotate::annotate;
pub use error::{Result, TokenLensError};
pub use reconstruct::{IGNORE_INDEX, PaddingConvention, Reconstructor, reconstruct};
pub use tokenizer::{
    CacheConfig, DecodeCapability, EncodeCapability, Encoding, HfLoader, HfTokenizer,
    TokenizerCache, TokenizerLoader, TokenizerProvider, TokenizerSource,
};
pub use types::{Reconstruction, Span, Token};
pub use version::{GIT_BRANCH, GIT_SHA, PKG_VERSION, git_dirty, version_string};
