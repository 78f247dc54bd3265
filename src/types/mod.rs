//! Public types for the Tokenlens API.

mod reconstruction;
mod token;

pub use reconstruction::Reconstruction;
pub use token::{Span, Token};
