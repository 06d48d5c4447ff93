//! Text analysis primitives used by the searchers.
//!
//! - [`decoder`] - lazy codepoint decoding with malformed-input recovery
//! - [`fold`] - case and diacritic folding, one codepoint at a time
//! - [`tokenizer`] - word segmentation at non-alphanumeric boundaries

pub mod decoder;
pub mod fold;
pub mod tokenizer;

pub use decoder::{CodepointDecoder, DecodedChar, Encoding, REPLACEMENT_CHARACTER};
pub use tokenizer::{TokenSpan, Tokens};
