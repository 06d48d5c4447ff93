//! Word segmentation over decoded field content.
//!
//! Tokens are maximal runs of alphanumeric codepoints. Any other codepoint,
//! including the replacement character produced for malformed input, ends the
//! current token. Combining marks that follow a word codepoint stay inside the
//! token so decomposed text ("e" + U+0301) segments the same way as composed
//! text.
//!
//! # Examples
//!
//! ```
//! use fieldmatch::analysis::decoder::Encoding;
//! use fieldmatch::analysis::tokenizer::Tokens;
//!
//! let spans: Vec<_> = Tokens::new(b"red shoe-rack", Encoding::Utf8).collect();
//! assert_eq!(spans.len(), 3);
//! assert_eq!(spans[1].byte_offset, 4);
//! assert_eq!(spans[1].codepoints, 4);
//! ```

use std::iter::FusedIterator;

use crate::analysis::decoder::{CodepointDecoder, Encoding};
use crate::analysis::fold::folds_to_empty;

/// Location of one token within a field value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSpan {
    /// Position of the token in the value's token stream (0-based).
    pub position: usize,
    /// Byte offset of the first codepoint of the token.
    pub byte_offset: usize,
    /// Encoded length of the token in bytes.
    pub byte_length: usize,
    /// Number of codepoints in the token.
    pub codepoints: usize,
}

impl TokenSpan {
    /// Byte offset just past the token.
    pub fn end(&self) -> usize {
        self.byte_offset + self.byte_length
    }

    /// Decode the codepoints of this token from the buffer it came from.
    pub fn decode<'a>(&self, bytes: &'a [u8], encoding: Encoding) -> CodepointDecoder<'a> {
        CodepointDecoder::at(&bytes[..self.end()], encoding, self.byte_offset)
    }
}

/// Whether `c` can start or extend a token.
fn is_word_char(c: char, in_token: bool) -> bool {
    c.is_alphanumeric() || (in_token && folds_to_empty(c))
}

/// Lazy iterator of [`TokenSpan`]s over a byte buffer.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    decoder: CodepointDecoder<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    /// Segment `bytes` decoded under `encoding`.
    pub fn new(bytes: &'a [u8], encoding: Encoding) -> Self {
        Tokens {
            decoder: CodepointDecoder::new(bytes, encoding),
            position: 0,
        }
    }
}

impl Iterator for Tokens<'_> {
    type Item = TokenSpan;

    fn next(&mut self) -> Option<TokenSpan> {
        let mut start: Option<usize> = None;
        let mut end = 0;
        let mut codepoints = 0;

        for ch in self.decoder.by_ref() {
            if is_word_char(ch.codepoint, start.is_some()) {
                start.get_or_insert(ch.offset);
                end = ch.end();
                codepoints += 1;
            } else if start.is_some() {
                break;
            }
        }

        let byte_offset = start?;
        let span = TokenSpan {
            position: self.position,
            byte_offset,
            byte_length: end - byte_offset,
            codepoints,
        };
        self.position += 1;
        Some(span)
    }
}

impl FusedIterator for Tokens<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_texts(text: &str) -> Vec<&str> {
        Tokens::new(text.as_bytes(), Encoding::Utf8)
            .map(|t| &text[t.byte_offset..t.end()])
            .collect()
    }

    #[test]
    fn test_split_on_non_alphanumeric() {
        assert_eq!(token_texts("red shoe rack"), vec!["red", "shoe", "rack"]);
        assert_eq!(token_texts("  e-mail, (x2)!"), vec!["e", "mail", "x2"]);
        assert!(token_texts("... --- ...").is_empty());
        assert!(token_texts("").is_empty());
    }

    #[test]
    fn test_unicode_words() {
        assert_eq!(token_texts("café über"), vec!["café", "über"]);
        assert_eq!(token_texts("Cafe\u{0301} bar"), vec!["Cafe\u{0301}", "bar"]);
    }

    #[test]
    fn test_leading_combining_mark_is_separator() {
        assert_eq!(token_texts("\u{0301}abc"), vec!["abc"]);
    }

    #[test]
    fn test_malformed_bytes_split_tokens() {
        let bytes = b"foo\xFFbar";
        let spans: Vec<TokenSpan> = Tokens::new(bytes, Encoding::Utf8).collect();

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].byte_offset, 0);
        assert_eq!(spans[1].byte_offset, 4);
        assert_eq!(spans[1].position, 1);
    }

    #[test]
    fn test_span_decode() {
        let text = "red shoe";
        let span = Tokens::new(text.as_bytes(), Encoding::Utf8)
            .nth(1)
            .unwrap();
        let chars: String = span
            .decode(text.as_bytes(), Encoding::Utf8)
            .map(|c| c.codepoint)
            .collect();

        assert_eq!(chars, "shoe");
        assert_eq!(span.codepoints, 4);
    }
}
