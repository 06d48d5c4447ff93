//! Lazy codepoint decoding over raw field buffers.
//!
//! [`CodepointDecoder`] walks a byte buffer and yields one [`DecodedChar`] per
//! codepoint, carrying the byte offset and encoded length of each one. Field
//! content is never validated up front: an invalid UTF-8 sequence decodes to
//! [`REPLACEMENT_CHARACTER`] and the decoder moves past the maximal invalid
//! subpart, so a single corrupt byte never stops a scan. Such positions are
//! flagged as malformed; searchers never match them against any term
//! codepoint, while a genuine U+FFFD in the buffer compares normally.
//!
//! # Examples
//!
//! ```
//! use fieldmatch::analysis::decoder::{CodepointDecoder, Encoding, REPLACEMENT_CHARACTER};
//!
//! let chars: Vec<_> = CodepointDecoder::new(b"a\xC3\xA9\xFFz", Encoding::Utf8).collect();
//! assert_eq!(chars.len(), 4);
//! assert_eq!(chars[1].codepoint, 'é');
//! assert_eq!(chars[1].len, 2);
//! assert_eq!(chars[2].codepoint, REPLACEMENT_CHARACTER);
//! assert!(chars[2].malformed);
//! assert_eq!(chars[3].offset, 4);
//! ```

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

/// Codepoint substituted for every malformed byte sequence.
pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// Encoding declared for a field buffer by the extraction layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// UTF-8 with lossy recovery of malformed sequences.
    #[default]
    Utf8,
    /// One byte per codepoint, no validation.
    Ascii,
}

/// A single decoded codepoint and its location in the source buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedChar {
    /// The decoded codepoint (or [`REPLACEMENT_CHARACTER`]).
    pub codepoint: char,
    /// Byte offset of the first byte of this codepoint.
    pub offset: usize,
    /// Number of bytes consumed for this codepoint.
    pub len: usize,
    /// Set when the codepoint was substituted for malformed input.
    pub malformed: bool,
}

impl DecodedChar {
    /// Byte offset just past this codepoint.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Whether the codepoint is U+FFFD, substituted or genuine.
    pub fn is_replacement(&self) -> bool {
        self.codepoint == REPLACEMENT_CHARACTER
    }

    fn substituted(offset: usize, len: usize) -> Self {
        DecodedChar {
            codepoint: REPLACEMENT_CHARACTER,
            offset,
            len,
            malformed: true,
        }
    }
}

/// Restartable iterator of codepoints over a byte buffer.
///
/// The decoder only ever holds a cursor into the borrowed buffer; cloning it
/// is free and yields an independent scan from the same position.
#[derive(Clone, Debug)]
pub struct CodepointDecoder<'a> {
    bytes: &'a [u8],
    encoding: Encoding,
    pos: usize,
}

impl<'a> CodepointDecoder<'a> {
    /// Create a decoder positioned at the start of `bytes`.
    pub fn new(bytes: &'a [u8], encoding: Encoding) -> Self {
        CodepointDecoder {
            bytes,
            encoding,
            pos: 0,
        }
    }

    /// Create a decoder positioned at `offset`.
    ///
    /// `offset` should be a codepoint boundary obtained from an earlier scan;
    /// offsets past the end are clamped.
    pub fn at(bytes: &'a [u8], encoding: Encoding, offset: usize) -> Self {
        CodepointDecoder {
            bytes,
            encoding,
            pos: offset.min(bytes.len()),
        }
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes not yet decoded.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Restart decoding from the beginning of the buffer.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Move the cursor to `offset` (clamped to the buffer length).
    pub fn seek(&mut self, offset: usize) {
        self.pos = offset.min(self.bytes.len());
    }

    /// The encoding this decoder was created with.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl Iterator for CodepointDecoder<'_> {
    type Item = DecodedChar;

    fn next(&mut self) -> Option<DecodedChar> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        let decoded = match self.encoding {
            Encoding::Ascii => {
                let b = self.bytes[self.pos];
                if b.is_ascii() {
                    DecodedChar {
                        codepoint: b as char,
                        offset: self.pos,
                        len: 1,
                        malformed: false,
                    }
                } else {
                    DecodedChar::substituted(self.pos, 1)
                }
            }
            Encoding::Utf8 => decode_utf8_at(self.bytes, self.pos),
        };
        self.pos += decoded.len;
        Some(decoded)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        match self.encoding {
            Encoding::Ascii => (remaining, Some(remaining)),
            Encoding::Utf8 => (remaining.div_ceil(4), Some(remaining)),
        }
    }
}

impl FusedIterator for CodepointDecoder<'_> {}

/// Decode one UTF-8 codepoint starting at `pos`.
///
/// Malformed input yields a [`REPLACEMENT_CHARACTER`] flagged as malformed
/// for each maximal subpart of an invalid sequence, matching
/// `String::from_utf8_lossy`. `pos` must be within `bytes`.
pub fn decode_utf8_at(bytes: &[u8], pos: usize) -> DecodedChar {
    let lead = bytes[pos];
    if lead < 0x80 {
        return DecodedChar {
            codepoint: lead as char,
            offset: pos,
            len: 1,
            malformed: false,
        };
    }

    // Width and the allowed range of the first continuation byte, which
    // excludes overlong forms, surrogates and values above U+10FFFF.
    let (width, lo, hi) = match lead {
        0xC2..=0xDF => (2, 0x80, 0xBF),
        0xE0 => (3, 0xA0, 0xBF),
        0xE1..=0xEC | 0xEE..=0xEF => (3, 0x80, 0xBF),
        0xED => (3, 0x80, 0x9F),
        0xF0 => (4, 0x90, 0xBF),
        0xF1..=0xF3 => (4, 0x80, 0xBF),
        0xF4 => (4, 0x80, 0x8F),
        _ => return DecodedChar::substituted(pos, 1),
    };

    let mut cp = u32::from(lead & (0x7F >> width));
    for i in 1..width {
        let Some(&b) = bytes.get(pos + i) else {
            return DecodedChar::substituted(pos, i);
        };
        let (min, max) = if i == 1 { (lo, hi) } else { (0x80, 0xBF) };
        if b < min || b > max {
            return DecodedChar::substituted(pos, i);
        }
        cp = (cp << 6) | u32::from(b & 0x3F);
    }

    match char::from_u32(cp) {
        Some(codepoint) => DecodedChar {
            codepoint,
            offset: pos,
            len: width,
            malformed: false,
        },
        None => DecodedChar::substituted(pos, width),
    }
}

/// Count the codepoints in `bytes` under `encoding`.
pub fn codepoint_count(bytes: &[u8], encoding: Encoding) -> usize {
    match encoding {
        Encoding::Ascii => bytes.len(),
        Encoding::Utf8 => match std::str::from_utf8(bytes) {
            Ok(s) => s.chars().count(),
            Err(_) => CodepointDecoder::new(bytes, encoding).count(),
        },
    }
}

/// Whether `offset` is a boundary between decoded codepoints of `bytes`.
///
/// The start and end of the buffer are always boundaries.
pub fn is_boundary(bytes: &[u8], encoding: Encoding, offset: usize) -> bool {
    if offset == 0 || offset == bytes.len() {
        return true;
    }
    if offset > bytes.len() {
        return false;
    }
    match encoding {
        Encoding::Ascii => true,
        Encoding::Utf8 => CodepointDecoder::new(bytes, encoding)
            .take_while(|c| c.offset <= offset)
            .any(|c| c.offset == offset),
    }
}
