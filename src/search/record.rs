//! Match evidence produced by searchers.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Evidence that a term matched at one position of one field value.
///
/// Records order by term id, then value index, then byte offset, which is the
/// order the recorder keeps them in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Id of the matching term.
    pub term_id: u32,
    /// Index of the value within the field.
    pub value_index: usize,
    /// Byte offset of the match; always a codepoint boundary.
    pub byte_offset: usize,
    /// Number of field codepoints covered by the match.
    pub codepoint_length: usize,
    /// Number of field bytes covered by the match.
    pub byte_length: usize,
}

impl MatchRecord {
    /// Create a new match record.
    pub fn new(
        term_id: u32,
        value_index: usize,
        byte_offset: usize,
        codepoint_length: usize,
        byte_length: usize,
    ) -> Self {
        MatchRecord {
            term_id,
            value_index,
            byte_offset,
            codepoint_length,
            byte_length,
        }
    }

    /// Byte offset just past the match.
    pub fn end_offset(&self) -> usize {
        self.byte_offset + self.byte_length
    }

    /// Byte range of the match within its value.
    pub fn byte_range(&self) -> Range<usize> {
        self.byte_offset..self.end_offset()
    }
}
