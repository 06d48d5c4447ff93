//! Read-only views over extracted field content.
//!
//! A [`FieldView`] borrows the byte buffers of one field of one document. A
//! single-valued field has one value; an array field has one value per
//! element, in document order. Views are built by the extraction layer for a
//! single matching call and are never retained.

use std::iter::FusedIterator;

use crate::analysis::decoder::{CodepointDecoder, Encoding, codepoint_count};
use crate::analysis::tokenizer::Tokens;

/// One field occurrence: its values and their declared encoding.
///
/// # Examples
///
/// ```
/// use fieldmatch::field::FieldView;
///
/// let view = FieldView::from_strs(["red shoe", "shoe"]);
/// assert!(view.is_multi_valued());
///
/// let indexes: Vec<usize> = view.values().map(|v| v.index()).collect();
/// assert_eq!(indexes, vec![0, 1]);
/// ```
#[derive(Clone, Debug)]
pub struct FieldView<'a> {
    values: Vec<&'a [u8]>,
    encoding: Encoding,
}

impl<'a> FieldView<'a> {
    /// Create a view over `values` in the given encoding.
    pub fn new(values: Vec<&'a [u8]>, encoding: Encoding) -> Self {
        FieldView { values, encoding }
    }

    /// Create a view over a single-valued field.
    pub fn single(value: &'a [u8], encoding: Encoding) -> Self {
        FieldView::new(vec![value], encoding)
    }

    /// Create a UTF-8 view over string values.
    pub fn from_strs<I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        FieldView::new(
            values.into_iter().map(str::as_bytes).collect(),
            Encoding::Utf8,
        )
    }

    /// Declared encoding of every value.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the field has no values at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the field holds more than one value.
    pub fn is_multi_valued(&self) -> bool {
        self.values.len() > 1
    }

    /// The value at `index`.
    pub fn value(&self, index: usize) -> Option<FieldValue<'a>> {
        self.values
            .get(index)
            .map(|&bytes| FieldValue::new(index, bytes, self.encoding))
    }

    /// Cursor over all values in order.
    pub fn values(&self) -> FieldCursor<'_, 'a> {
        FieldCursor {
            view: self,
            next: 0,
        }
    }
}

/// A single value of a field together with its position in the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldValue<'a> {
    index: usize,
    bytes: &'a [u8],
    encoding: Encoding,
}

impl<'a> FieldValue<'a> {
    /// Create a value at `index` of its field.
    pub fn new(index: usize, bytes: &'a [u8], encoding: Encoding) -> Self {
        FieldValue {
            index,
            bytes,
            encoding,
        }
    }

    /// Position of this value within the field.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw bytes of the value.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Declared encoding.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Length of the value in bytes.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the value is an empty buffer.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Length of the value in codepoints.
    pub fn codepoint_count(&self) -> usize {
        codepoint_count(self.bytes, self.encoding)
    }

    /// Decoder from the start of the value.
    pub fn decoder(&self) -> CodepointDecoder<'a> {
        CodepointDecoder::new(self.bytes, self.encoding)
    }

    /// Decoder positioned at `offset`, which must be a codepoint boundary.
    pub fn decoder_at(&self, offset: usize) -> CodepointDecoder<'a> {
        CodepointDecoder::at(self.bytes, self.encoding, offset)
    }

    /// Word tokens of the value.
    pub fn tokens(&self) -> Tokens<'a> {
        Tokens::new(self.bytes, self.encoding)
    }
}

/// Cursor over the values of a [`FieldView`].
#[derive(Clone, Debug)]
pub struct FieldCursor<'v, 'a> {
    view: &'v FieldView<'a>,
    next: usize,
}

impl FieldCursor<'_, '_> {
    /// Index of the value the next call to `next` returns.
    pub fn position(&self) -> usize {
        self.next
    }
}

impl<'a> Iterator for FieldCursor<'_, 'a> {
    type Item = FieldValue<'a>;

    fn next(&mut self) -> Option<FieldValue<'a>> {
        let value = self.view.value(self.next)?;
        self.next += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FieldCursor<'_, '_> {}

impl FusedIterator for FieldCursor<'_, '_> {}
