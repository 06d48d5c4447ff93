//! Scanning routines shared by the searcher variants.
//!
//! The exact and normalized searchers run the same algorithm and differ only
//! in the [`Projection`] applied to each decoded codepoint before comparison.
//! A projection maps one field codepoint onto zero or more comparison units;
//! a term is compared against the concatenated units. A position decoded from
//! malformed input has no units that can equal anything, so no match may
//! cover it.

use crate::analysis::decoder::DecodedChar;
use crate::analysis::fold::fold_into;
use crate::analysis::tokenizer::TokenSpan;
use crate::field::FieldValue;
use crate::query::QueryTerm;
use crate::search::record::MatchRecord;
use crate::search::recorder::MatchRecorder;
use crate::search::searcher::ExactScope;

/// Mapping from field codepoints to comparison units.
pub(crate) trait Projection {
    /// Append the units of `c` to `out`.
    fn project(&self, c: char, out: &mut Vec<char>);

    /// The units a term is compared as.
    fn units<'t>(&self, term: &'t QueryTerm) -> &'t [char];

    /// Whether every codepoint projects to exactly one unit.
    fn is_one_to_one(&self) -> bool;
}

/// Compares codepoints as they are.
pub(crate) struct Identity;

impl Projection for Identity {
    fn project(&self, c: char, out: &mut Vec<char>) {
        out.push(c);
    }

    fn units<'t>(&self, term: &'t QueryTerm) -> &'t [char] {
        term.text()
    }

    fn is_one_to_one(&self) -> bool {
        true
    }
}

/// Compares case and diacritic folded codepoints.
pub(crate) struct Folded;

impl Projection for Folded {
    fn project(&self, c: char, out: &mut Vec<char>) {
        fold_into(c, out);
    }

    fn units<'t>(&self, term: &'t QueryTerm) -> &'t [char] {
        term.folded()
    }

    fn is_one_to_one(&self) -> bool {
        false
    }
}

/// Whether the units of `ch` equal `units[matched..]` up to their length.
///
/// On success returns the new matched length. `scratch` holds the units of
/// `ch` afterwards.
fn units_equal<P: Projection>(
    projection: &P,
    ch: &DecodedChar,
    units: &[char],
    matched: usize,
    scratch: &mut Vec<char>,
) -> Option<usize> {
    if ch.malformed {
        return None;
    }
    scratch.clear();
    projection.project(ch.codepoint, scratch);
    let next = matched + scratch.len();
    if next > units.len() || units[matched..next] != scratch[..] {
        return None;
    }
    Some(next)
}

/// Lazily computed codepoint length of a value, checked against each term's
/// minimum field size.
pub(crate) struct SizeGuard<'a> {
    value: FieldValue<'a>,
    codepoints: Option<usize>,
}

impl<'a> SizeGuard<'a> {
    pub(crate) fn new(value: FieldValue<'a>) -> Self {
        SizeGuard {
            value,
            codepoints: None,
        }
    }

    /// Whether `term` should be searched in this value.
    pub(crate) fn admits(&mut self, term: &QueryTerm) -> bool {
        if term.min_field_size() == 0 {
            return true;
        }
        let value = self.value;
        let size = *self
            .codepoints
            .get_or_insert_with(|| value.codepoint_count());
        if term.skips(size) {
            log::trace!(
                "Skipping term {} for value {}: {} < {} codepoints",
                term.id(),
                value.index(),
                size,
                term.min_field_size()
            );
            return false;
        }
        true
    }
}

/// Terms that take part in scanning `value`, in their given order.
fn admitted<'t, P: Projection>(
    projection: &P,
    value: FieldValue<'_>,
    terms: &[&'t QueryTerm],
) -> Vec<&'t QueryTerm> {
    let mut guard = SizeGuard::new(value);
    terms
        .iter()
        .copied()
        .filter(|term| !projection.units(term).is_empty() && guard.admits(term))
        .collect()
}

/// Try to match `units` starting at byte offset `start`.
///
/// Returns the number of field codepoints consumed and the end offset. A
/// match must start and end on codepoint boundaries of the field; codepoints
/// projecting to nothing right after the match are absorbed into it.
fn match_at<P: Projection>(
    projection: &P,
    value: FieldValue<'_>,
    start: usize,
    units: &[char],
    scratch: &mut Vec<char>,
) -> Option<(usize, usize)> {
    let mut decoder = value.decoder_at(start);
    let mut matched = 0;
    let mut codepoints = 0;
    let mut end = start;

    while matched < units.len() {
        let ch = decoder.next()?;
        let next = units_equal(projection, &ch, units, matched, scratch)?;
        if codepoints == 0 && scratch.is_empty() {
            return None;
        }
        matched = next;
        codepoints += 1;
        end = ch.end();
    }

    if !projection.is_one_to_one() {
        for ch in decoder {
            if ch.malformed {
                break;
            }
            scratch.clear();
            projection.project(ch.codepoint, scratch);
            if !scratch.is_empty() {
                break;
            }
            codepoints += 1;
            end = ch.end();
        }
    }

    Some((codepoints, end))
}

/// Match `terms` against `value` under `scope`, writing records into
/// `recorder`. Returns the number of records written.
pub(crate) fn scan_value<P: Projection>(
    projection: &P,
    scope: ExactScope,
    value: FieldValue<'_>,
    terms: &[&QueryTerm],
    recorder: &mut MatchRecorder,
) -> usize {
    if value.is_empty() || terms.is_empty() {
        return 0;
    }
    let active = admitted(projection, value, terms);
    if active.is_empty() {
        return 0;
    }

    let mut scratch = Vec::new();
    let mut written = 0;

    match scope {
        ExactScope::WholeValue | ExactScope::Prefix => {
            for term in active {
                let units = projection.units(term);
                let Some((codepoints, end)) = match_at(projection, value, 0, units, &mut scratch)
                else {
                    continue;
                };
                let covers = scope == ExactScope::Prefix
                    || term.is_prefix()
                    || end == value.byte_len();
                if covers
                    && recorder.record(MatchRecord::new(
                        term.id(),
                        value.index(),
                        0,
                        codepoints,
                        end,
                    ))
                {
                    written += 1;
                }
            }
        }
        ExactScope::Substring => {
            // Matches of one term never overlap: the next attempt for a term
            // starts at or after the end of its previous match.
            let mut resume_at = vec![0usize; active.len()];
            for ch in value.decoder() {
                for (slot, term) in active.iter().enumerate() {
                    if ch.offset < resume_at[slot] {
                        continue;
                    }
                    let units = projection.units(term);
                    if let Some((codepoints, end)) =
                        match_at(projection, value, ch.offset, units, &mut scratch)
                    {
                        resume_at[slot] = end;
                        if recorder.record(MatchRecord::new(
                            term.id(),
                            value.index(),
                            ch.offset,
                            codepoints,
                            end - ch.offset,
                        )) {
                            written += 1;
                        }
                    }
                }
            }
        }
    }

    written
}

/// Whether the token at `span` equals `units` under `projection`, or starts
/// with them on a codepoint boundary when `prefix` is set.
fn token_equals<P: Projection>(
    projection: &P,
    value: FieldValue<'_>,
    span: &TokenSpan,
    units: &[char],
    prefix: bool,
    scratch: &mut Vec<char>,
) -> bool {
    if projection.is_one_to_one() {
        let fits = if prefix {
            span.codepoints >= units.len()
        } else {
            span.codepoints == units.len()
        };
        if !fits {
            return false;
        }
    }
    let mut matched = 0;
    for ch in span.decode(value.bytes(), value.encoding()) {
        if prefix && matched == units.len() {
            return true;
        }
        match units_equal(projection, &ch, units, matched, scratch) {
            Some(next) => matched = next,
            None => return false,
        }
    }
    matched == units.len()
}

/// Match `terms` against the word tokens of `value`. Returns the number of
/// records written.
pub(crate) fn scan_tokens<P: Projection>(
    projection: &P,
    value: FieldValue<'_>,
    terms: &[&QueryTerm],
    recorder: &mut MatchRecorder,
) -> usize {
    if value.is_empty() || terms.is_empty() {
        return 0;
    }
    let active = admitted(projection, value, terms);
    if active.is_empty() {
        return 0;
    }

    let mut scratch = Vec::new();
    let mut written = 0;

    for span in value.tokens() {
        for term in &active {
            let units = projection.units(term);
            if token_equals(projection, value, &span, units, term.is_prefix(), &mut scratch)
                && recorder.record(MatchRecord::new(
                    term.id(),
                    value.index(),
                    span.byte_offset,
                    span.codepoints,
                    span.byte_length,
                ))
            {
                written += 1;
            }
        }
    }

    written
}
