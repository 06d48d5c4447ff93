//! Case and diacritic folding.
//!
//! Folding projects a single codepoint onto zero or more codepoints: the
//! lowercase form, compatibility-decomposed, with combining marks dropped.
//! `'É'` folds to `"e"`, fullwidth `'Ａ'` to `"a"`, `'ß'` to `"ss"`, and a
//! standalone combining acute accent folds to nothing.
//!
//! The projection is computed one codepoint at a time so searchers can fold
//! field content while scanning it, without keeping a folded copy.

use unicode_normalization::char::{decompose_compatible, is_combining_mark};

/// Append the folded form of `c` to `out`.
pub fn fold_into(c: char, out: &mut Vec<char>) {
    if c.is_ascii() {
        out.push(c.to_ascii_lowercase());
        return;
    }
    for lower in c.to_lowercase() {
        if lower == 'ß' {
            out.extend(['s', 's']);
            continue;
        }
        decompose_compatible(lower, |d| {
            if is_combining_mark(d) {
                return;
            }
            if d.is_ascii() {
                out.push(d.to_ascii_lowercase());
            } else {
                out.extend(d.to_lowercase());
            }
        });
    }
}

/// Fold a sequence of codepoints.
pub fn fold_chars<I>(chars: I) -> Vec<char>
where
    I: IntoIterator<Item = char>,
{
    let mut out = Vec::new();
    for c in chars {
        fold_into(c, &mut out);
    }
    out
}

/// Fold a string.
pub fn fold_str(text: &str) -> String {
    fold_chars(text.chars()).into_iter().collect()
}

/// Whether `c` folds to nothing (a combining mark on its own).
pub fn folds_to_empty(c: char) -> bool {
    !c.is_ascii() && is_combining_mark(c)
}
