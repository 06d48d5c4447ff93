//! Integration tests for field matching across searchers and the dispatcher.

use fieldmatch::analysis::decoder::{Encoding, is_boundary};
use fieldmatch::config::{FieldMatchConfig, SearcherSettings};
use fieldmatch::dispatch::{BatchEvaluator, CancelFlag, Dispatcher};
use fieldmatch::error::Result;
use fieldmatch::field::FieldView;
use fieldmatch::query::{MatchMode, QueryTerm, QueryTermSet};
use fieldmatch::search::{
    ExactScope, ExactSearcher, FieldSearcher, MatchRecorder, NormalizedSearcher, Searcher,
};

const SAMPLES: &[&str] = &[
    "red shoe",
    "shoe",
    "",
    "running shoes for trail",
    "crème brûlée",
    "naïve café society",
    "日本語のテキスト",
    "a-b-c",
    "ÄÖÜ äöü",
    "🦀 rust 🦀",
    "aaaa",
];

const TERMS: &[&str] = &["shoe", "café", "rust", "テキスト", "aa", "ü", "🦀", "b-c", "x"];

fn substring_searcher() -> ExactSearcher {
    ExactSearcher::new().with_scope(ExactScope::Substring)
}

fn single_term(id: u32, text: &str) -> Result<QueryTermSet> {
    QueryTermSet::new(vec![QueryTerm::new(id, text)?])
}

#[test]
fn test_absent_terms_produce_no_records() -> Result<()> {
    let searcher = substring_searcher();

    for (id, term) in TERMS.iter().enumerate() {
        let terms = single_term(id as u32, term)?;
        for sample in SAMPLES.iter().filter(|s| !s.contains(term)) {
            let mut recorder = MatchRecorder::new();
            searcher.match_field(&FieldView::from_strs([*sample]), &terms, &mut recorder);
            assert!(recorder.is_empty(), "{term:?} in {sample:?}");
        }
    }

    Ok(())
}

#[test]
fn test_present_terms_recorded_on_boundaries() -> Result<()> {
    let searcher = substring_searcher();

    for (id, term) in TERMS.iter().enumerate() {
        let terms = single_term(id as u32, term)?;
        for sample in SAMPLES.iter().filter(|s| s.contains(term)) {
            let mut recorder = MatchRecorder::new();
            searcher.match_field(&FieldView::from_strs([*sample]), &terms, &mut recorder);

            let first = sample.find(term).unwrap();
            let records = recorder.records(id as u32);
            assert!(
                records.iter().any(|r| r.byte_offset == first),
                "{term:?} at {first} in {sample:?}"
            );
            for record in records {
                assert!(is_boundary(sample.as_bytes(), Encoding::Utf8, record.byte_offset));
                assert!(is_boundary(sample.as_bytes(), Encoding::Utf8, record.end_offset()));
                assert_eq!(&sample[record.byte_range()], *term);
                assert_eq!(record.codepoint_length, term.chars().count());
            }
        }
    }

    Ok(())
}

#[test]
fn test_matching_is_idempotent() -> Result<()> {
    let terms = QueryTermSet::new(
        TERMS
            .iter()
            .enumerate()
            .map(|(id, text)| QueryTerm::new(id as u32, text))
            .collect::<Result<Vec<_>>>()?,
    )?;
    let view = FieldView::from_strs(SAMPLES.iter().copied());

    for searcher in [
        Searcher::from(substring_searcher()),
        Searcher::normalized(),
        Searcher::tokenized(),
    ] {
        let dispatcher = Dispatcher::new(searcher);
        let first = dispatcher.evaluate(&view, &terms);
        let second = dispatcher.evaluate(&view, &terms);
        assert_eq!(first, second);
        let first_records: Vec<_> = first.all_records().collect();
        let second_records: Vec<_> = second.all_records().collect();
        assert_eq!(first_records, second_records);
    }

    Ok(())
}

#[test]
fn test_min_field_size_skip_rule() -> Result<()> {
    let terms = QueryTermSet::new(vec![
        QueryTerm::new(1, "shoe")?.with_min_field_size(9),
        QueryTerm::new(2, "shoe")?,
    ])?;
    // "red shoe" has 8 codepoints, "redd shoe" has 9.
    let view = FieldView::from_strs(["red shoe", "redd shoe", "shoe"]);

    for searcher in [
        Searcher::from(substring_searcher()),
        Searcher::from(NormalizedSearcher::new().with_scope(ExactScope::Substring)),
        Searcher::tokenized(),
    ] {
        let recorder = Dispatcher::new(searcher).evaluate(&view, &terms);
        assert_eq!(recorder.matched_value_indexes(1), vec![1]);
        assert_eq!(recorder.matched_value_indexes(2), vec![0, 1, 2]);
    }

    Ok(())
}

#[test]
fn test_truncated_input_keeps_earlier_matches() -> Result<()> {
    let terms = single_term(1, "shoe")?;
    let bytes: &[u8] = b"shoe and shoe\xE2\x82";
    let view = FieldView::single(bytes, Encoding::Utf8);

    let recorder = Dispatcher::new(substring_searcher()).evaluate(&view, &terms);
    let offsets: Vec<usize> = recorder.records(1).iter().map(|r| r.byte_offset).collect();
    assert_eq!(offsets, vec![0, 9]);

    let recorder = Dispatcher::new(Searcher::tokenized()).evaluate(&view, &terms);
    assert_eq!(recorder.count(1), 2);

    Ok(())
}

#[test]
fn test_malformed_bytes_never_match_replacement_terms() -> Result<()> {
    // Term decoded from malformed bytes against different malformed bytes.
    let terms = QueryTermSet::new(vec![QueryTerm::from_bytes(1, b"a\xFF", Encoding::Utf8)?])?;
    let view = FieldView::single(b"a\xFE", Encoding::Utf8);
    for searcher in [Searcher::exact(), Searcher::normalized()] {
        assert_eq!(Dispatcher::new(searcher).evaluate(&view, &terms).count(1), 0);
    }

    // A literal U+FFFD term against an invalid sequence, in UTF-8 and ASCII.
    let terms = single_term(2, "x\u{FFFD}y")?;
    let dispatcher = Dispatcher::new(substring_searcher());
    let utf8 = FieldView::single(b"x\xC0y", Encoding::Utf8);
    let ascii = FieldView::single(b"x\xE9y", Encoding::Ascii);
    assert_eq!(dispatcher.evaluate(&utf8, &terms).count(2), 0);
    assert_eq!(dispatcher.evaluate(&ascii, &terms).count(2), 0);

    // The same term still finds an encoded U+FFFD.
    let genuine = FieldView::from_strs(["x\u{FFFD}y"]);
    assert_eq!(dispatcher.evaluate(&genuine, &terms).count(2), 1);

    Ok(())
}

#[test]
fn test_reused_recorder_keeps_order() -> Result<()> {
    let terms = single_term(1, "a")?;
    let view = FieldView::from_strs(["a", "b a"]);
    let searcher = substring_searcher();
    let mut recorder = MatchRecorder::new();

    assert_eq!(searcher.match_field(&view, &terms, &mut recorder), 2);
    assert_eq!(searcher.match_field(&view, &terms, &mut recorder), 0);
    // An earlier value scanned after a later one.
    let shifted = FieldView::from_strs(["x", "a a"]);
    searcher.match_field(&shifted, &terms, &mut recorder);

    let positions: Vec<(usize, usize)> = recorder
        .records(1)
        .iter()
        .map(|r| (r.value_index, r.byte_offset))
        .collect();
    assert_eq!(positions, vec![(0, 0), (1, 0), (1, 2)]);
    assert_eq!(recorder.count(1), 3);

    Ok(())
}

#[test]
fn test_exact_whole_value_scenario() -> Result<()> {
    let terms = QueryTermSet::new(vec![
        QueryTerm::new(1, "shoe")?
            .with_mode(MatchMode::Exact)
            .with_min_field_size(0),
    ])?;
    let view = FieldView::from_strs(["red shoe", "shoe"]);

    let recorder = Dispatcher::new(Searcher::exact()).evaluate(&view, &terms);

    assert_eq!(recorder.count(1), 1);
    assert_eq!(recorder.records(1)[0].value_index, 1);
    assert_eq!(recorder.records(1)[0].byte_offset, 0);

    Ok(())
}

#[test]
fn test_tokenized_scenario() -> Result<()> {
    let terms = single_term(1, "shoe")?;
    let view = FieldView::from_strs(["red shoe rack"]);

    let recorder = Dispatcher::new(Searcher::tokenized()).evaluate(&view, &terms);

    assert_eq!(recorder.count(1), 1);
    let record = recorder.records(1)[0];
    assert_eq!(&"red shoe rack"[record.byte_range()], "shoe");

    Ok(())
}

#[test]
fn test_normalized_scenario() -> Result<()> {
    let terms = QueryTermSet::new(vec![
        QueryTerm::new(1, "café")?.with_mode(MatchMode::Normalized),
    ])?;
    let view = FieldView::from_strs(["Cafe"]);

    assert_eq!(
        Dispatcher::new(Searcher::normalized())
            .evaluate(&view, &terms)
            .count(1),
        1
    );
    assert_eq!(
        Dispatcher::new(Searcher::exact())
            .evaluate(&view, &terms)
            .count(1),
        0
    );
    // Term-mode routing follows the term's own mode.
    assert_eq!(Dispatcher::by_term_mode().evaluate(&view, &terms).count(1), 1);

    Ok(())
}

#[test]
fn test_multi_value_aggregation() -> Result<()> {
    let terms = single_term(1, "a")?;
    let view = FieldView::from_strs(["a", "b", "a"]);

    let recorder = Dispatcher::new(Searcher::exact()).evaluate(&view, &terms);

    assert_eq!(recorder.count(1), 2);
    let indexes: Vec<usize> = recorder.records(1).iter().map(|r| r.value_index).collect();
    assert_eq!(indexes, vec![0, 2]);

    Ok(())
}

#[test]
fn test_match_count_bounded_by_non_overlapping_occurrences() -> Result<()> {
    let terms = single_term(1, "aa")?;
    let view = FieldView::from_strs(["aaaa", "aaa", "a"]);

    let recorder = Dispatcher::new(substring_searcher()).evaluate(&view, &terms);

    // 2 + 1 + 0 non-overlapping occurrences
    assert_eq!(recorder.count(1), 3);

    Ok(())
}

#[test]
fn test_ascii_fields() -> Result<()> {
    let terms = single_term(1, "shoe")?;
    let view = FieldView::new(vec![&b"shoe\xFF"[..], &b"shoe"[..]], Encoding::Ascii);

    let recorder = Dispatcher::new(Searcher::exact()).evaluate(&view, &terms);
    assert_eq!(recorder.matched_value_indexes(1), vec![1]);

    let recorder = Dispatcher::new(Searcher::tokenized()).evaluate(&view, &terms);
    assert_eq!(recorder.matched_value_indexes(1), vec![0, 1]);

    Ok(())
}

#[test]
fn test_presence_only_preserves_presence() -> Result<()> {
    let terms = QueryTermSet::new(
        TERMS
            .iter()
            .enumerate()
            .map(|(id, text)| QueryTerm::new(id as u32, text))
            .collect::<Result<Vec<_>>>()?,
    )?;
    let view = FieldView::from_strs(SAMPLES.iter().copied());
    let dispatcher = Dispatcher::new(substring_searcher());

    let full = dispatcher.evaluate(&view, &terms);
    let presence = dispatcher
        .clone()
        .with_all_presence_only(true)
        .evaluate(&view, &terms);

    for term in terms.iter() {
        assert_eq!(full.has_match(term.id()), presence.has_match(term.id()));
        assert!(presence.count(term.id()) <= full.count(term.id()));
    }

    Ok(())
}

#[test]
fn test_config_driven_batch() -> Result<()> {
    let config = FieldMatchConfig::from_json_str(
        r#"{
            "fields": {"title": {"kind": "tokenized", "fold_tokens": true}},
            "thread_pool_size": 2
        }"#,
    )?;
    assert_eq!(
        config.settings_for("title"),
        Some(SearcherSettings::new(MatchMode::Tokenized).with_fold_tokens(true))
    );

    let terms = QueryTermSet::from_json(r#"[{"id": 1, "text": "shoe"}]"#)?;
    let texts = ["Red SHOE", "boot", "shoe rack"];
    let views: Vec<FieldView<'_>> = texts.iter().map(|t| FieldView::from_strs([*t])).collect();

    let batch: BatchEvaluator = config.batch_evaluator_for("title")?;
    let results = batch.evaluate(&views, &terms, &CancelFlag::new());

    let counts: Vec<usize> = results.iter().map(|r| r.count(1)).collect();
    assert_eq!(counts, vec![1, 0, 1]);
    assert!(results.iter().all(MatchRecorder::is_complete));

    Ok(())
}
