// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    percent_marker  = { "(%o1) 10",        "10",        Some(1) },
    multi_digit     = { "(%o123) x^2",     "x^2",       Some(123) },
    single_letter   = { "(o7) done",       "done",      Some(7) },
    padded          = { "\n  (%o2) 4\n",   "4",         Some(2) },
    no_label        = { "plain output",    "plain output", None },
    label_not_first = { "x (%o1) 10",      "x (%o1) 10", None },
    marker_too_long = { "(%ab1) 3",        "(%ab1) 3",  None },
    label_only      = { "(%o5)",           "",          Some(5) },
)]
fn strips_output_label(text: &str, rest: &str, number: Option<u32>) {
    let vocab = TagVocabulary::default();
    assert_eq!(vocab.strip_label(text), (rest.to_string(), number));
}

#[test]
fn default_names() {
    let vocab = TagVocabulary::default();
    assert_eq!(TagVocabulary::open(&vocab.result), "<RESULT>");
    assert_eq!(TagVocabulary::close(&vocab.info_request), "</INFO-REQUEST>");
    assert_eq!(vocab.label_pattern(), DEFAULT_LABEL_PATTERN);
}

#[test]
fn custom_label_pattern() {
    let vocab = TagVocabulary::default()
        .with_label_pattern(r"^Out\[(\d+)\]:")
        .unwrap();
    assert_eq!(vocab.strip_label("Out[3]: 9"), ("9".to_string(), Some(3)));
}

#[test]
fn label_pattern_without_digits_group() {
    let vocab = TagVocabulary::default().with_label_pattern(r"^=>").unwrap();
    assert_eq!(vocab.strip_label("=> ok"), ("ok".to_string(), None));
}

#[test]
fn invalid_label_pattern_is_reported() {
    let err = TagVocabulary::default()
        .with_label_pattern("(unclosed")
        .unwrap_err();
    assert!(err.to_string().starts_with("invalid output label pattern '(unclosed'"));
}
