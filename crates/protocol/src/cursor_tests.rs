// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn multibyte_char_split_across_chunks() {
    let bytes = "x=π".as_bytes();
    let (first, second) = bytes.split_at(bytes.len() - 1);

    let mut cursor = ParseCursor::new();
    cursor.push_bytes(first);
    assert_eq!(cursor.buffer(), "x=");
    assert!(!cursor.is_empty());

    cursor.push_bytes(second);
    assert_eq!(cursor.buffer(), "x=π");
}

#[test]
fn invalid_bytes_become_replacement_chars() {
    let mut cursor = ParseCursor::new();
    cursor.push_bytes(b"a\xffb");
    assert_eq!(cursor.buffer(), "a\u{FFFD}b");
}

#[test]
fn first_labelled_result_sets_sequence_id() {
    let mut cursor = ParseCursor::new();
    cursor.push_result(EvalResult::text("1"), Some(4));
    cursor.push_result(EvalResult::text("2"), Some(5));
    assert_eq!(cursor.sequence_id(), Some(4));
}

#[test]
fn unlabelled_first_result_leaves_sequence_id_unset() {
    let mut cursor = ParseCursor::new();
    cursor.push_result(EvalResult::text("1"), None);
    cursor.push_result(EvalResult::text("2"), Some(5));
    assert_eq!(cursor.sequence_id(), None);
}

#[test]
fn consume_as_stray_moves_text() {
    let mut cursor = ParseCursor::new();
    cursor.push_bytes(b"oops<RESULT>");
    cursor.consume_as_stray(4);
    assert_eq!(cursor.stray_text(), "oops");
    assert_eq!(cursor.buffer(), "<RESULT>");
}

#[test]
fn carry_over_keeps_only_unparsed_output() {
    let mut cursor = ParseCursor::new();
    cursor.push_bytes(b"warn\n<PROMPT>");
    cursor.consume_as_stray(5);
    cursor.push_result(EvalResult::text("10"), Some(1));
    cursor.push_bytes(&"é".as_bytes()[..1]);

    let next = cursor.carry_over();
    assert_eq!(next.buffer(), "<PROMPT>");
    assert_eq!(next.stray_text(), "");
    assert!(next.results().is_empty());
    assert_eq!(next.sequence_id(), None);
    assert!(!next.is_empty());
}
