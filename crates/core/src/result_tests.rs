// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn rich_result_plain_is_the_fallback() {
    let result = EvalResult::rich("\\[10\\]", "10");
    assert_eq!(result.plain(), Some("10"));
}

#[test]
fn image_result_has_no_plain_text() {
    let result = EvalResult::Image {
        location: PathBuf::from("/tmp/plot.png"),
    };
    assert_eq!(result.plain(), None);
}

#[test]
fn set_warning_marks_text_result() {
    let mut result = EvalResult::text("15/2");
    assert!(!result.is_warning());
    assert!(result.set_warning("rat: replaced 7.5 by 15/2"));
    assert_eq!(result.warning(), Some("rat: replaced 7.5 by 15/2"));
}

#[test]
fn set_warning_rejected_for_help() {
    let mut result = EvalResult::Help {
        body: "describe".into(),
    };
    assert!(!result.set_warning("ignored"));
    assert!(!result.is_warning());
}

#[test]
fn serializes_with_kind_tag() {
    let json = serde_json::to_value(EvalResult::text("4")).unwrap();
    assert_eq!(json["kind"], "text");
    assert_eq!(json["plain"], "4");
    assert!(json.get("warning").is_none());
}
