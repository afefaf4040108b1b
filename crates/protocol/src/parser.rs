// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental decoder for tagged engine output.
//!
//! Example output for `5+5` with typesetting on:
//!
//! ```text
//! <RESULT><TEXT>
//! (%o1) 10
//! </TEXT><LATEX>\mbox{\tt\red(\mathrm{\%o1}) \black}10</LATEX></RESULT>
//! <PROMPT>(%i2) </PROMPT>
//! ```
//!
//! Chunks may split anywhere, including inside a tag name. Nothing is
//! decided until a block's closing tag has arrived.

use crate::classifier::{Classified, ResultClassifier};
use crate::cursor::ParseCursor;
use crate::tags::TagVocabulary;
use wks_core::{EvalResult, ExpressionFlags, ExpressionStatus};

/// Result shown for a plot until its image file is available.
pub const PLOT_PLACEHOLDER: &str = "Waiting for image...";

/// A batch closed by a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finalized {
    pub status: ExpressionStatus,
    pub results: Vec<EvalResult>,
    pub error_message: Option<String>,
    pub sequence_id: Option<u32>,
    /// Untagged text seen during the batch, as received
    pub stray_text: String,
}

/// Outcome of [`StreamingResultParser::feed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// No prompt yet; feed more output.
    Incomplete,
    /// The engine waits for one more line of input. The batch stays open.
    NeedsMoreInput(String),
    Finalized(Finalized),
}

enum Block {
    Result,
    Prompt,
}

#[derive(Debug, Clone)]
pub struct StreamingResultParser {
    vocab: TagVocabulary,
    classifier: ResultClassifier,
    typeset: bool,
}

impl Default for StreamingResultParser {
    fn default() -> Self {
        Self::new(TagVocabulary::default(), ResultClassifier::default())
    }
}

impl StreamingResultParser {
    pub fn new(vocab: TagVocabulary, classifier: ResultClassifier) -> Self {
        Self {
            vocab,
            classifier,
            typeset: true,
        }
    }

    /// With `typeset` off, latex bodies are ignored and every result is
    /// plain text.
    pub fn with_typeset(mut self, typeset: bool) -> Self {
        self.typeset = typeset;
        self
    }

    pub fn vocabulary(&self) -> &TagVocabulary {
        &self.vocab
    }

    pub fn classifier(&self) -> &ResultClassifier {
        &self.classifier
    }

    /// Append `chunk` to `cursor` and parse as far as complete blocks allow.
    ///
    /// Parsing stops at the first complete prompt; output after it stays in
    /// the cursor for the next expression. Feeding an empty chunk re-parses
    /// whatever is already buffered.
    pub fn feed(&self, cursor: &mut ParseCursor, chunk: &[u8], flags: ExpressionFlags) -> ParseOutcome {
        cursor.push_bytes(chunk);

        let result_open = TagVocabulary::open(&self.vocab.result);
        let result_close = TagVocabulary::close(&self.vocab.result);
        let prompt_open = TagVocabulary::open(&self.vocab.prompt);
        let prompt_close = TagVocabulary::close(&self.vocab.prompt);

        loop {
            let buffer = cursor.buffer();
            let next_result = buffer.find(&result_open);
            let next_prompt = buffer.find(&prompt_open);
            let (start, block) = match (next_result, next_prompt) {
                (Some(r), Some(p)) if p < r => (p, Block::Prompt),
                (Some(r), _) => (r, Block::Result),
                (None, Some(p)) => (p, Block::Prompt),
                (None, None) => return ParseOutcome::Incomplete,
            };

            if start > 0 {
                cursor.consume_as_stray(start);
            }

            match block {
                Block::Result => {
                    let Some((body, end)) = block_body(cursor.buffer(), &result_open, &result_close)
                    else {
                        return ParseOutcome::Incomplete;
                    };
                    let (result, label) = self.parse_result(body, flags);
                    tracing::debug!(
                        label = ?label,
                        rich = matches!(result, EvalResult::Rich { .. }),
                        "parsed result block"
                    );
                    cursor.push_result(result, label);
                    cursor.consume(end);
                }
                Block::Prompt => {
                    let Some((body, end)) = block_body(cursor.buffer(), &prompt_open, &prompt_close)
                    else {
                        return ParseOutcome::Incomplete;
                    };
                    if let Some(prompt) = self.information_request(body) {
                        tracing::debug!(prompt = %prompt, "information request");
                        cursor.consume(end);
                        cursor.clear_stray();
                        return ParseOutcome::NeedsMoreInput(prompt);
                    }
                    cursor.consume(end);
                    return ParseOutcome::Finalized(self.finalize(cursor, flags));
                }
            }
        }
    }

    fn finalize(&self, cursor: &mut ParseCursor, flags: ExpressionFlags) -> Finalized {
        let (stray_text, results, sequence_id) = cursor.take_batch();
        let Classified {
            status,
            results,
            error_message,
        } = self.classifier.classify(&stray_text, results, flags);
        tracing::debug!(%status, results = results.len(), "batch finalized");
        Finalized {
            status,
            results,
            error_message,
            sequence_id,
            stray_text,
        }
    }

    /// Turn the body of a result block into a result and its label number.
    fn parse_result(&self, body: &str, flags: ExpressionFlags) -> (EvalResult, Option<u32>) {
        let text_open = TagVocabulary::open(&self.vocab.text);
        let text_close = TagVocabulary::close(&self.vocab.text);
        let raw_text = block_body(body, &text_open, &text_close).map_or("", |(text, _)| text);
        let (plain, label) = self.vocab.strip_label(raw_text);

        if flags.internal || flags.help_request || !self.typeset {
            return (EvalResult::text(plain), label);
        }

        let latex_open = TagVocabulary::open(&self.vocab.latex);
        let latex_close = TagVocabulary::close(&self.vocab.latex);
        // Absent or unterminated latex falls back to text
        let Some((latex, _)) = block_body(body, &latex_open, &latex_close) else {
            return (EvalResult::text(plain), label);
        };

        let latex = strip_label_box(latex.trim()).trim();
        if latex.is_empty() {
            if flags.plot {
                return (EvalResult::text(PLOT_PLACEHOLDER), label);
            }
            return (EvalResult::text(plain), label);
        }
        (EvalResult::rich(format!("\\[{latex}\\]"), plain), label)
    }

    /// Prompt text when a prompt body wraps an information request.
    fn information_request(&self, prompt_body: &str) -> Option<String> {
        let info_open = TagVocabulary::open(&self.vocab.info_request);
        let info_close = TagVocabulary::close(&self.vocab.info_request);
        let start = prompt_body.find(&info_open)? + info_open.len();
        let info = &prompt_body[start..];
        let info = info.find(&info_close).map_or(info, |end| &info[..end]);

        let text_open = TagVocabulary::open(&self.vocab.text);
        let text_close = TagVocabulary::close(&self.vocab.text);
        let prompt = block_body(info, &text_open, &text_close).map_or(info, |(text, _)| text);
        Some(prompt.trim().to_string())
    }
}

/// Content between the first `open` tag in `text` and the matching `close`
/// tag, plus the byte offset just past `close`. `None` until both tags are
/// present.
fn block_body<'a>(text: &'a str, open: &str, close: &str) -> Option<(&'a str, usize)> {
    let start = text.find(open)? + open.len();
    let len = text[start..].find(close)?;
    Some((&text[start..start + len], start + len + close.len()))
}

/// Remove a leading `\mbox{...}` output-label box, balancing braces.
fn strip_label_box(latex: &str) -> &str {
    const MBOX: &str = "\\mbox{";
    let Some(rest) = latex.strip_prefix(MBOX) else {
        return latex;
    };
    let mut depth = 1usize;
    for (i, c) in rest.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return &rest[i + 1..];
                }
            }
            _ => {}
        }
    }
    // Unbalanced box: nothing after the label
    ""
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
