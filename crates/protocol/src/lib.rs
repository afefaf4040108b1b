// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wks-protocol: wire format spoken with a tagged-output engine
//!
//! Engine output is a byte stream of `<NAME>`/`</NAME>` tagged blocks mixed
//! with untagged "stray" text. [`StreamingResultParser`] turns it into typed
//! results one chunk at a time, and [`ResultClassifier`] decides what the
//! stray text means once a prompt closes the batch.

pub mod classifier;
pub mod cursor;
pub mod parser;
pub mod submit;
pub mod tags;

pub use classifier::{Classified, ResultClassifier, StrayTextPolicy};
pub use cursor::ParseCursor;
pub use parser::{Finalized, ParseOutcome, StreamingResultParser, PLOT_PLACEHOLDER};
pub use submit::{prepare_command, prepare_information, TERMINATORS};
pub use tags::{ProtocolError, TagVocabulary};
