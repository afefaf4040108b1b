// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wks-core: data model shared by the wks session engine crates

pub mod event;
pub mod expression;
pub mod id;
pub mod keywords;
pub mod message;
pub mod result;
pub mod session;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use event::SessionEvent;
pub use expression::{Expression, ExpressionFlags, ExpressionRef, ExpressionStatus};
pub use id::{CompletionId, ExpressionId, IdGen, SequentialIdGen, UuidIdGen};
pub use keywords::{IdentifierKind, KeywordError, KeywordTable};
pub use message::normalize_message;
pub use result::EvalResult;
pub use session::{SessionId, SessionStatus};
