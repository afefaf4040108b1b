// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wks-engine: session engine driving one tagged-output engine process
//!
//! Ties the lexer, the streaming parser and a transport together behind
//! [`Session`], which queues expressions and dispatches them one at a time.

pub mod backend;
pub mod completion;
pub mod config;
pub mod env;
mod error;
pub mod queue;
pub mod session;

pub use backend::{Backend, BackendKind};
pub use completion::CompletionRequest;
pub use config::SessionConfig;
pub use error::{ConfigError, SessionError};
pub use queue::ExpressionQueue;
pub use session::{attach_plot_image, Session, ENGINE_EXITED, NOT_RUNNING};
