// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Expression, ExpressionFlags, ExpressionId, ExpressionRef};

pub fn expression(id: &str, command: &str) -> Expression {
    Expression::new(ExpressionId::new(id), command, ExpressionFlags::default())
}

pub fn expression_with(id: &str, command: &str, flags: ExpressionFlags) -> Expression {
    Expression::new(ExpressionId::new(id), command, flags)
}

pub fn expression_ref(id: &str, command: &str) -> ExpressionRef {
    ExpressionRef::new(expression(id, command))
}

pub fn internal_flags() -> ExpressionFlags {
    ExpressionFlags {
        internal: true,
        ..ExpressionFlags::default()
    }
}

pub fn help_flags() -> ExpressionFlags {
    ExpressionFlags {
        help_request: true,
        ..ExpressionFlags::default()
    }
}

pub fn raw_flags() -> ExpressionFlags {
    ExpressionFlags {
        raw_passthrough: true,
        ..ExpressionFlags::default()
    }
}
