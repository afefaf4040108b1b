//! CLI help output specs

use crate::prelude::*;

#[test]
fn wks_help_shows_usage() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("--backend")
        .stdout_has("--no-typeset");
}

#[test]
fn wks_version_shows_package_version() {
    cli()
        .args(&["--version"])
        .passes()
        .stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    cli()
        .args(&["--frobnicate"])
        .fails()
        .code(2)
        .stderr_has("--frobnicate");
}
