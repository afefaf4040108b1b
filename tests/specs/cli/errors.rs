//! CLI error handling specs
//!
//! Verify exit codes and messages when the engine cannot be used.

use crate::prelude::*;

#[test]
fn missing_program_exits_two() {
    cli()
        .args(&["--backend", "generic", "--program", "/nonexistent/engine"])
        .stdin(&["2+2"])
        .fails()
        .code(2)
        .stderr_has("failed to start /nonexistent/engine");
}

#[test]
fn engine_exiting_fails_the_command() {
    cli()
        .args(&["--backend", "generic", "--program", "sh"])
        .engine_args(&["-c", "read line; exit 0"])
        .stdin(&["2+2"])
        .fails()
        .code(1)
        .stdout_eq("error: engine process exited\n");
}
