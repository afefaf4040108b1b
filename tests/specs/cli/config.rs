//! Config file specs

use crate::prelude::*;

#[test]
fn explicit_missing_config_fails() {
    cli()
        .args(&["--config", "/nonexistent/wks.toml"])
        .fails()
        .code(1)
        .stderr_has("loading config")
        .stderr_has("/nonexistent/wks.toml");
}

#[test]
fn unknown_config_key_fails() {
    let config = ConfigDir::with("colour = \"red\"\n");
    cli()
        .args(&["--config", config.path().to_str().unwrap()])
        .fails()
        .code(1)
        .stderr_has("failed to parse config");
}

#[test]
fn empty_program_is_invalid() {
    let config = ConfigDir::with("program = \"  \"\n");
    cli()
        .args(&["--config", config.path().to_str().unwrap()])
        .fails()
        .stderr_has("invalid config");
}

#[test]
fn config_file_selects_backend_through_env() {
    let config = ConfigDir::with("backend = \"generic\"\nprogram = \"sh\"\n");
    cli()
        .env("WKS_CONFIG", config.path())
        .engine_args(&["-c", "while read l; do printf '<RESULT><TEXT>(%%o1) ok</TEXT></RESULT><PROMPT></PROMPT>'; done"])
        .stdin(&["x"])
        .passes()
        .stdout_eq("ok\n");
}
