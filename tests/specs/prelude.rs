//! Test helpers for black-box CLI behavior tests.
//!
//! Provides a high-level DSL for testing wks CLI behavior against a
//! scripted engine.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;

/// Scripted engine speaking the tagged output format.
///
/// Every command is echoed back as its result without the terminator.
/// Commands starting with `oops` fail, `warn` prints a warning before the
/// result, and `ask` requests one line of information and echoes the answer.
const ENGINE_SCRIPT: &str = r#"
n=1
while IFS= read -r line; do
  cmd=${line%;}
  case "$cmd" in
    oops*)
      printf '%s\n' "incorrect syntax: $cmd is not a prefix operator" ;;
    warn*)
      printf '%s\n' "rat: replaced 0.5 by 1/2"
      printf '<RESULT><TEXT>(%%o%d) %s</TEXT></RESULT>' "$n" "${cmd#warn }" ;;
    ask*)
      printf '<PROMPT><INFO-REQUEST><TEXT>Is x positive, negative or zero?</TEXT></INFO-REQUEST></PROMPT>'
      IFS= read -r answer
      printf '<RESULT><TEXT>(%%o%d) %s</TEXT></RESULT>' "$n" "${answer%;}" ;;
    *)
      printf '<RESULT><TEXT>(%%o%d) %s</TEXT></RESULT>' "$n" "$cmd" ;;
  esac
  n=$((n+1))
  printf '<PROMPT>(%%i%d) </PROMPT>' "$n"
done
"#;

/// Startup banner a Maxima-flavoured engine prints before its first prompt.
const MAXIMA_BANNER: &str = "printf '<PROMPT>(%%i1) </PROMPT>'\n";

/// Returns the path to a binary, checking llvm-cov target directory first.
/// This works with both standard builds and llvm-cov coverage runs.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR is stale (e.g. compiled by a removed worktree
/// into a shared target directory).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    // Check for llvm-cov target directory first
    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    // The test binary lives at target/debug/deps/specs-<hash>, so its
    // grandparent is target/debug/ where wks is built.
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// Returns the path to the wks binary.
fn wks_binary() -> PathBuf {
    binary_path("wks")
}

/// Create a CLI builder for wks commands
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

/// High-level CLI builder for fluent test assertions
pub struct CliBuilder {
    args: Vec<String>,
    engine_args: Vec<String>,
    envs: Vec<(String, String)>,
    stdin: String,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            engine_args: Vec::new(),
            // Keep the user's config file out of the run
            envs: vec![(
                "WKS_CONFIG".into(),
                "/nonexistent/wks/config.toml".into(),
            )],
            stdin: String::new(),
        }
    }

    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Run against the scripted engine with the generic backend.
    pub fn generic_engine(self) -> Self {
        self.args(&["--backend", "generic", "--program", "sh"])
            .engine_args(&["-c", ENGINE_SCRIPT])
    }

    /// Run against the scripted engine with the Maxima backend, which waits
    /// for the startup prompt and understands comments.
    pub fn maxima_engine(self) -> Self {
        let script = format!("{MAXIMA_BANNER}{ENGINE_SCRIPT}");
        self.args(&["--backend", "maxima", "--program", "sh"])
            .engine_args(&["-c", &script])
    }

    /// Arguments passed through to the engine after `--`
    pub fn engine_args(mut self, args: &[&str]) -> Self {
        self.engine_args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    /// Lines fed to the CLI on stdin
    pub fn stdin(mut self, lines: &[&str]) -> Self {
        for line in lines {
            self.stdin.push_str(line);
            self.stdin.push('\n');
        }
        self
    }

    /// Build the command without running it
    pub fn command(self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::new(wks_binary());
        cmd.args(&self.args);
        if !self.engine_args.is_empty() {
            cmd.arg("--");
            cmd.args(&self.engine_args);
        }

        cmd.env_remove("WKS_LOG");
        for (key, value) in self.envs {
            cmd.env(key, value);
        }

        cmd.write_stdin(self.stdin);
        cmd.timeout(std::time::Duration::from_secs(10));
        cmd
    }

    fn output(self) -> Output {
        self.command().output().expect("command should run")
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        let output = self.output();
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code)
    pub fn fails(self) -> RunAssert {
        let output = self.output();
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    /// Get stdout as string
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    /// Get stderr as string
    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert the process exited with `code`.
    pub fn code(self, code: i32) -> Self {
        assert_eq!(
            self.output.status.code(),
            Some(code),
            "unexpected exit code\nstdout: {}\nstderr: {}",
            self.stdout(),
            self.stderr()
        );
        self
    }

    /// Assert stdout equals expected exactly (with diff on failure).
    /// **Prefer this for format checks** - catches format regressions.
    pub fn stdout_eq(self, expected: &str) -> Self {
        let stdout = self.stdout();
        similar_asserts::assert_eq!(stdout, expected);
        self
    }

    /// Assert stdout contains substring.
    /// Use when exact comparison isn't practical.
    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    /// Assert stdout does not contain substring.
    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout should not contain '{}'\nstdout: {}",
            unexpected,
            stdout
        );
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }
}

/// A temporary directory holding a config file.
pub struct ConfigDir {
    dir: tempfile::TempDir,
}

impl ConfigDir {
    pub fn with(content: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), content).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }
}
