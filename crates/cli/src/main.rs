// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wks - evaluate commands with a tagged-output engine from the terminal

mod env;
mod exit_error;
mod output;
mod repl;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use exit_error::{ExitError, EXIT_EVALUATION_FAILED, EXIT_LOGIN_FAILED};
use output::OutputFormat;
use repl::Repl;
use std::path::PathBuf;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use wks_adapters::{ProcessTransport, TracedTransport};
use wks_engine::{BackendKind, Session, SessionConfig};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum BackendArg {
    Maxima,
    Generic,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Maxima => BackendKind::Maxima,
            BackendArg::Generic => BackendKind::Generic,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "wks",
    version,
    about = "Evaluate commands with a computer algebra engine, one per input line"
)]
struct Cli {
    /// Config file (default: $WKS_CONFIG or <config dir>/wks/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Engine flavour
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Engine executable
    #[arg(long)]
    program: Option<String>,

    /// Output that signals the engine is ready ("" to not wait)
    #[arg(long)]
    ready_marker: Option<String>,

    /// Print plain text instead of typesetting results
    #[arg(long)]
    no_typeset: bool,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t)]
    output: OutputFormat,

    /// Arguments passed to the engine
    #[arg(last = true)]
    args: Vec<String>,
}

impl Cli {
    /// Command-line flags override the config file.
    fn apply(&self, config: &mut SessionConfig) {
        if let Some(backend) = self.backend {
            config.backend = backend.into();
        }
        if let Some(program) = &self.program {
            config.program = program.clone();
        }
        if let Some(marker) = &self.ready_marker {
            config.ready_marker = Some(marker.clone());
        }
        if self.no_typeset {
            config.typeset = false;
        }
        if !self.args.is_empty() {
            config.args = self.args.clone();
        }
    }
}

#[tokio::main]
async fn main() {
    setup_logging();
    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<ExitError>()
            .map_or(EXIT_EVALUATION_FAILED, |exit| exit.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {msg}");
        }
        std::process::exit(code);
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_new(env::log_filter()).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Format an anyhow error, skipping causes the top message already shows.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));
    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {i}: {cause}"));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SessionConfig::load(cli.config.as_deref()).context("loading config")?;
    cli.apply(&mut config);
    tracing::debug!(?config, "effective config");

    let transport = TracedTransport::new(ProcessTransport::new(config.process_config()));
    let (event_tx, events) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let mut session = Session::from_config(&config, transport, event_tx)?;

    if let Err(e) = session.login().await {
        return Err(ExitError::new(
            EXIT_LOGIN_FAILED,
            format!("failed to start {}: {e}", config.program),
        )
        .into());
    }

    let stdout = std::io::stdout();
    let result = Repl::new(&mut session, events, stdout.lock(), cli.output)
        .run(BufReader::new(tokio::io::stdin()))
        .await;
    session.logout().await;

    let summary = result?;
    tracing::info!(evaluated = summary.evaluated, errors = summary.errors, "done");
    if summary.errors > 0 {
        return Err(ExitError::new(EXIT_EVALUATION_FAILED, String::new()).into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
