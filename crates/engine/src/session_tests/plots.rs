// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plot commands rendered into image files

use super::*;
use tempfile::TempDir;

const PLOT: &str = "plot2d(sin(x), [x, -10, 10])";

/// Output Maxima prints for a plot rendered to a file: the file list as text
/// and a latex body holding only the output label.
const PLOT_OUTPUT: &str = "<RESULT><TEXT>(%o1) [/tmp/plot.gnuplot, /tmp/plot.png]</TEXT>\
<LATEX>\\mbox{\\tt\\red(\\mathrm{\\%o1}) \\black}</LATEX></RESULT><PROMPT>(%i2) </PROMPT>\n";

async fn plotting() -> (TestContext, TempDir) {
    let dir = TempDir::new().unwrap();
    let mut ctx = setup_with(maxima(dir.path().to_path_buf()));
    ctx.session.login().await.unwrap();
    ctx.take_events();
    (ctx, dir)
}

#[tokio::test]
async fn plot_command_is_sent_with_output_file() {
    let (mut ctx, dir) = plotting().await;
    let expr = ctx.session.evaluate(PLOT).await;

    let image = expr.lock().pending_image().cloned().unwrap();
    assert!(image.starts_with(dir.path()));
    let sent = ctx.transport.sent();
    assert_eq!(
        sent,
        vec![format!(
            "plot2d(sin(x), [x, -10, 10], [gnuplot_term, \"png size 500,340\"], \
             [gnuplot_out_file, \"{}\"]);\n",
            image.display()
        )]
    );
}

#[tokio::test]
async fn rendered_image_replaces_placeholder() {
    let (mut ctx, _dir) = plotting().await;
    let expr = ctx.session.evaluate(PLOT).await;
    let image = expr.lock().pending_image().cloned().unwrap();
    std::fs::write(&image, b"\x89PNG fake image").unwrap();

    ctx.transport.emit(PLOT_OUTPUT);
    ctx.session.drain_output().await;

    let expr = expr.snapshot();
    assert_eq!(expr.status(), ExpressionStatus::Done);
    assert_eq!(expr.results(), &[EvalResult::Image { location: image }]);
    assert_eq!(expr.pending_image(), None);
    assert_eq!(expr.sequence_id(), Some(1));
}

#[tokio::test]
async fn missing_image_keeps_pending_marker() {
    let (mut ctx, _dir) = plotting().await;
    let expr = ctx.session.evaluate(PLOT).await;
    let image = expr.lock().pending_image().cloned().unwrap();

    ctx.transport.emit(PLOT_OUTPUT);
    ctx.session.drain_output().await;

    assert_eq!(expr.status(), ExpressionStatus::Done);
    assert_eq!(plain_results(&expr), vec![PLOT_PLACEHOLDER.to_string()]);
    assert_eq!(expr.lock().pending_image(), Some(&image));

    // The engine finishes writing later
    std::fs::write(&image, b"\x89PNG fake image").unwrap();
    assert!(attach_plot_image(&mut expr.lock()));
    assert_eq!(
        expr.lock().results(),
        &[EvalResult::Image {
            location: image.clone()
        }]
    );
    assert!(!attach_plot_image(&mut expr.lock()));
}

#[tokio::test]
async fn empty_image_file_is_not_attached() {
    let (mut ctx, _dir) = plotting().await;
    let expr = ctx.session.evaluate(PLOT).await;
    let image = expr.lock().pending_image().cloned().unwrap();
    std::fs::write(&image, b"").unwrap();

    ctx.transport.emit(PLOT_OUTPUT);
    ctx.session.drain_output().await;

    assert_eq!(plain_results(&expr), vec![PLOT_PLACEHOLDER.to_string()]);
    assert!(expr.lock().pending_image().is_some());
}

#[tokio::test]
async fn plot_without_integration_is_plain_command() {
    let mut ctx = setup_with(Backend::Maxima {
        plot_integration: false,
        plot_dir: std::env::temp_dir(),
    });
    ctx.session.login().await.unwrap();

    let expr = ctx.session.evaluate(PLOT).await;

    assert!(!expr.lock().flags().plot);
    assert_eq!(expr.lock().pending_image(), None);
    assert_eq!(ctx.transport.sent(), vec![format!("{PLOT};\n")]);
}

#[tokio::test]
async fn interrupted_plot_drops_pending_marker() {
    let (mut ctx, _dir) = plotting().await;
    let expr = ctx.session.evaluate(PLOT).await;
    ctx.session.interrupt().await;

    assert_eq!(expr.status(), ExpressionStatus::Interrupted);
    assert_eq!(expr.lock().pending_image(), None);
}
