//! jira - browse issue lists in a two-pane terminal preview.
//!
//! Loads a preview manifest, turns its entries into content producers and
//! hands them to the `jira_tui` preview engine.

use anyhow::{Context, Result};
use clap::Parser;
use jira_tui::{Error as PreviewError, Preview};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use std::time::Duration;

mod cli;
mod config;
mod producer;

use cli::Cli;
use config::{Manifest, default_manifest_path};
use producer::build_entries;

/// Set up logging with file output. The preview owns the terminal, so logs
/// go to a file in the temp dir.
fn setup_logging(debug_flag: bool) {
    let level = if debug_flag || cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_dir = std::env::temp_dir();
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("jira-preview-{timestamp}.log");

    #[cfg(unix)]
    {
        let symlink_path = log_dir.join("jira-preview.log");
        let _ = std::fs::remove_file(&symlink_path);
        let _ = std::os::unix::fs::symlink(log_dir.join(&log_filename), symlink_path);
    }

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    std::mem::forget(guard);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();
}

/// How long exit waits for producers still running on the blocking pool.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

/// Drives `future` to completion on a fresh runtime. Blocking producers that
/// outlive it are abandoned after [`SHUTDOWN_GRACE`] instead of holding the
/// process open.
fn run<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let output = runtime.block_on(future);
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    Ok(output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let path = match cli.manifest {
        Some(path) => path,
        None => default_manifest_path().context("could not determine the config directory")?,
    };
    let manifest = Manifest::load(&path)?;

    let mut preview = Preview::new().with_theme(manifest.theme.resolve());
    if let Some(text) = cli.initial_text.or(manifest.initial_text) {
        preview = preview.with_initial_text(text);
    }
    if let Some(text) = cli.footer_text.or(manifest.footer_text) {
        preview = preview.with_footer_text(text);
    }

    let entries = build_entries(&manifest.entries);
    tracing::info!("Starting preview with {} entries", entries.len());

    match run(preview.render(entries))? {
        Err(PreviewError::NoData) => {
            anyhow::bail!("manifest {} has no entries to preview", path.display())
        }
        result => result.context("preview failed"),
    }
}
