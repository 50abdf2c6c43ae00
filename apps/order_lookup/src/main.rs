use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{render, HttpOrderSource, OrderLookupController};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, normalize_base_url};

/// Look up orders on the order service by UID.
#[derive(Parser, Debug)]
struct Args {
    /// Root of the order service, e.g. http://localhost:8080
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Look up a single order and exit. Without it, UIDs are read from stdin.
    order_uid: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(base_url) = args.base_url {
        settings.base_url = normalize_base_url(&base_url);
    }
    if let Some(secs) = args.timeout_secs {
        settings.request_timeout_secs = Some(secs);
    }

    let source = HttpOrderSource::with_timeout(&settings.base_url, settings.request_timeout())?;
    let controller = OrderLookupController::new(Arc::new(source));
    info!(base_url = %settings.base_url, "order lookup ready");

    let found = match args.order_uid {
        Some(raw) => run_once(&controller, &raw, &mut std::io::stdout()).await?,
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            run_interactive(controller, stdin, std::io::stdout()).await?;
            true
        }
    };

    Ok(if found {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Looks up one order and writes the rendered result. Returns whether the
/// lookup succeeded.
async fn run_once(
    controller: &OrderLookupController,
    raw: &str,
    output: &mut impl Write,
) -> Result<bool> {
    let state = controller.lookup_order(raw).await;
    writeln!(output, "{}", render(&state)).context("failed to write result")?;
    Ok(state.error().is_none())
}

/// One lookup per input line. A renderer task writes every settled state; it
/// drains and stops once input ends and the controller is dropped. The
/// output is handed back when done.
async fn run_interactive<R, W>(controller: OrderLookupController, input: R, mut output: W) -> Result<W>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send + 'static,
{
    let mut states = controller.subscribe();
    let renderer = tokio::spawn(async move {
        loop {
            match states.recv().await {
                Ok(state) if state.is_settled() => {
                    if let Err(error) = writeln!(output, "{}", render(&state)) {
                        warn!(%error, "failed to write lookup result");
                    }
                    let _ = output.flush();
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "renderer fell behind"),
                Err(RecvError::Closed) => break,
            }
        }
        output
    });

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("failed to read order uid")? {
        controller.lookup_order(&line).await;
    }

    drop(controller);
    renderer.await.context("renderer task failed")
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
