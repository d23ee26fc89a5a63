//! `tasktrack`: terminal task tracker.
//!
//! Reads one command per line from stdin and prints the result. Tasks live
//! in memory for the lifetime of the process. Configuration via CLI flags,
//! environment variables, or config file (`~/.config/tasktrack/config.toml`).
//!
//! ```bash
//! cargo run --bin tasktrack
//! > add high 2099-01-01 Write report | Quarterly numbers
//! > sort priority
//! > urgent
//! > stats
//!
//! # JSON output, priority view first
//! cargo run --bin tasktrack -- --json --sort priority
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_appender::non_blocking::WorkerGuard;

use tasktrack::clock::{Clock, SystemClock};
use tasktrack::config::{AppConfig, CliArgs};
use tasktrack::console::{self, Console, Reply};
use tasktrack::registry::{TaskRegistry, spawn_registry};

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            AppConfig::default()
        }
    };

    // Logs go to a file; stdout belongs to the console.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(view = %config.default_view, "tasktrack starting");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let registry = spawn_registry(
        TaskRegistry::with_clock(Arc::clone(&clock)),
        config.channel_capacity,
    );
    let mut console = Console::new(registry.clone(), clock, config);

    let result = run_console(&mut console).await;

    registry.shutdown().await;
    tracing::info!("tasktrack exiting");
    result
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("tasktrack.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Read-eval-print loop until `quit` or end of input.
async fn run_console(console: &mut Console) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout
        .write_all(b"tasktrack - type 'help' for commands\n")
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let output = match console.execute_line(&line).await {
            Ok(Reply::Quit) => break,
            Ok(reply) => console::render(&reply, console.config()),
            Err(e) => {
                tracing::warn!(error = %e, "command failed");
                format!("error: {e}")
            }
        };
        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }

    stdout.flush().await
}
