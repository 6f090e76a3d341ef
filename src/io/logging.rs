use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Install a file-backed tracing subscriber.
///
/// The TUI owns the terminal, so there is no stderr fallback: without a log
/// path nothing is installed and events are dropped. `RUST_LOG` overrides
/// the default `twdeck=info` filter.
pub fn init_logging(log_file: Option<&Path>) -> std::io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("twdeck=info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    // A second init (tests, re-entry) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();

    tracing::info!(path = ?path, version = env!("CARGO_PKG_VERSION"), "logging initialized");
    Ok(())
}
