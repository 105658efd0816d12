use std::fs::{self, File};
use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Route `tracing` output to `path`. The terminal belongs to the panel, so
/// without a log file nothing is recorded.
///
/// The level comes from `RUST_LOG` and defaults to `info`.
pub fn init_file_logging(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| std::io::Error::other(format!("failed to set tracing subscriber: {e}")))
}
