use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::path::Path;

/// Sends log output to `file_path`; the terminal belongs to the UI.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn setup_log(file_path: impl AsRef<Path>) -> Result<()> {
    let file_path = file_path.as_ref();
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(file_path)
        .with_context(|| format!("Failed to open log file {}", file_path.display()))?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("Logger is already initialized")?;

    Ok(())
}
