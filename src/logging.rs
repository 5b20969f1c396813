use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{Result, eyre};
use tracing::Level;

/// Installs a JSON subscriber writing to `output_path`. The terminal is
/// owned by the TUI, so events never go to stdout or stderr.
pub fn init_file_logging(output_path: &Path, level: &str) -> Result<()> {
    use tracing_subscriber::fmt::format::FmtSpan;

    let level = parse_level(level)?;
    ensure_parent_dir(output_path)?;
    let file = File::create(output_path)?;

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_max_level(level)
        .with_writer(Mutex::new(file))
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    tracing::info!(path = %output_path.display(), %level, "logging initialized");
    Ok(())
}

pub fn parse_level(level: &str) -> Result<Level> {
    level
        .parse()
        .map_err(|_| {
            eyre!("unknown log level {level:?} (expected error, warn, info, debug or trace)")
        })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
