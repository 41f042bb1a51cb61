//! File logging.
//!
//! The dashboard owns the terminal, so records only ever go to
//! `datadash.log`. `--logging <level>` sets the default directive and
//! `RUST_LOG` can still adjust single targets on top of it.

use crate::config::get_data_dir;
use color_eyre::Result;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

lazy_static::lazy_static! {
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Directive applied when `RUST_LOG` names nothing more specific
fn default_directive(level: Option<Level>) -> LevelFilter {
    level.map_or(LevelFilter::WARN, LevelFilter::from_level)
}

/// Resolve where records are appended, creating the parent directory
fn prepare_log_path(custom: Option<PathBuf>, data_dir: &Path) -> Result<PathBuf> {
    let path = custom.unwrap_or_else(|| data_dir.join(LOG_FILE.as_str()));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(path)
}

/// Install the global subscriber; returns the log file in use
pub fn init_with(custom_log_path: Option<PathBuf>, level: Option<Level>) -> Result<PathBuf> {
    let log_path = prepare_log_path(custom_log_path, &get_data_dir())?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_directive(level).into())
        .from_env_lossy();

    let writer_path = log_path.clone();
    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(move || {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&writer_path)
                .expect("failed to open log file")
        })
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_cli_level_sets_default_directive() {
        assert_eq!(default_directive(None), LevelFilter::WARN);
        assert_eq!(default_directive(Some(Level::DEBUG)), LevelFilter::DEBUG);
    }

    #[test]
    fn test_log_goes_to_data_dir_by_default() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        let path = prepare_log_path(None, &data).unwrap();
        assert_eq!(path, data.join("datadash.log"));
        assert!(data.is_dir());
    }

    #[test]
    fn test_custom_log_path_creates_parent() {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("logs").join("run.log");
        let path = prepare_log_path(Some(custom.clone()), dir.path()).unwrap();
        assert_eq!(path, custom);
        assert!(dir.path().join("logs").is_dir());
    }
}
