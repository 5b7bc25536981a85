//! Diagnostic logging.
//!
//! The terminal belongs to the UI while the chat runs, so events go to a
//! file. The filter comes from `MATETUTOR_LOG` and defaults to `info`.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::core::config::io::project_dirs;

pub const LOG_ENV: &str = "MATETUTOR_LOG";
const DEFAULT_FILTER: &str = "info";
const LOG_FILE_NAME: &str = "matetutor.log";

/// Where logs go when no `--log` path was given.
pub fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().join(LOG_FILE_NAME))
}

/// Installs the global subscriber writing to `path`, falling back to
/// [`default_log_path`]. Returns the file actually used.
pub fn init_tracing(path: Option<&Path>) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_log_path) else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| -> Box<dyn std::error::Error> { err })?;

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn installs_once_and_reports_a_second_install() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("logs").join(LOG_FILE_NAME);

        let used = init_tracing(Some(&path)).expect("first install");
        assert_eq!(used.as_deref(), Some(path.as_path()));
        assert!(path.exists());

        assert!(init_tracing(Some(&path)).is_err());
    }
}
