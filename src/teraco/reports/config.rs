//! Runtime configuration shared by the command-line front end and tests.

use std::path::PathBuf;

use crate::teraco::reports::error::{Result, ReportError};

/// Environment variable naming the object store root.
pub const STORE_ROOT_ENV: &str = "REPORT_STORE_ROOT";
/// Concurrent transfers used when downloading.
pub const DEFAULT_WORKERS: usize = 4;
/// Log file written alongside console output.
pub const DEFAULT_LOG_FILE: &str = "file_processor.log";

/// Choices for a full fetch-and-process run. Anything left `None` is asked
/// for interactively.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Container name or 1-based index.
    pub container: Option<String>,
    /// Folder name or 1-based index.
    pub folder: Option<String>,
    /// `all` or a comma-separated list of 1-based blob indices.
    pub select: Option<String>,
    pub dest: Option<PathBuf>,
    pub reporting_month: Option<String>,
    pub workers: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            container: None,
            folder: None,
            select: None,
            dest: None,
            reporting_month: None,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Returns the store root or a fatal configuration error.
pub fn require_store_root(root: Option<PathBuf>) -> Result<PathBuf> {
    root.filter(|path| !path.as_os_str().is_empty())
        .ok_or_else(|| {
            ReportError::MissingConfig(format!(
                "object store root not set; pass --store-root or set {STORE_ROOT_ENV}"
            ))
        })
}
