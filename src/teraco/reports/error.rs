use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Error type covering the different failure cases that can occur while
/// fetching, normalising, or editing report workbooks.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Wrapper for IO failures such as reading, writing, or renaming files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the xlsx writer used for format conversion.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors raised while reading a legacy `.xls` workbook.
    #[error("legacy workbook read error: {0}")]
    LegacyRead(#[from] calamine::XlsError),

    /// Errors raised while loading a workbook for in-place edits.
    #[error("workbook read error: {0}")]
    WorkbookRead(#[from] umya_spreadsheet::reader::xlsx::XlsxError),

    /// Errors raised while saving an edited workbook.
    #[error("workbook save error: {0}")]
    WorkbookSave(#[from] umya_spreadsheet::writer::xlsx::XlsxError),

    /// Raised when comma-separated input cannot be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when a downloaded archive cannot be extracted.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Raised when a rename pattern fails to compile.
    #[error("invalid rename pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Raised when the download worker pool cannot be created.
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// Raised when JSON output cannot be produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when a month-year label does not follow the `Mmm-YY` shape.
    #[error("could not parse month-year string '{label}': {reason}")]
    InvalidMonth { label: String, reason: String },

    /// Raised when a legacy file could not be converted to xlsx.
    #[error("could not convert {path}: {reason}")]
    Conversion { path: PathBuf, reason: String },

    /// Raised when a workbook does not allow the requested structural edit.
    #[error("invalid workbook structure: {0}")]
    Workbook(String),

    /// Raised when a rename would overwrite an existing file.
    #[error("rename target already exists: {0}")]
    RenameCollision(PathBuf),

    /// Raised when the operator picks an item that does not exist.
    #[error("invalid selection '{0}'")]
    Selection(String),

    /// Raised when required configuration is absent.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
