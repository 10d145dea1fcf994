//! Local directory helpers: enumeration, archive extraction, and cleanup.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::teraco::reports::error::Result;
use crate::teraco::reports::rules::WATER_CONSOLIDATED;

/// Extensions of transient files removed once processing has finished.
pub const TEMPORARY_EXTENSIONS: [&str; 2] = ["csv", "zip"];

/// Lists every regular file below `root`, sorted by path.
pub fn list_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!(%error, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Returns whether the path carries the given extension, ignoring case.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Extracts a zip archive next to itself.
pub fn extract_archive(archive: &Path) -> Result<()> {
    let target = archive.parent().unwrap_or_else(|| Path::new("."));
    let mut zip = ZipArchive::new(File::open(archive)?)?;
    debug!(archive = %archive.display(), entries = zip.len(), "extracting archive");
    zip.extract(target)?;
    Ok(())
}

/// Extracts every zip archive below `root`, returning how many were unpacked.
/// An archive that fails to extract is logged and skipped.
pub fn extract_archives(root: &Path) -> usize {
    let mut extracted = 0;
    for archive in list_files(root)
        .into_iter()
        .filter(|path| has_extension(path, "zip"))
    {
        match extract_archive(&archive) {
            Ok(()) => extracted += 1,
            Err(error) => warn!(archive = %archive.display(), %error, "couldn't extract archive"),
        }
    }
    if extracted > 0 {
        info!(count = extracted, "extracted archives");
    }
    extracted
}

/// Deletes transient `.csv` and `.zip` files. Failures are ignored.
pub fn cleanup_temp_files(root: &Path) -> usize {
    let mut removed = 0;
    for path in list_files(root) {
        if TEMPORARY_EXTENSIONS
            .iter()
            .any(|extension| has_extension(&path, extension))
        {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(error) => debug!(path = %path.display(), %error, "couldn't remove file"),
            }
        }
    }
    removed
}

/// Finds the consolidated water workbook anywhere below `root`.
pub fn find_water_file(root: &Path) -> Option<PathBuf> {
    list_files(root).into_iter().find(|path| {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.eq_ignore_ascii_case(WATER_CONSOLIDATED))
            .unwrap_or(false)
    })
}
