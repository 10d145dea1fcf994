//! Renaming of downloaded exports to their canonical names.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::teraco::reports::error::{Result, ReportError};
use crate::teraco::reports::io::convert::convert_to_xlsx;
use crate::teraco::reports::io::fs::list_files;
use crate::teraco::reports::model::{CanonicalFile, ReportCategory};
use crate::teraco::reports::rules::{Resolution, RuleSet};
use crate::teraco::reports::tabs;

/// A completed rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    pub from: PathBuf,
    pub to: PathBuf,
    pub resolution: Resolution,
}

/// Converts and renames files according to a [`RuleSet`].
#[derive(Debug, Clone)]
pub struct RenameEngine {
    rules: RuleSet,
}

impl RenameEngine {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Processes every regular file below `root`. Per-file failures are
    /// logged and skipped. Returns the renames performed.
    #[instrument(level = "info", skip_all, fields(root = %root.display()))]
    pub fn rename_all(&self, root: &Path) -> Vec<Renamed> {
        info!("starting file renaming");
        let mut renamed = Vec::new();
        for path in list_files(root) {
            match self.process_file(&path) {
                Ok(Some(done)) => renamed.push(done),
                Ok(None) => {}
                Err(error) => warn!(path = %path.display(), %error, "error processing file"),
            }
        }
        info!(count = renamed.len(), "renaming complete");
        renamed
    }

    /// Converts `path` if needed, resolves its canonical name, and renames it
    /// within its directory.
    pub fn process_file(&self, path: &Path) -> Result<Option<Renamed>> {
        let original_name = file_name(path);
        let current = convert_to_xlsx(path).unwrap_or_else(|| path.to_path_buf());
        let current_name = file_name(&current);

        let resolution = match self.rules.resolve(&current_name) {
            Some(resolution) => resolution,
            None if current_name != original_name => match self.rules.resolve(&original_name) {
                Some(resolution) => resolution,
                None => return Ok(None),
            },
            None => return Ok(None),
        };

        if resolution.target == current_name {
            return Ok(None);
        }

        let target = current.with_file_name(&resolution.target);
        if target.exists() {
            return Err(ReportError::RenameCollision(target));
        }
        fs::rename(&current, &target)?;
        info!(from = %original_name, to = %resolution.target, matched_by = ?resolution.matched_by, "renamed");

        if CanonicalFile::from_path(&target).category == Some(ReportCategory::CarRental) {
            tabs::prepare_car_rental(&target);
        }

        Ok(Some(Renamed {
            from: path.to_path_buf(),
            to: target,
            resolution,
        }))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
