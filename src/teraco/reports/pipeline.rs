//! End-to-end run: download, extract, rename, trim, zero-fill, clean up.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::teraco::reports::config::RunOptions;
use crate::teraco::reports::energy::trim_energy_files;
use crate::teraco::reports::error::{Result, ReportError};
use crate::teraco::reports::io::fs::{cleanup_temp_files, extract_archives, find_water_file};
use crate::teraco::reports::io::store::{
    ObjectStore, Selection, download_all, list_folders, parse_index,
};
use crate::teraco::reports::rename::RenameEngine;
use crate::teraco::reports::water::{ZeroFill, zero_out_next_month};

/// Source of operator answers for choices not fixed up front.
pub trait Prompt {
    /// Asks `question`, listing `choices` first when there are any.
    fn ask(&mut self, question: &str, choices: &[String]) -> Result<String>;
}

/// What a processing pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub archives_extracted: usize,
    pub renamed: usize,
    pub trimmed: usize,
    pub water: Option<ZeroFill>,
    pub temp_files_removed: usize,
}

/// Runs the local phases over an already-downloaded folder. The reporting
/// month is only requested when a consolidated water workbook is present.
#[instrument(level = "info", skip_all, fields(root = %root.display()))]
pub fn process_folder<F>(
    root: &Path,
    engine: &RenameEngine,
    reporting_month: F,
) -> Result<ProcessSummary>
where
    F: FnOnce() -> Result<String>,
{
    if !root.is_dir() {
        return Err(ReportError::MissingInput(root.to_path_buf()));
    }

    let mut summary = ProcessSummary {
        archives_extracted: extract_archives(root),
        ..ProcessSummary::default()
    };
    summary.renamed = engine.rename_all(root).len();
    summary.trimmed = trim_energy_files(root);

    if let Some(water) = find_water_file(root) {
        let month = reporting_month()?;
        match zero_out_next_month(&water, &month) {
            Ok(fill) => summary.water = Some(fill),
            Err(error) => warn!(path = %water.display(), %error, "couldn't zero-fill water file"),
        }
    }

    summary.temp_files_removed = cleanup_temp_files(root);
    info!(
        renamed = summary.renamed,
        trimmed = summary.trimmed,
        "processing completed"
    );
    Ok(summary)
}

/// Selects blobs from `store`, downloads them, and processes the result.
/// Returns the download folder alongside the summary.
pub fn run(
    store: &dyn ObjectStore,
    engine: &RenameEngine,
    options: &RunOptions,
    prompt: &mut dyn Prompt,
) -> Result<(PathBuf, ProcessSummary)> {
    let containers = store.list_containers()?;
    let container = choose(prompt, options.container.as_deref(), "Select client", &containers)?;

    let all_blobs = store.list_blobs(&container, "")?;
    let folders = list_folders(&all_blobs);
    let folder = choose(prompt, options.folder.as_deref(), "Select folder", &folders)?;

    let blobs = store.list_blobs(&container, &folder)?;
    let answer = match &options.select {
        Some(select) => select.clone(),
        None => prompt.ask("Select files (comma separated or 'all')", &blobs)?,
    };
    let selected = Selection::parse(&answer)?.apply(&blobs)?;

    let dest = match &options.dest {
        Some(dest) => dest.clone(),
        None => PathBuf::from(prompt.ask("Enter download folder path", &[])?.trim()),
    };

    download_all(store, &container, &folder, &selected, &dest, options.workers)?;

    let summary = process_folder(&dest, engine, || match &options.reporting_month {
        Some(month) => Ok(month.clone()),
        None => prompt.ask("Enter reporting month (e.g., 'Feb-25')", &[]),
    })?;
    Ok((dest, summary))
}

/// Picks one of `choices` by name or 1-based index.
fn choose(
    prompt: &mut dyn Prompt,
    preset: Option<&str>,
    question: &str,
    choices: &[String],
) -> Result<String> {
    let answer = match preset {
        Some(answer) => answer.to_string(),
        None => prompt.ask(question, choices)?,
    };
    pick(&answer, choices)
}

fn pick(answer: &str, choices: &[String]) -> Result<String> {
    let answer = answer.trim();
    if let Some(choice) = choices.iter().find(|choice| choice.as_str() == answer) {
        return Ok(choice.clone());
    }
    let index = parse_index(answer)?;
    choices
        .get(index)
        .cloned()
        .ok_or_else(|| ReportError::Selection(answer.to_string()))
}

#[cfg(test)]
mod tests {
    use super::pick;

    #[test]
    fn picks_by_name_or_index() {
        let choices = vec!["acme".to_string(), "teraco".to_string()];
        assert_eq!(pick("teraco", &choices).unwrap(), "teraco");
        assert_eq!(pick(" 1 ", &choices).unwrap(), "acme");
        assert!(pick("3", &choices).is_err());
        assert!(pick("other", &choices).is_err());
    }
}
