//! Remote object store seam and the bounded download pool.
//!
//! The pipeline only needs three capabilities from remote storage: list the
//! top-level containers, list blob names within a container, and fetch one
//! blob into a local file. [`ObjectStore`] captures exactly that.
//! [`DirectoryStore`] serves the same contract from a local directory tree,
//! where each top-level directory is a container.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::teraco::reports::error::{Result, ReportError};
use crate::teraco::reports::io::fs::list_files;

/// Operations consumed from remote blob storage.
pub trait ObjectStore: Send + Sync {
    /// Names of the top-level containers.
    fn list_containers(&self) -> Result<Vec<String>>;

    /// Blob names in `container` starting with `prefix`.
    fn list_blobs(&self, container: &str, prefix: &str) -> Result<Vec<String>>;

    /// Writes the blob's bytes to `dest`. The parent directory exists.
    fn download(&self, container: &str, blob: &str, dest: &Path) -> Result<()>;
}

/// Object store backed by a local directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ReportError::MissingInput(root));
        }
        Ok(Self { root })
    }

    fn blob_path(&self, container: &str, blob: &str) -> PathBuf {
        blob.split('/')
            .fold(self.root.join(container), |path, segment| path.join(segment))
    }
}

impl ObjectStore for DirectoryStore {
    fn list_containers(&self) -> Result<Vec<String>> {
        let mut containers = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                containers.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        containers.sort();
        Ok(containers)
    }

    fn list_blobs(&self, container: &str, prefix: &str) -> Result<Vec<String>> {
        let base = self.root.join(container);
        if !base.is_dir() {
            return Err(ReportError::MissingInput(base));
        }
        let blobs = list_files(&base)
            .into_iter()
            .filter_map(|path| {
                let relative = path.strip_prefix(&base).ok()?;
                let name = relative
                    .components()
                    .map(|part| part.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                name.starts_with(prefix).then_some(name)
            })
            .collect();
        Ok(blobs)
    }

    fn download(&self, container: &str, blob: &str, dest: &Path) -> Result<()> {
        fs::copy(self.blob_path(container, blob), dest)?;
        Ok(())
    }
}

/// Sorted, de-duplicated parent folders of the given blob names.
pub fn list_folders(blobs: &[String]) -> Vec<String> {
    blobs
        .iter()
        .filter(|blob| !blob.is_empty())
        .map(|blob| match blob.rfind('/') {
            Some(index) => blob[..index].to_string(),
            None => String::new(),
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Local destination of `blob` when downloaded from `folder` into `dest`.
pub fn destination_for(dest: &Path, folder: &str, blob: &str) -> PathBuf {
    let relative = if folder.is_empty() {
        blob
    } else {
        blob.strip_prefix(folder)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(blob)
    };
    relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(dest.to_path_buf(), |path, segment| path.join(segment))
}

/// Downloads `blobs` into `dest` on a pool of `workers` threads. Returns the
/// local paths in blob order; the first failing transfer is returned as the
/// error.
#[instrument(level = "info", skip(store, blobs, dest), fields(blob_count = blobs.len(), dest = %dest.display()))]
pub fn download_all(
    store: &dyn ObjectStore,
    container: &str,
    folder: &str,
    blobs: &[String],
    dest: &Path,
    workers: usize,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dest)?;
    let pool = ThreadPoolBuilder::new().num_threads(workers.max(1)).build()?;

    let paths = pool.install(|| {
        blobs
            .par_iter()
            .map(|blob| -> Result<PathBuf> {
                let target = destination_for(dest, folder, blob);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                store.download(container, blob, &target)?;
                debug!(blob = %blob, local = %target.display(), "downloaded blob");
                Ok(target)
            })
            .collect::<Result<Vec<_>>>()
    })?;

    info!(count = paths.len(), "downloads complete");
    Ok(paths)
}

/// Which listed items the operator picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    /// Zero-based indices, in the order given.
    Indices(Vec<usize>),
}

impl Selection {
    /// Parses `all` or a comma-separated list of 1-based indices.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        let indices = trimmed
            .split(',')
            .map(parse_index)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::Indices(indices))
    }

    /// Applies the selection to `items`, failing on an out-of-range index.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Result<Vec<T>> {
        match self {
            Self::All => Ok(items.to_vec()),
            Self::Indices(indices) => indices
                .iter()
                .map(|index| {
                    items
                        .get(*index)
                        .cloned()
                        .ok_or_else(|| ReportError::Selection((index + 1).to_string()))
                })
                .collect(),
        }
    }
}

/// Parses a single 1-based index into a zero-based one.
pub fn parse_index(token: &str) -> Result<usize> {
    match token.trim().parse::<usize>() {
        Ok(index) if index >= 1 => Ok(index - 1),
        _ => Err(ReportError::Selection(token.trim().to_string())),
    }
}
