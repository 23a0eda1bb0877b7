//! Fragment file discovery and registry replay.

use crate::fragment::codec::{decode_fragment, trait_path_from_relative, FragmentError};
use crate::model::contribution::Contribution;
use crate::registry::implementors::ImplementorsRegistry;
use log::{info, trace, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMPLEMENTORS_DIR_NAME: &str = "implementors";

/// One discovered fragment script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentFile {
    pub path: PathBuf,
    /// Trait the fragment lists implementors for, e.g. `core::fmt::Display`.
    pub trait_path: String,
}

/// Loader errors.
#[derive(Debug)]
pub enum LoaderError {
    RootNotFound(PathBuf),
    Io { path: PathBuf, message: String },
    Fragment { path: PathBuf, source: FragmentError },
}

impl Display for LoaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RootNotFound(path) => {
                write!(f, "implementors directory not found: {}", path.display())
            }
            Self::Io { path, message } => {
                write!(f, "failed to read `{}`: {message}", path.display())
            }
            Self::Fragment { path, source } => {
                write!(f, "invalid fragment `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for LoaderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Fragment { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Outcome of replaying fragments into a registry.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Trait paths registered, in load order.
    pub registered: Vec<String>,
    pub failures: Vec<LoaderError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Folds a later replay into this report.
    pub fn absorb(&mut self, other: LoadReport) {
        self.registered.extend(other.registered);
        self.failures.extend(other.failures);
    }
}

/// Returns `docs_dir/implementors` when present, otherwise `docs_dir`.
pub fn implementors_root(docs_dir: &Path) -> PathBuf {
    let nested = docs_dir.join(IMPLEMENTORS_DIR_NAME);
    if nested.is_dir() {
        nested
    } else {
        docs_dir.to_path_buf()
    }
}

/// Lists trait fragments under `root`, sorted by relative path.
///
/// Files that are not `trait.<Name>.js` are skipped.
///
/// # Errors
/// - `RootNotFound` when `root` is not a directory.
/// - `Io` when a directory cannot be walked.
pub fn discover_fragments(root: &Path) -> Result<Vec<FragmentFile>, LoaderError> {
    if !root.is_dir() {
        return Err(LoaderError::RootNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|err| LoaderError::Io {
            path: err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            message: err.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let trait_path = match trait_path_from_relative(relative) {
            Ok(trait_path) => trait_path,
            Err(err) => {
                trace!("event=file_skipped module=loader reason=not_trait_fragment error={err}");
                continue;
            }
        };
        files.push(FragmentFile {
            path: entry.path().to_path_buf(),
            trait_path,
        });
    }

    files.sort_by(|left, right| left.path.cmp(&right.path));
    Ok(files)
}

/// Reads and decodes one fragment file.
pub fn load_fragment(file: &FragmentFile) -> Result<Contribution, LoaderError> {
    let script = std::fs::read_to_string(&file.path).map_err(|err| LoaderError::Io {
        path: file.path.clone(),
        message: err.to_string(),
    })?;
    decode_fragment(&script).map_err(|source| LoaderError::Fragment {
        path: file.path.clone(),
        source,
    })
}

/// Loads `files` in order and registers each decoded contribution.
///
/// Failed fragments are reported and skipped.
pub fn replay_into(registry: &mut ImplementorsRegistry<'_>, files: &[FragmentFile]) -> LoadReport {
    let mut report = LoadReport::default();
    for file in files {
        match load_fragment(file) {
            Ok(contribution) => {
                registry.register(contribution);
                report.registered.push(file.trait_path.clone());
            }
            Err(err) => {
                warn!(
                    "event=fragment_skipped module=loader status=error trait={} error={}",
                    file.trait_path, err
                );
                report.failures.push(err);
            }
        }
    }
    info!(
        "event=fragments_replayed module=loader registered={} failed={}",
        report.registered.len(),
        report.failures.len()
    );
    report
}
