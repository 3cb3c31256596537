//! Single-pass project tree traversal.
//!
//! Collects recognized manifests and lockfiles, plus files and directories
//! dropped by the Shai-Hulud campaign:
//!
//! | Artifact | Reported when |
//! |----------|---------------|
//! | `.truffler-cache/` | always |
//! | `extract/` | somewhere below `.truffler-cache` |
//! | `bun_environment.js` | always |
//! | `trufflehog`, `trufflehog.exe` | path contains `.truffler-cache` |
//!
//! TruffleHog is a legitimate secret scanner; a copy inside the attacker's
//! cache directory is the signal, a copy anywhere else is not.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::model::{ManifestFile, ManifestKind};

pub const CACHE_DIR: &str = ".truffler-cache";
pub const EXTRACT_DIR: &str = "extract";
pub const SCRIPT_ARTIFACT: &str = "bun_environment.js";
pub const SCANNER_TOOL_FILES: [&str; 2] = ["trufflehog", "trufflehog.exe"];

/// Everything one traversal found, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    pub manifests: Vec<ManifestFile>,
    pub artifact_files: Vec<PathBuf>,
    pub artifact_dirs: Vec<PathBuf>,
}

/// Walks `root` once. Entries are visited depth-first, sorted by name.
///
/// Unreadable entries are skipped; the walk itself never fails.
pub fn walk(root: &Path) -> WalkOutcome {
    let mut outcome = WalkOutcome::default();

    let entries = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                None
            }
        });

    for entry in entries {
        let path = entry.path();
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };

        // Links are not followed, but a link to a directory is still a directory.
        let is_dir = entry.file_type().is_dir() || (entry.path_is_symlink() && path.is_dir());
        if is_dir {
            if is_artifact_dir(path, name) {
                outcome.artifact_dirs.push(path.to_path_buf());
            }
            continue;
        }

        if let Some(kind) = ManifestKind::from_file_name(name) {
            outcome.manifests.push(ManifestFile::new(path, kind));
        }
        if is_artifact_file(path, name) {
            outcome.artifact_files.push(path.to_path_buf());
        }
    }

    tracing::info!(
        root = %root.display(),
        manifests = outcome.manifests.len(),
        artifact_files = outcome.artifact_files.len(),
        artifact_dirs = outcome.artifact_dirs.len(),
        "walk complete"
    );

    outcome
}

fn is_artifact_dir(path: &Path, name: &str) -> bool {
    if name == CACHE_DIR {
        return true;
    }
    name == EXTRACT_DIR && path.parent().is_some_and(under_cache_dir)
}

fn is_artifact_file(path: &Path, name: &str) -> bool {
    if name == SCRIPT_ARTIFACT {
        return true;
    }
    SCANNER_TOOL_FILES.contains(&name) && under_cache_dir(path)
}

fn under_cache_dir(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str() == OsStr::new(CACHE_DIR))
}
