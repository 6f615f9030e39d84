//! Name-based exclusion and file discovery.
//!
//! Exclusions are literal names, not glob patterns. A directory name matches
//! any path component below the root, so the whole subtree is pruned; a file
//! name matches the base name of a file only.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::FilecollectError;
use crate::Result;

/// Directory names excluded unless the caller opts out.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    "__pycache__",
    "node_modules",
    ".vim",
    ".idea",
    ".vscode",
    "target",
    "dist",
    "build",
];

/// Names to leave out of a collection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeConfig {
    /// Directory names; matched against every path component below the root
    pub dirs: BTreeSet<String>,
    /// File names; matched against the base name of each file
    pub files: BTreeSet<String>,
}

impl ExcludeConfig {
    /// Create an empty config (nothing excluded).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config seeded with [`DEFAULT_EXCLUDE_DIRS`].
    pub fn with_defaults() -> Self {
        Self::new().exclude_dirs_many(DEFAULT_EXCLUDE_DIRS.iter().copied())
    }

    /// Add a directory name.
    pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
        self.dirs.insert(name.into());
        self
    }

    /// Add a file name.
    pub fn exclude_file(mut self, name: impl Into<String>) -> Self {
        self.files.insert(name.into());
        self
    }

    /// Add multiple directory names.
    pub fn exclude_dirs_many<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self = self.exclude_dir(name);
        }
        self
    }

    /// Add multiple file names.
    pub fn exclude_files_many<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self = self.exclude_file(name);
        }
        self
    }

    pub fn is_dir_excluded(&self, name: &str) -> bool {
        self.dirs.contains(name)
    }

    pub fn is_file_excluded(&self, name: &str) -> bool {
        self.files.contains(name)
    }

    /// Excluded directory names in sorted order.
    pub fn sorted_dirs(&self) -> Vec<&str> {
        self.dirs.iter().map(String::as_str).collect()
    }
}

/// One eligible entry found by [`discover_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovered {
    /// A file to read
    File(PathBuf),
    /// An entry the walk itself could not inspect
    Failed { path: PathBuf, message: String },
}

impl Discovered {
    pub fn path(&self) -> &Path {
        match self {
            Discovered::File(path) => path,
            Discovered::Failed { path, .. } => path,
        }
    }
}

/// Check a name against the directory exclusions.
///
/// Applied to every entry below the root, files included, which is what makes
/// a match on any path component hide the whole subtree.
fn should_prune(name: Option<&str>, exclude: &ExcludeConfig) -> bool {
    name.is_some_and(|n| exclude.is_dir_excluded(n))
}

/// Discover the files to collect under `root`.
///
/// Directories (and symlinks to directories) are walked or skipped, never
/// returned. The result is sorted by path.
pub fn discover_files(root: impl AsRef<Path>, exclude: &ExcludeConfig) -> Result<Vec<Discovered>> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(FilecollectError::SourceNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(FilecollectError::NotADirectory(root.to_path_buf()));
    }

    let mut found = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker.filter_entry(|e| {
        // Always include the root directory
        if e.depth() == 0 {
            return true;
        }
        if should_prune(e.file_name().to_str(), exclude) {
            debug!(path = %e.path().display(), "excluded by directory name");
            return false;
        }
        true
    }) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                warn!(path = %path.display(), error = %err, "walk error");
                found.push(Discovered::Failed {
                    path,
                    message: err.to_string(),
                });
                continue;
            }
        };

        let path = entry.path();

        // Follows symlinks, so links to directories are skipped too
        if path.is_dir() {
            continue;
        }

        if entry
            .file_name()
            .to_str()
            .is_some_and(|n| exclude.is_file_excluded(n))
        {
            debug!(path = %path.display(), "excluded by file name");
            continue;
        }

        found.push(Discovered::File(path.to_path_buf()));
    }

    // Sort for deterministic output
    found.sort_by(|a, b| a.path().cmp(b.path()));

    Ok(found)
}
