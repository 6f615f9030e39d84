//! High-level collection API.
//!
//! This module provides the main entry points for a run: resolve the root,
//! walk it, read every eligible file, and write the joined entries to a
//! single output file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::FilecollectError;
use crate::reader::read_text_lossy;
use crate::source::{discover_files, Discovered, ExcludeConfig};
use crate::stats::CollectStats;
use crate::Result;

/// Separator placed between two entries in the output.
pub const ENTRY_SEPARATOR: &str = "\n\n";

/// Options for a collection run.
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Names to leave out
    pub exclude: ExcludeConfig,
}

impl CollectOptions {
    /// Create new default options (nothing excluded).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exclusion config.
    pub fn exclude(mut self, exclude: ExcludeConfig) -> Self {
        self.exclude = exclude;
        self
    }

    /// Exclude the base name of `output` so a run never reads back its own
    /// previous output.
    pub fn excluding_output(mut self, output: impl AsRef<Path>) -> Self {
        if let Some(name) = output.as_ref().file_name() {
            self.exclude = self.exclude.exclude_file(name.to_string_lossy());
        }
        self
    }
}

/// One collected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Path relative to the root, used as the entry header
    pub label: String,
    /// Decoded text content
    pub content: String,
}

/// What happened to a single visited file, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Collected { label: String },
    Skipped { label: String, reason: String },
}

impl FileOutcome {
    pub fn label(&self) -> &str {
        match self {
            FileOutcome::Collected { label } => label,
            FileOutcome::Skipped { label, .. } => label,
        }
    }

    pub fn is_collected(&self) -> bool {
        matches!(self, FileOutcome::Collected { .. })
    }
}

/// Everything gathered by [`collect_entries`], before anything is written.
#[derive(Debug, Clone, Default)]
pub struct CollectResult {
    /// Resolved root directory
    pub root: PathBuf,
    /// Collected entries in path order
    pub entries: Vec<Entry>,
    /// Per-file outcomes in path order
    pub outcomes: Vec<FileOutcome>,
    /// Counters (`output_bytes` stays zero until written)
    pub stats: CollectStats,
}

impl CollectResult {
    /// Join all entries into the output document.
    ///
    /// Each entry is `"{label}\n{content}"`; entries are separated by
    /// [`ENTRY_SEPARATOR`].
    pub fn render(&self) -> String {
        let capacity = self
            .entries
            .iter()
            .map(|e| e.label.len() + 1 + e.content.len() + ENTRY_SEPARATOR.len())
            .sum();
        let mut out = String::with_capacity(capacity);

        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push_str(ENTRY_SEPARATOR);
            }
            out.push_str(&entry.label);
            out.push('\n');
            out.push_str(&entry.content);
        }
        out
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct CollectReport {
    pub root: PathBuf,
    pub output: PathBuf,
    pub outcomes: Vec<FileOutcome>,
    pub stats: CollectStats,
    /// `stats.output_bytes` in human units
    pub output_size: String,
}

impl CollectReport {
    pub fn new(result: CollectResult, output: impl Into<PathBuf>, output_bytes: u64) -> Self {
        let mut stats = result.stats;
        stats.output_bytes = output_bytes;
        Self {
            root: result.root,
            output: output.into(),
            outcomes: result.outcomes,
            stats,
            output_size: stats.output_size(),
        }
    }
}

/// Check that `source` is an existing directory and return its absolute form.
pub fn resolve_root(source: impl AsRef<Path>) -> Result<PathBuf> {
    let source = source.as_ref();

    if !source.exists() {
        return Err(FilecollectError::SourceNotFound(source.to_path_buf()));
    }
    if !source.is_dir() {
        return Err(FilecollectError::NotADirectory(source.to_path_buf()));
    }

    Ok(fs::canonicalize(source)?)
}

/// Label for a path: relative to `root`, or the path itself outside it.
fn relative_label(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| path.to_string_lossy().to_string())
}

/// Reason text for a skipped file.
fn skip_reason(err: &FilecollectError) -> String {
    match err {
        FilecollectError::FileRead { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}

/// Walk `root` and read every eligible file into memory.
///
/// Files that cannot be read are recorded as [`FileOutcome::Skipped`] and
/// counted; only a bad root is an error.
///
/// # Example
///
/// ```rust,ignore
/// use filecollectlib::{collect_entries, ExcludeConfig};
///
/// let result = collect_entries(".", &ExcludeConfig::with_defaults())?;
/// println!("{} files", result.stats.collected);
/// ```
pub fn collect_entries(root: impl AsRef<Path>, exclude: &ExcludeConfig) -> Result<CollectResult> {
    let root = resolve_root(root)?;
    let found = discover_files(&root, exclude)?;

    Ok(read_discovered(root, found))
}

/// Read each discovered file, turning every failure into a skipped outcome.
fn read_discovered(root: PathBuf, found: Vec<Discovered>) -> CollectResult {
    let mut result = CollectResult {
        root,
        ..Default::default()
    };

    for item in found {
        let label = relative_label(item.path(), &result.root);

        let read = match item {
            Discovered::File(path) => read_text_lossy(&path).map(|content| (path, content)),
            Discovered::Failed { path, message } => {
                result.stats.skipped += 1;
                result.outcomes.push(FileOutcome::Skipped {
                    label,
                    reason: message,
                });
                debug!(path = %path.display(), "skipped unreadable entry");
                continue;
            }
        };

        match read {
            Ok((path, content)) => {
                debug!(path = %path.display(), bytes = content.len(), "collected");
                result.stats.collected += 1;
                result.outcomes.push(FileOutcome::Collected {
                    label: label.clone(),
                });
                result.entries.push(Entry {
                    path,
                    label,
                    content,
                });
            }
            Err(err) => {
                warn!(error = %err, "skipping file");
                result.stats.skipped += 1;
                result.outcomes.push(FileOutcome::Skipped {
                    reason: skip_reason(&err),
                    label,
                });
            }
        }
    }

    result
}

/// Write the joined entries to `output` in a single call, overwriting it.
///
/// Returns the number of bytes written.
pub fn write_output(result: &CollectResult, output: impl AsRef<Path>) -> Result<u64> {
    let output = output.as_ref();
    let rendered = result.render();

    fs::write(output, &rendered).map_err(|source| FilecollectError::OutputWrite {
        path: output.to_path_buf(),
        source,
    })?;
    let size = rendered.len() as u64;

    info!(path = %output.display(), bytes = size, "wrote output");
    Ok(size)
}

/// Run a full collection: walk `root`, then write every entry to `output`.
///
/// The output's base name is always excluded. Nothing is written when the
/// root is invalid.
///
/// # Example
///
/// ```rust,ignore
/// use filecollectlib::{collect_files, CollectOptions, ExcludeConfig};
///
/// let options = CollectOptions::new().exclude(ExcludeConfig::with_defaults());
/// let report = collect_files(".", "all_files.txt", options)?;
/// println!("{} ({})", report.stats.collected, report.output_size);
/// ```
pub fn collect_files(
    root: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: CollectOptions,
) -> Result<CollectReport> {
    let output = output.as_ref();
    let options = options.excluding_output(output);

    let result = collect_entries(root, &options.exclude)?;
    let size = write_output(&result, output)?;

    Ok(CollectReport::new(result, output, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn defaults() -> CollectOptions {
        CollectOptions::new().exclude(ExcludeConfig::with_defaults())
    }

    #[test]
    fn test_collects_in_path_order() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("project");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub/b.txt"), "bee").unwrap();
        fs::write(root.join("a.txt"), "ay").unwrap();
        let output = temp.path().join("out.txt");

        let report = collect_files(&root, &output, defaults()).unwrap();

        let sub_b = Path::new("sub").join("b.txt");
        let expected = format!("a.txt\nay\n\n{}\nbee", sub_b.display());
        assert_eq!(fs::read_to_string(&output).unwrap(), expected);
        assert_eq!(report.stats.collected, 2);
        assert_eq!(report.stats.skipped, 0);
        assert_eq!(report.stats.output_bytes, expected.len() as u64);
        assert_eq!(report.output_size, format!("{} B", expected.len()));
    }

    #[test]
    fn test_excluded_directory_at_depth() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("pkg/build/nested")).unwrap();
        fs::write(root.join("pkg/build/nested/gen.txt"), "gen").unwrap();
        fs::write(root.join("pkg/keep.txt"), "keep").unwrap();

        let result = collect_entries(root, &ExcludeConfig::new().exclude_dir("build")).unwrap();

        assert_eq!(result.entries.len(), 1);
        assert!(result.entries[0].label.ends_with("keep.txt"));
    }

    #[test]
    fn test_excluded_file_in_kept_directory() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/secret.env"), "KEY=1").unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();

        let exclude = ExcludeConfig::with_defaults().exclude_file("secret.env");
        let result = collect_entries(root, &exclude).unwrap();

        let labels: Vec<&str> = result.outcomes.iter().map(|o| o.label()).collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].ends_with("main.rs"));
    }

    #[test]
    fn test_output_inside_root_is_idempotent() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("one.txt"), "1").unwrap();
        fs::write(root.join("two.txt"), "2").unwrap();
        let output = root.join("all_files.txt");

        collect_files(root, &output, defaults()).unwrap();
        let first = fs::read(&output).unwrap();
        let report = collect_files(root, &output, defaults()).unwrap();
        let second = fs::read(&output).unwrap();

        assert_eq!(first, second);
        assert_eq!(report.stats.collected, 2);
        assert!(!String::from_utf8(second).unwrap().contains("all_files.txt"));
    }

    #[test]
    fn test_missing_source_writes_nothing() {
        let temp = tempdir().unwrap();
        let output = temp.path().join("out.txt");

        let result = collect_files(temp.path().join("missing"), &output, defaults());

        assert!(matches!(result, Err(FilecollectError::SourceNotFound(_))));
        assert!(result.unwrap_err().is_configuration());
        assert!(!output.exists());
    }

    #[test]
    fn test_source_is_a_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let output = temp.path().join("out.txt");

        let result = collect_files(&file, &output, defaults());

        assert!(matches!(result, Err(FilecollectError::NotADirectory(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_invalid_utf8_is_kept_without_bad_bytes() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("bin.dat"), [b'o', b'k', 0xff, 0xfe, b'!']).unwrap();

        let result = collect_entries(root, &ExcludeConfig::new()).unwrap();

        assert_eq!(result.stats.collected, 1);
        assert_eq!(result.entries[0].content, "ok!");
    }

    #[test]
    fn test_without_defaults_git_is_collected() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join(".git/config"), "[core]").unwrap();

        let with_defaults = collect_entries(root, &ExcludeConfig::with_defaults()).unwrap();
        let without = collect_entries(root, &ExcludeConfig::new()).unwrap();

        assert!(with_defaults.entries.is_empty());
        assert_eq!(without.entries.len(), 1);
        assert_eq!(without.entries[0].content, "[core]");
    }

    #[test]
    fn test_empty_root_writes_empty_file() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("empty");
        fs::create_dir_all(&root).unwrap();
        let output = temp.path().join("out.txt");

        let report = collect_files(&root, &output, defaults()).unwrap();

        assert_eq!(report.stats.collected, 0);
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
        assert_eq!(report.output_size, "0 B");
    }

    #[test]
    fn test_output_write_failure() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        let output = temp.path().join("no/such/dir/out.txt");

        let result = collect_files(temp.path(), &output, defaults());

        assert!(matches!(result, Err(FilecollectError::OutputWrite { .. })));
    }

    #[test]
    fn test_excluding_output_uses_base_name() {
        let options = CollectOptions::new().excluding_output("some/dir/report.txt");

        assert!(options.exclude.is_file_excluded("report.txt"));
        assert!(!options.exclude.is_file_excluded("some/dir/report.txt"));
    }

    #[test]
    fn test_render_joins_with_blank_line() {
        let entry = |label: &str, content: &str| Entry {
            path: PathBuf::from(label),
            label: label.to_string(),
            content: content.to_string(),
        };
        let result = CollectResult {
            entries: vec![entry("a", "1\n"), entry("b", ""), entry("c", "3")],
            ..Default::default()
        };

        assert_eq!(result.render(), "a\n1\n\n\nb\n\n\nc\n3");
        assert_eq!(CollectResult::default().render(), "");
    }

    #[test]
    fn test_write_output_reports_bytes_written() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "héllo").unwrap();
        let output = temp.path().join("out.txt");

        let result = collect_entries(temp.path(), &ExcludeConfig::new()).unwrap();
        let size = write_output(&result, &output).unwrap();

        assert_eq!(size, "a.txt\nhéllo".len() as u64);
        assert_eq!(size, fs::metadata(&output).unwrap().len());
    }

    #[test]
    fn test_walk_failure_is_counted_and_run_continues() {
        let temp = tempdir().unwrap();
        let root = temp.path().to_path_buf();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("c.txt"), "c").unwrap();

        let found = vec![
            Discovered::File(root.join("a.txt")),
            Discovered::Failed {
                path: root.join("b"),
                message: "Permission denied (os error 13)".to_string(),
            },
            Discovered::File(root.join("c.txt")),
        ];
        let result = read_discovered(root, found);

        assert_eq!(result.stats.collected, 2);
        assert_eq!(result.stats.skipped, 1);
        assert_eq!(
            result.outcomes[1],
            FileOutcome::Skipped {
                label: "b".to_string(),
                reason: "Permission denied (os error 13)".to_string(),
            }
        );
        assert_eq!(result.render(), "a.txt\na\n\nc.txt\nc");
    }

    #[cfg(unix)]
    fn make_fifo(path: &Path) {
        let status = std::process::Command::new("mkfifo")
            .arg(path)
            .status()
            .expect("failed to run mkfifo");
        assert!(status.success());
    }

    #[cfg(unix)]
    fn skip_reason_of<'a>(result: &'a CollectResult, name: &str) -> &'a str {
        result
            .outcomes
            .iter()
            .find_map(|o| match o {
                FileOutcome::Skipped { label, reason } if label == name => Some(reason.as_str()),
                _ => None,
            })
            .unwrap_or_else(|| panic!("{name} was not skipped: {:?}", result.outcomes))
    }

    #[cfg(unix)]
    #[test]
    fn test_special_files_and_bad_links_are_skipped() {
        use std::os::unix::fs::symlink;

        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), "a").unwrap();
        symlink(root.join("missing.txt"), root.join("dangling")).unwrap();
        symlink(root.join("loop_b"), root.join("loop_a")).unwrap();
        symlink(root.join("loop_a"), root.join("loop_b")).unwrap();
        make_fifo(&root.join("pipe"));

        let result = collect_entries(root, &ExcludeConfig::new()).unwrap();

        assert_eq!(result.stats.collected, 1);
        assert_eq!(result.stats.skipped, 4);
        assert_eq!(result.entries[0].label, "a.txt");
        assert_eq!(skip_reason_of(&result, "pipe"), "not a regular file");
        assert!(skip_reason_of(&result, "dangling").contains("os error 2"));
        assert!(skip_reason_of(&result, "loop_a").contains("os error"));
        assert!(skip_reason_of(&result, "loop_b").contains("os error"));
    }

    #[test]
    fn test_outcome_accessors() {
        let skipped = FileOutcome::Skipped {
            label: "x.txt".to_string(),
            reason: "denied".to_string(),
        };
        let collected = FileOutcome::Collected {
            label: "y.txt".to_string(),
        };

        assert_eq!(skipped.label(), "x.txt");
        assert!(!skipped.is_collected());
        assert!(collected.is_collected());
    }
}
