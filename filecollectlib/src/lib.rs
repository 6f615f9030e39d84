//! # filecollectlib
//!
//! Collect the text of every file in a directory tree into a single document,
//! each file introduced by its path relative to the root.
//!
//! ## Overview
//!
//! A run walks the root in sorted order, leaves out excluded names, reads each
//! remaining file as UTF-8 (dropping undecodable bytes), and writes all
//! entries to one output file:
//!
//! ```text
//! a.txt
//! <contents of a.txt>
//!
//! sub/b.txt
//! <contents of sub/b.txt>
//! ```
//!
//! ## Features
//!
//! - **Literal exclusions**: directory names prune whole subtrees, file names
//!   match base names; no glob patterns
//! - **Best-effort decoding**: invalid UTF-8 is dropped, the file is kept
//! - **Self-exclusion**: the output file's name is never collected, so re-runs
//!   produce identical output
//! - **Pure data types**: per-file outcomes and counters are returned, not
//!   printed
//!
//! ## Example
//!
//! ```rust
//! use filecollectlib::{collect_files, CollectOptions, ExcludeConfig};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::create_dir(dir.path().join("sub")).unwrap();
//! fs::write(dir.path().join("a.txt"), "alpha").unwrap();
//! fs::write(dir.path().join("sub").join("b.txt"), "beta").unwrap();
//!
//! let output = dir.path().join("all_files.txt");
//! let options = CollectOptions::new().exclude(ExcludeConfig::with_defaults());
//! let report = collect_files(dir.path(), &output, options).unwrap();
//!
//! assert_eq!(report.stats.collected, 2);
//! assert!(fs::read_to_string(&output).unwrap().starts_with("a.txt\nalpha\n\n"));
//! ```

pub mod collector;
pub mod error;
pub mod reader;
pub mod source;
pub mod stats;

pub use collector::{
    collect_entries, collect_files, resolve_root, write_output, CollectOptions, CollectReport,
    CollectResult, Entry, FileOutcome, ENTRY_SEPARATOR,
};
pub use error::FilecollectError;
pub use reader::{decode_lossy, read_text_lossy};
pub use source::{discover_files, Discovered, ExcludeConfig, DEFAULT_EXCLUDE_DIRS};
pub use stats::{format_size, CollectStats};

/// Result type for filecollectlib operations
pub type Result<T> = std::result::Result<T, FilecollectError>;
