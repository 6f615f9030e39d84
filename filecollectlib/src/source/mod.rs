//! Source discovery: find files to collect.
//!
//! This module handles the first stage of a run - deciding which files under
//! the root are eligible. It provides:
//!
//! - **Exclusion sets**: literal directory and file names to leave out
//! - **File discovery**: a sorted walk that prunes excluded subtrees
//!
//! ## Example
//!
//! ```rust,ignore
//! use filecollectlib::source::{discover_files, ExcludeConfig};
//!
//! let exclude = ExcludeConfig::with_defaults().exclude_file("Cargo.lock");
//! let found = discover_files(".", &exclude)?;
//! ```

pub mod filter;

pub use filter::{discover_files, Discovered, ExcludeConfig, DEFAULT_EXCLUDE_DIRS};
