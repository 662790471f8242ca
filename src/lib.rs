//! Outline extraction for CAPL sources.
//!
//! [`signature`] finds function and testcase declarations in raw text,
//! [`outline`] turns them into grouped, sorted, display-ready entries. The
//! remaining modules host that core: reading documents from disk, walking
//! a project tree, persisting the sort preference and writing results.

pub mod config;
pub mod config_paths;
pub mod document;
pub mod error;
pub mod exclusion;
pub mod file_reader;
pub mod glob;
pub mod logging;
pub mod models;
pub mod outline;
pub mod output;
pub mod scanner;
pub mod signature;
pub mod workspace;

pub use document::{Document, DocumentEvent, DocumentSource};
pub use error::OutlineError;
pub use outline::{OutlineEntry, OutlineGroup, OutlineModel, SortOrder};
pub use signature::{DeclarationKind, DeclarationRecord};
