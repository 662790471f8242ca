//! Host-facing document interfaces.
//!
//! The outline only ever sees an immutable [`Document`] snapshot taken when
//! a query runs. Hosts provide the snapshot through [`DocumentSource`] and
//! report editor activity as [`DocumentEvent`]s.

use std::path::{Path, PathBuf};

use crate::error::OutlineError;
use crate::file_reader;

/// File extensions treated as CAPL sources. Matching is case-sensitive.
pub const CAPL_EXTENSIONS: &[&str] = &["can", "cin"];

pub fn is_capl_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CAPL_EXTENSIONS.contains(&ext))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn is_capl(&self) -> bool {
        is_capl_path(&self.path)
    }
}

/// Accessor for the document the outline should describe.
pub trait DocumentSource {
    /// Snapshot of the active document, or `None` when nothing is open.
    fn active_document(&self) -> Option<Document>;
}

impl DocumentSource for Document {
    fn active_document(&self) -> Option<Document> {
        Some(self.clone())
    }
}

impl DocumentSource for Option<Document> {
    fn active_document(&self) -> Option<Document> {
        self.clone()
    }
}

/// A document backed by a file, re-read on every query.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current contents. Binary files yield `Ok(None)`.
    pub fn load(&self) -> Result<Option<Document>, OutlineError> {
        let text = file_reader::read_document(&self.path)?;
        Ok(text.map(|text| Document::new(self.path.clone(), text)))
    }
}

impl DocumentSource for FileDocument {
    fn active_document(&self) -> Option<Document> {
        match self.load() {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }
}

/// Editor activity that can invalidate the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    ActiveSwitched(PathBuf),
    TextChanged(PathBuf),
}

impl DocumentEvent {
    pub fn path(&self) -> &Path {
        match self {
            DocumentEvent::ActiveSwitched(path) | DocumentEvent::TextChanged(path) => path,
        }
    }
}

/// Maps character offsets to 0-based (line, column) pairs.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in text.chars().enumerate() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        (line, offset - self.line_starts[line])
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capl_extensions() {
        assert!(is_capl_path(Path::new("node/Gateway.can")));
        assert!(is_capl_path(Path::new("include/helpers.cin")));
        assert!(!is_capl_path(Path::new("main.c")));
        assert!(!is_capl_path(Path::new("Gateway.CAN")));
        assert!(!is_capl_path(Path::new("can")));
    }

    #[test]
    fn option_source_passes_through() {
        let none: Option<Document> = None;
        assert!(none.active_document().is_none());
        let some = Some(Document::new("a.can", "x"));
        assert_eq!(some.active_document().unwrap().text, "x");
    }

    #[test]
    fn file_document_missing_is_none() {
        let doc = FileDocument::new("/no/such/dir/test.can");
        assert!(doc.active_document().is_none());
        assert!(doc.load().is_err());
    }

    #[test]
    fn event_path() {
        let event = DocumentEvent::TextChanged(PathBuf::from("a.cin"));
        assert_eq!(event.path(), Path::new("a.cin"));
    }

    #[test]
    fn line_index_positions() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.position(0), (0, 0));
        assert_eq!(index.position(2), (0, 2));
        assert_eq!(index.position(3), (1, 0));
        assert_eq!(index.position(7), (3, 0));
        assert_eq!(index.position(8), (3, 1));
    }

    #[test]
    fn line_index_counts_characters() {
        let index = LineIndex::new("ä\nö");
        assert_eq!(index.position(2), (1, 0));
    }
}
