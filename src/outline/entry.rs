use std::path::{Path, PathBuf};

use super::params::split_parameter_types;
use crate::document::LineIndex;
use crate::signature::{DeclarationKind, DeclarationRecord, VOID_TYPE};

/// Where an entry lives, addressable by a host editor (0-based line/col).
///
/// The span starts at the declaration and covers the matched signature
/// length; a signature whose brace sits on a later line runs past the end
/// of `line` and should be clamped by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineLocation {
    pub path: PathBuf,
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
}

/// Kind-specific payload of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryDetail {
    Function {
        name: String,
        return_type: String,
        parameters_raw: String,
        parameter_types: Vec<String>,
    },
    TestCase {
        name: String,
        exported: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub display_label: String,
    pub tooltip_text: String,
    pub location: OutlineLocation,
    pub detail: EntryDetail,
}

impl OutlineEntry {
    pub fn from_record(record: DeclarationRecord, lines: &LineIndex, path: &Path) -> Self {
        let (line, start_col) = lines.position(record.source_offset);
        let location = OutlineLocation {
            path: path.to_path_buf(),
            line,
            start_col,
            end_col: start_col + record.match_length,
        };

        match record.kind {
            DeclarationKind::Function => {
                let parameter_types = split_parameter_types(&record.parameters_raw);
                let display_label = format!(
                    "{}({}) : {}",
                    record.name,
                    parameter_types.join(", "),
                    record.return_type
                );
                let tooltip_text = format!(
                    "{}({}) : {}",
                    record.name, record.parameters_raw, record.return_type
                );
                OutlineEntry {
                    display_label,
                    tooltip_text,
                    location,
                    detail: EntryDetail::Function {
                        name: record.name,
                        return_type: record.return_type,
                        parameters_raw: record.parameters_raw,
                        parameter_types,
                    },
                }
            }
            DeclarationKind::TestCase => {
                let display_label = format!("{}() : {}", record.name, VOID_TYPE);
                let prefix = if record.is_exported { "Exported " } else { "" };
                let tooltip_text = format!("{}Testcase: {}() : {}", prefix, record.name, VOID_TYPE);
                OutlineEntry {
                    display_label,
                    tooltip_text,
                    location,
                    detail: EntryDetail::TestCase {
                        name: record.name,
                        exported: record.is_exported,
                    },
                }
            }
        }
    }

    pub fn group_kind(&self) -> DeclarationKind {
        match self.detail {
            EntryDetail::Function { .. } => DeclarationKind::Function,
            EntryDetail::TestCase { .. } => DeclarationKind::TestCase,
        }
    }

    pub fn name(&self) -> &str {
        match &self.detail {
            EntryDetail::Function { name, .. } | EntryDetail::TestCase { name, .. } => name,
        }
    }

    pub fn return_type(&self) -> &str {
        match &self.detail {
            EntryDetail::Function { return_type, .. } => return_type,
            EntryDetail::TestCase { .. } => VOID_TYPE,
        }
    }

    pub fn parameter_types(&self) -> &[String] {
        match &self.detail {
            EntryDetail::Function { parameter_types, .. } => parameter_types,
            EntryDetail::TestCase { .. } => &[],
        }
    }

    pub fn is_exported(&self) -> bool {
        matches!(self.detail, EntryDetail::TestCase { exported: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::scan;

    fn entries(text: &str, kind: DeclarationKind) -> Vec<OutlineEntry> {
        let lines = LineIndex::new(text);
        scan(text, kind)
            .into_iter()
            .map(|r| OutlineEntry::from_record(r, &lines, Path::new("node.can")))
            .collect()
    }

    #[test]
    fn function_label_uses_decomposed_types() {
        let e = &entries("void foo(int a, struct Bar b) {", DeclarationKind::Function)[0];
        assert_eq!(e.display_label, "foo(int, struct Bar) : void");
        assert_eq!(e.tooltip_text, "foo(int a, struct Bar b) : void");
        assert_eq!(e.group_kind(), DeclarationKind::Function);
        assert_eq!(e.parameter_types(), ["int", "struct Bar"]);
    }

    #[test]
    fn function_without_parameters() {
        let e = &entries("long now() {", DeclarationKind::Function)[0];
        assert_eq!(e.display_label, "now() : long");
        assert!(e.parameter_types().is_empty());
    }

    #[test]
    fn exported_testcase_label_and_tooltip() {
        let e = &entries("export testcase MyTest() {", DeclarationKind::TestCase)[0];
        assert_eq!(e.display_label, "MyTest() : void");
        assert!(e.tooltip_text.starts_with("Exported"));
        assert_eq!(e.tooltip_text, "Exported Testcase: MyTest() : void");
        assert!(e.is_exported());
        assert_eq!(e.return_type(), "void");
        assert!(e.parameter_types().is_empty());
    }

    #[test]
    fn plain_testcase_tooltip() {
        let e = &entries("testcase Smoke() {", DeclarationKind::TestCase)[0];
        assert_eq!(e.tooltip_text, "Testcase: Smoke() : void");
        assert!(!e.is_exported());
    }

    #[test]
    fn location_spans_signature_on_its_line() {
        let text = "variables {\n}\n  int sum(int a) {\n}";
        let e = &entries(text, DeclarationKind::Function)[0];
        assert_eq!(e.location.path, PathBuf::from("node.can"));
        assert_eq!(e.location.line, 2);
        assert_eq!(e.location.start_col, 2);
        assert_eq!(e.location.end_col, 2 + "int sum(int a) {".len());
    }
}
