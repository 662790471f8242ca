use std::io::{self, BufWriter, Write};

use crate::models::{DocumentOutline, GroupOutline, MetaInfo, OutputEnvelope};
use crate::outline::{EntryDetail, OutlineEntry};
use crate::signature::DeclarationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

pub fn write_output(envelope: &OutputEnvelope, format: OutputFormat) {
    let stdout = io::stdout();
    let mut w = BufWriter::with_capacity(64 * 1024, stdout.lock());
    let result = match format {
        OutputFormat::Yaml => write_envelope_yaml(&mut w, envelope),
        OutputFormat::Json => write_envelope_json(&mut w, envelope),
    };
    if let Err(e) = result.and_then(|_| w.flush()) {
        tracing::debug!("stdout closed early: {}", e);
    }
}

fn group_key(kind: DeclarationKind) -> &'static str {
    match kind {
        DeclarationKind::TestCase => "testcases",
        DeclarationKind::Function => "functions",
    }
}

// ── YAML output ──

pub fn write_envelope_yaml(w: &mut impl Write, envelope: &OutputEnvelope) -> io::Result<()> {
    if let Some(ref meta) = envelope.meta {
        write_meta(w, meta)?;
    }
    if let Some(ref error) = envelope.error {
        write!(w, "error: ")?;
        write_inline_string(w, error)?;
        writeln!(w)?;
    }
    if let Some(ref documents) = envelope.documents {
        if !documents.is_empty() {
            writeln!(w, "documents:")?;
            for doc in documents {
                write_document(w, doc)?;
            }
        }
    }
    Ok(())
}

fn write_meta(w: &mut impl Write, meta: &MetaInfo) -> io::Result<()> {
    writeln!(w, "meta:")?;
    if meta.elapsed_ms != 0 {
        writeln!(w, "  elapsedMs: {}", meta.elapsed_ms)?;
    }
    if meta.timeout {
        writeln!(w, "  timeout: true")?;
    }
    writeln!(w, "  filesScanned: {}", meta.files_scanned)?;
    writeln!(w, "  filesOutlined: {}", meta.files_outlined)?;
    writeln!(w, "  declarations: {}", meta.declarations)?;
    writeln!(w, "  sortOrder: {}", meta.sort_order)?;
    Ok(())
}

fn write_document(w: &mut impl Write, doc: &DocumentOutline) -> io::Result<()> {
    write!(w, "- path: ")?;
    write_inline_string(w, &doc.path)?;
    writeln!(w)?;

    if let Some(ref error) = doc.error {
        write!(w, "  error: ")?;
        write_inline_string(w, error)?;
        writeln!(w)?;
    }

    for group in &doc.groups {
        write_group(w, group)?;
    }
    Ok(())
}

fn write_group(w: &mut impl Write, group: &GroupOutline) -> io::Result<()> {
    let key = group_key(group.group.kind);
    if group.entries.is_empty() {
        return writeln!(w, "  {}: []", key);
    }
    writeln!(w, "  {}:", key)?;
    for entry in &group.entries {
        write_entry(w, entry)?;
    }
    Ok(())
}

fn write_entry(w: &mut impl Write, entry: &OutlineEntry) -> io::Result<()> {
    write!(w, "  - name: ")?;
    write_inline_string(w, entry.name())?;
    writeln!(w)?;
    write!(w, "    label: ")?;
    write_inline_string(w, &entry.display_label)?;
    writeln!(w)?;
    write!(w, "    tooltip: ")?;
    write_inline_string(w, &entry.tooltip_text)?;
    writeln!(w)?;
    writeln!(w, "    line: {}", entry.location.line + 1)?;
    writeln!(w, "    column: {}", entry.location.start_col + 1)?;
    writeln!(w, "    length: {}", entry.location.end_col - entry.location.start_col)?;

    match &entry.detail {
        EntryDetail::Function { return_type, parameter_types, .. } => {
            write!(w, "    returnType: ")?;
            write_inline_string(w, return_type)?;
            writeln!(w)?;
            if parameter_types.is_empty() {
                writeln!(w, "    params: []")?;
            } else {
                writeln!(w, "    params:")?;
                for ty in parameter_types {
                    write!(w, "    - ")?;
                    write_inline_string(w, ty)?;
                    writeln!(w)?;
                }
            }
        }
        EntryDetail::TestCase { exported, .. } => {
            if *exported {
                writeln!(w, "    exported: true")?;
            }
        }
    }
    Ok(())
}

/// Leading characters that YAML would read as an indicator.
const YAML_INDICATORS: &str = "-[]{}'\"!&*|>%@`,?# ";

/// Plain scalars YAML would resolve to something other than a string.
const YAML_RESERVED: &[&str] = &["true", "false", "null", "yes", "no", "on", "off", "~"];

fn write_inline_string(w: &mut impl Write, value: &str) -> io::Result<()> {
    if value.is_empty() {
        write!(w, "''")
    } else if needs_quoting(value) {
        write_quoted(w, value)
    } else {
        w.write_all(value.as_bytes())
    }
}

fn needs_quoting(value: &str) -> bool {
    value.starts_with(|c: char| YAML_INDICATORS.contains(c))
        || value.ends_with(' ')
        || value.contains([':', '#', '\n', '\r', '\t'])
        || YAML_RESERVED.iter().any(|r| value.eq_ignore_ascii_case(r))
        || value.parse::<f64>().is_ok()
}

/// Double-quoted string with escapes valid in both YAML and JSON.
fn write_quoted(w: &mut impl Write, value: &str) -> io::Result<()> {
    w.write_all(b"\"")?;
    let mut plain_from = 0;
    for (i, c) in value.char_indices() {
        let escape = match c {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            c if (c as u32) < 0x20 => "",
            _ => continue,
        };
        w.write_all(value[plain_from..i].as_bytes())?;
        if escape.is_empty() {
            write!(w, "\\u{:04x}", c as u32)?;
        } else {
            w.write_all(escape.as_bytes())?;
        }
        plain_from = i + c.len_utf8();
    }
    w.write_all(value[plain_from..].as_bytes())?;
    w.write_all(b"\"")
}

// ── JSON output ──

pub fn write_envelope_json(w: &mut impl Write, envelope: &OutputEnvelope) -> io::Result<()> {
    write!(w, "{{")?;
    let mut first = true;
    if let Some(ref meta) = envelope.meta {
        json_comma(w, &mut first)?;
        write_meta_json(w, meta)?;
    }
    if let Some(ref error) = envelope.error {
        json_comma(w, &mut first)?;
        write!(w, "\"error\":")?;
        write_quoted(w, error)?;
    }
    if let Some(ref documents) = envelope.documents {
        json_comma(w, &mut first)?;
        write!(w, "\"documents\":[")?;
        for (i, doc) in documents.iter().enumerate() {
            if i > 0 { write!(w, ",")?; }
            write_document_json(w, doc)?;
        }
        write!(w, "]")?;
    }
    writeln!(w, "}}")
}

fn json_comma(w: &mut impl Write, first: &mut bool) -> io::Result<()> {
    if *first { *first = false; } else { write!(w, ",")?; }
    Ok(())
}

fn write_meta_json(w: &mut impl Write, meta: &MetaInfo) -> io::Result<()> {
    write!(w, "\"meta\":{{\"elapsedMs\":{},\"timeout\":{},\"filesScanned\":{},\"filesOutlined\":{},\"declarations\":{},\"sortOrder\":\"{}\"}}",
        meta.elapsed_ms, meta.timeout, meta.files_scanned, meta.files_outlined, meta.declarations, meta.sort_order)
}

fn write_document_json(w: &mut impl Write, doc: &DocumentOutline) -> io::Result<()> {
    write!(w, "{{\"path\":")?;
    write_quoted(w, &doc.path)?;
    if let Some(ref error) = doc.error {
        write!(w, ",\"error\":")?;
        write_quoted(w, error)?;
    }
    for group in &doc.groups {
        write!(w, ",\"{}\":[", group_key(group.group.kind))?;
        for (i, entry) in group.entries.iter().enumerate() {
            if i > 0 { write!(w, ",")?; }
            write_entry_json(w, entry)?;
        }
        write!(w, "]")?;
    }
    write!(w, "}}")
}

fn write_entry_json(w: &mut impl Write, entry: &OutlineEntry) -> io::Result<()> {
    write!(w, "{{\"name\":")?;
    write_quoted(w, entry.name())?;
    write!(w, ",\"label\":")?;
    write_quoted(w, &entry.display_label)?;
    write!(w, ",\"tooltip\":")?;
    write_quoted(w, &entry.tooltip_text)?;
    write!(w, ",\"line\":{},\"column\":{},\"length\":{}",
        entry.location.line + 1,
        entry.location.start_col + 1,
        entry.location.end_col - entry.location.start_col)?;

    match &entry.detail {
        EntryDetail::Function { return_type, parameter_types, .. } => {
            write!(w, ",\"returnType\":")?;
            write_quoted(w, return_type)?;
            write!(w, ",\"params\":[")?;
            for (i, ty) in parameter_types.iter().enumerate() {
                if i > 0 { write!(w, ",")?; }
                write_quoted(w, ty)?;
            }
            write!(w, "]")?;
        }
        EntryDetail::TestCase { exported, .. } => {
            write!(w, ",\"exported\":{}", exported)?;
        }
    }
    write!(w, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::outline::{outline_document, SortOrder, GROUPS};

    fn sample_envelope() -> OutputEnvelope {
        let doc = Document::new(
            "Nodes/ecu.can",
            "export testcase MyTest() {\n}\nvoid foo(int a, struct Bar b) {\n}\n",
        );
        let groups = GROUPS
            .iter()
            .map(|&group| GroupOutline {
                group,
                entries: outline_document(&doc, group.kind, SortOrder::Position),
            })
            .collect();
        OutputEnvelope {
            meta: Some(MetaInfo {
                elapsed_ms: 0,
                timeout: false,
                files_scanned: 1,
                files_outlined: 1,
                declarations: 2,
                sort_order: SortOrder::Position,
            }),
            documents: Some(vec![DocumentOutline {
                path: "Nodes/ecu.can".into(),
                groups,
                error: None,
            }]),
            error: None,
        }
    }

    fn yaml(envelope: &OutputEnvelope) -> String {
        let mut buf = Vec::new();
        write_envelope_yaml(&mut buf, envelope).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn json(envelope: &OutputEnvelope) -> String {
        let mut buf = Vec::new();
        write_envelope_json(&mut buf, envelope).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn yaml_lists_groups_in_order() {
        let out = yaml(&sample_envelope());
        let testcases = out.find("  testcases:").unwrap();
        let functions = out.find("  functions:").unwrap();
        assert!(testcases < functions);
        assert!(out.contains("- path: Nodes/ecu.can"));
        assert!(out.contains("label: \"MyTest() : void\""));
        assert!(out.contains("tooltip: \"Exported Testcase: MyTest() : void\""));
        assert!(out.contains("exported: true"));
        assert!(out.contains("label: \"foo(int, struct Bar) : void\""));
        assert!(out.contains("    - struct Bar"));
        assert!(out.contains("    line: 3"));
        assert!(out.contains("  sortOrder: position"));
    }

    #[test]
    fn yaml_empty_group_is_inline_list() {
        let doc = DocumentOutline {
            path: "a.can".into(),
            groups: vec![GroupOutline { group: GROUPS[0], entries: Vec::new() }],
            error: None,
        };
        let envelope = OutputEnvelope {
            documents: Some(vec![doc]),
            ..Default::default()
        };
        assert!(yaml(&envelope).contains("  testcases: []"));
    }

    #[test]
    fn yaml_error_only() {
        let envelope = OutputEnvelope {
            error: Some("Directory not found: /nope".into()),
            ..Default::default()
        };
        assert_eq!(yaml(&envelope), "error: \"Directory not found: /nope\"\n");
    }

    #[test]
    fn json_shape() {
        let out = json(&sample_envelope());
        assert!(out.starts_with("{\"meta\":{"));
        assert!(out.contains("\"sortOrder\":\"position\""));
        assert!(out.contains("\"testcases\":[{\"name\":\"MyTest\""));
        assert!(out.contains("\"exported\":true"));
        assert!(out.contains("\"params\":[\"int\",\"struct Bar\"]"));
        assert!(out.trim_end().ends_with("]}]}"));
    }

    #[test]
    fn quoting_rules() {
        assert!(needs_quoting("a: b"));
        assert!(needs_quoting("123"));
        assert!(needs_quoting("yes"));
        assert!(needs_quoting("-x"));
        assert!(!needs_quoting("Nodes/ecu.can"));
        assert!(!needs_quoting("struct Bar"));
    }

    #[test]
    fn quoted_escapes_control_chars() {
        let mut buf = Vec::new();
        write_quoted(&mut buf, "a\"b\\c\u{1}").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "\"a\\\"b\\\\c\\u0001\"");
    }

    #[test]
    fn yaml_and_json_share_escaping() {
        let envelope = OutputEnvelope {
            error: Some("bad path: C:\\cfg\t\"x\"".into()),
            ..Default::default()
        };
        let expected = "\"bad path: C:\\\\cfg\\t\\\"x\\\"\"";
        assert_eq!(yaml(&envelope), format!("error: {}\n", expected));
        assert_eq!(json(&envelope), format!("{{\"error\":{}}}\n", expected));
    }

    #[test]
    fn reserved_words_quoted_regardless_of_case() {
        assert!(needs_quoting("True"));
        assert!(needs_quoting("NULL"));
        assert!(!needs_quoting("Nonsense"));
    }
}
