//! Declaration scanning for CAPL sources.
//!
//! Each rule is an independent pass over the raw text. There is no lexer:
//! declarations inside comments or string literals are reported too.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::OutlineError;

/// Type keywords that may lead a function declaration or a parameter.
pub const TYPE_KEYWORDS: &[&str] = &[
    "void", "long", "int", "float", "double", "char", "byte", "word", "dword",
    "qword", "message", "timer", "msTimer", "environment", "sysvar",
    "sysvar_float", "sysvar_string",
];

/// Words that disqualify a function candidate when they directly precede
/// its return type.
pub const CONTROL_KEYWORDS: &[&str] = &["if", "while", "for", "switch", "elseif"];

/// Return type reported for every testcase.
pub const VOID_TYPE: &str = "void";

const IDENTIFIER: &str = "[a-zA-Z_][a-zA-Z0-9_]*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Function,
    TestCase,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Function => "function",
            DeclarationKind::TestCase => "testcase",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclarationKind {
    type Err = OutlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" => Ok(DeclarationKind::Function),
            "testcase" => Ok(DeclarationKind::TestCase),
            other => Err(OutlineError::InvalidGroup(other.to_owned())),
        }
    }
}

/// One recognized declaration header.
///
/// Offsets and lengths count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationRecord {
    pub kind: DeclarationKind,
    pub name: String,
    pub return_type: String,
    pub parameters_raw: String,
    pub is_exported: bool,
    pub source_offset: usize,
    pub match_length: usize,
}

/// Scan `text` for declarations of `kind`, in document order.
pub fn scan(text: &str, kind: DeclarationKind) -> Vec<DeclarationRecord> {
    match kind {
        DeclarationKind::Function => scan_functions(text),
        DeclarationKind::TestCase => scan_test_cases(text),
    }
}

fn function_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let pattern = format!(
            r"(?m)(?:^|\s)\s*(?P<sig>(?P<ret>{})\s+(?P<name>{})\s*\((?P<params>[^)]*)\)\s*\{{)",
            TYPE_KEYWORDS.join("|"),
            IDENTIFIER,
        );
        Regex::new(&pattern).expect("function pattern is valid")
    })
}

fn test_case_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let pattern = format!(
            r"(?m)(?:^|\s)(?P<sig>(?P<export>export\s+)?testcase\s+(?P<name>{})\s*\(\s*\)\s*\{{)",
            IDENTIFIER,
        );
        Regex::new(&pattern).expect("testcase pattern is valid")
    })
}

pub fn scan_functions(text: &str) -> Vec<DeclarationRecord> {
    let pattern = function_pattern();
    let mut records = Vec::new();
    let mut cursor = CharCursor::new(text);
    let mut at = 0;

    while let Some(caps) = pattern.captures_at(text, at) {
        let (Some(sig), Some(ret), Some(name)) = (caps.name("sig"), caps.name("ret"), caps.name("name")) else {
            break;
        };

        if follows_control_keyword(text, sig.start()) {
            // Retry just past the rejected candidate so a declaration
            // sharing its span is still found.
            at = next_boundary(text, sig.start());
            continue;
        }

        let params = caps.name("params").map_or("", |m| m.as_str());
        records.push(DeclarationRecord {
            kind: DeclarationKind::Function,
            name: name.as_str().to_owned(),
            return_type: ret.as_str().to_owned(),
            parameters_raw: params.trim().to_owned(),
            is_exported: false,
            source_offset: cursor.advance_to(sig.start()),
            match_length: sig.as_str().chars().count(),
        });
        at = sig.end();
    }

    records
}

pub fn scan_test_cases(text: &str) -> Vec<DeclarationRecord> {
    let mut cursor = CharCursor::new(text);

    test_case_pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let sig = caps.name("sig")?;
            let name = caps.name("name")?;
            Some(DeclarationRecord {
                kind: DeclarationKind::TestCase,
                name: name.as_str().to_owned(),
                return_type: VOID_TYPE.to_owned(),
                parameters_raw: String::new(),
                is_exported: caps.name("export").is_some(),
                source_offset: cursor.advance_to(sig.start()),
                match_length: sig.as_str().chars().count(),
            })
        })
        .collect()
}

/// True when the word right before `keyword_start` on the same line (spaces
/// and tabs skipped) is one of the control-flow keywords.
fn follows_control_keyword(text: &str, keyword_start: usize) -> bool {
    let before = text[..keyword_start].trim_end_matches([' ', '\t']);
    let token_start = before
        .char_indices()
        .rev()
        .find(|&(_, c)| !is_identifier_char(c))
        .map_or(0, |(i, c)| i + c.len_utf8());
    CONTROL_KEYWORDS.contains(&&before[token_start..])
}

#[inline]
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn next_boundary(text: &str, from: usize) -> usize {
    text[from..].chars().next().map_or(text.len(), |c| from + c.len_utf8())
}

/// Converts increasing byte offsets into character offsets in one pass.
struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, byte: 0, chars: 0 }
    }

    fn advance_to(&mut self, byte: usize) -> usize {
        if byte > self.byte {
            self.chars += self.text[self.byte..byte].chars().count();
            self.byte = byte;
        }
        self.chars
    }
}
