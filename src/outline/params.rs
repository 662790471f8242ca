use std::sync::OnceLock;

use regex::Regex;

use crate::signature::TYPE_KEYWORDS;

/// Type reported for a parameter whose leading token is not a known type.
pub const UNKNOWN_TYPE: &str = "unknown";

fn leading_type_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let pattern = format!(
            r"^({}|struct\s+[a-zA-Z_][a-zA-Z0-9_]*)\b",
            TYPE_KEYWORDS.join("|")
        );
        Regex::new(&pattern).expect("parameter type pattern is valid")
    })
}

/// Reduce a raw parameter list to the leading type of each parameter.
///
/// Only the first token is inspected; names, array brackets and anything
/// after them are ignored. `struct` types come back as `struct Name`.
pub fn split_parameter_types(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    raw.split(',')
        .map(|param| leading_type(param.trim()))
        .collect()
}

fn leading_type(param: &str) -> String {
    match leading_type_pattern().find(param) {
        Some(m) => m.as_str().split_whitespace().collect::<Vec<_>>().join(" "),
        None => UNKNOWN_TYPE.to_owned(),
    }
}
