//! File name patterns used to pick CAPL sources during discovery.
//!
//! Supports `*` and `?`, matched case-insensitively against the bare file
//! name (no directory part).

pub const DEFAULT_PATTERNS: &[&str] = &["*.can", "*.cin"];

#[derive(Debug, Clone)]
pub struct NamePatterns {
    patterns: Vec<Vec<u8>>,
}

impl NamePatterns {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|p| p.as_ref().to_ascii_lowercase().into_bytes())
                .collect(),
        }
    }

    /// Patterns from the command line, or the CAPL defaults when none given.
    pub fn or_default(patterns: &[String]) -> Self {
        if patterns.is_empty() {
            Self::new(DEFAULT_PATTERNS)
        } else {
            Self::new(patterns)
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.patterns.iter().any(|p| wildcard_match(name.as_bytes(), p))
    }
}

/// Iterative wildcard match with single-star backtracking.
fn wildcard_match(name: &[u8], pattern: &[u8]) -> bool {
    let (mut n, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some(b'*') => {
                backtrack = Some((p, n));
                p += 1;
            }
            Some(&c) if c == b'?' || c == name[n] => {
                p += 1;
                n += 1;
            }
            _ => match backtrack {
                Some((star_p, star_n)) => {
                    p = star_p + 1;
                    n = star_n + 1;
                    backtrack = Some((star_p, star_n + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == b'*')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(name: &str, pattern: &str) -> bool {
        NamePatterns::new(&[pattern]).matches(name)
    }

    #[test]
    fn defaults_pick_capl_sources() {
        let patterns = NamePatterns::or_default(&[]);
        assert!(patterns.matches("Gateway.can"));
        assert!(patterns.matches("helpers.cin"));
        assert!(!patterns.matches("Gateway.cfg"));
        assert!(!patterns.matches("notes.txt"));
    }

    #[test]
    fn explicit_patterns_replace_defaults() {
        let patterns = NamePatterns::or_default(&["Test*.can".to_owned()]);
        assert!(patterns.matches("TestBody.can"));
        assert!(!patterns.matches("Gateway.can"));
        assert!(!patterns.matches("TestLib.cin"));
    }

    #[test]
    fn case_insensitive() {
        assert!(matches("NODE.CAN", "*.can"));
        assert!(matches("node.can", "*.CAN"));
    }

    #[test]
    fn question_mark_single_char() {
        assert!(matches("tc1.can", "tc?.can"));
        assert!(!matches("tc12.can", "tc?.can"));
    }

    #[test]
    fn star_backtracks() {
        assert!(matches("a.b.can", "*.can"));
        assert!(matches("ecu_gateway_test.can", "*gateway*"));
        assert!(matches("abcdef", "a*c*f"));
        assert!(!matches("abcdef", "a*c*g"));
    }

    #[test]
    fn trailing_stars_match_empty() {
        assert!(matches("", "*"));
        assert!(matches("x", "x**"));
    }

    #[test]
    fn empty_pattern_only_matches_empty() {
        assert!(matches("", ""));
        assert!(!matches("a.can", ""));
    }
}
