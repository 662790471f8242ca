//! Locale-style string ordering for outline labels.
//!
//! Approximates the default Unicode collation: letters compare without case
//! first, punctuation sorts before digits and digits before letters, and
//! only when everything else ties does lowercase precede uppercase.

use std::cmp::Ordering;

// Root collation order of the punctuation that shows up in labels.
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

pub fn compare(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(primary_weight)
        .cmp(b.chars().map(primary_weight))
        .then_with(|| a.chars().map(case_weight).cmp(b.chars().map(case_weight)))
        .then_with(|| a.cmp(b))
}

fn primary_weight(c: char) -> (u8, u32) {
    if c.is_whitespace() {
        (0, c as u32)
    } else if let Some(rank) = PUNCTUATION_ORDER.find(c) {
        (1, rank as u32)
    } else if let Some(digit) = c.to_digit(10) {
        (3, digit)
    } else if c.is_alphabetic() {
        (4, c.to_lowercase().next().unwrap_or(c) as u32)
    } else {
        (2, c as u32)
    }
}

fn case_weight(c: char) -> u8 {
    u8::from(c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_first() {
        assert_eq!(compare("alpha", "Beta"), Ordering::Less);
        assert_eq!(compare("Zeta", "alpha"), Ordering::Greater);
    }

    #[test]
    fn lowercase_before_uppercase_on_tie() {
        assert_eq!(compare("a", "A"), Ordering::Less);
        assert_eq!(compare("testA", "testa"), Ordering::Greater);
    }

    #[test]
    fn underscore_before_parenthesis() {
        assert_eq!(compare("foo_bar() : void", "foo() : void"), Ordering::Less);
    }

    #[test]
    fn digits_before_letters() {
        assert_eq!(compare("tc1", "tca"), Ordering::Less);
        assert_eq!(compare("item10", "item2"), Ordering::Less);
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(compare("on", "onStart"), Ordering::Less);
    }

    #[test]
    fn equal_strings() {
        assert_eq!(compare("same() : void", "same() : void"), Ordering::Equal);
    }
}
