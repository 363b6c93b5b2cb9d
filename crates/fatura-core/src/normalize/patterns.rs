//! Patterns and marker tables shared by the coercion helpers.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Plain decimal literal after separator normalization: "12", "-3.5", ".5", "5.", "1e3"
    pub static ref NUMERIC_LITERAL: Regex = Regex::new(
        r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$"
    ).unwrap();
}

/// Characters that show up when UTF-8 text is decoded as Latin-1.
pub const MOJIBAKE_MARKERS: [char; 4] = ['Ã', 'Â', 'Ð', '\u{FFFD}'];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_literal_accepts() {
        for s in ["0", "42", "-7", "+7", "1234.56", ".5", "5.", "1e3", "2.5E-2"] {
            assert!(NUMERIC_LITERAL.is_match(s), "{s}");
        }
    }

    #[test]
    fn test_numeric_literal_rejects() {
        for s in ["", ".", "-", "abc", "1.2.3", "inf", "NaN", "0x10", "12abc", "1e"] {
            assert!(!NUMERIC_LITERAL.is_match(s), "{s}");
        }
    }
}
