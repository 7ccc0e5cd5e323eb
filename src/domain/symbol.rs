//! Ticker symbol newtype with normalization rules.

use crate::domain::error::PricesweepError;
use std::fmt;

/// A normalized ticker symbol: non-empty, ASCII alphanumeric, uppercase.
///
/// Construction trims whitespace and uppercases, so every `Symbol` in the
/// system compares and stores consistently regardless of how the user
/// typed it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(raw: &str) -> Result<Self, PricesweepError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(PricesweepError::InvalidSymbol {
                reason: "symbol cannot be empty".into(),
            });
        }
        if let Some(ch) = normalized
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '.')
        {
            return Err(PricesweepError::InvalidSymbol {
                reason: format!("symbol contains invalid character '{ch}'"),
            });
        }
        Ok(Symbol(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_and_trims() {
        let sym = Symbol::new("  thyao ").unwrap();
        assert_eq!(sym.as_str(), "THYAO");
    }

    #[test]
    fn already_normalized_passes_through() {
        let sym = Symbol::new("GARAN").unwrap();
        assert_eq!(sym.as_str(), "GARAN");
    }

    #[test]
    fn empty_rejected() {
        assert!(Symbol::new("").is_err());
        assert!(Symbol::new("   ").is_err());
    }

    #[test]
    fn embedded_whitespace_rejected() {
        assert!(Symbol::new("TH YAO").is_err());
    }

    #[test]
    fn punctuation_rejected_except_dot() {
        assert!(Symbol::new("AK:BNK").is_err());
        assert!(Symbol::new("BRK.B").is_ok());
    }

    #[test]
    fn display_matches_as_str() {
        let sym = Symbol::new("sise").unwrap();
        assert_eq!(format!("{sym}"), "SISE");
    }
}
