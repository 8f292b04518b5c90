//! Universe membership.
//!
//! Parses instrument code lists from configuration. Membership is fixed at
//! startup; the coarse filter narrows it per cycle but never adds to it.

use std::collections::HashSet;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if seen.contains(&code) {
            return Err(UniverseError::DuplicateCode(code));
        }
        seen.insert(code.clone());
        codes.push(code);
    }

    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_codes_basic() {
        let result = parse_codes("RY,TD,ENB,CNR").unwrap();
        assert_eq!(result, vec!["RY", "TD", "ENB", "CNR"]);
    }

    #[test]
    fn parse_codes_with_whitespace() {
        let result = parse_codes("  RY , TD ,ENB,  CNR  ").unwrap();
        assert_eq!(result, vec!["RY", "TD", "ENB", "CNR"]);
    }

    #[test]
    fn parse_codes_uppercase() {
        let result = parse_codes("ry,td,enb").unwrap();
        assert_eq!(result, vec!["RY", "TD", "ENB"]);
    }

    #[test]
    fn parse_codes_single() {
        let result = parse_codes("RY").unwrap();
        assert_eq!(result, vec!["RY"]);
    }

    #[test]
    fn parse_codes_empty_token() {
        let result = parse_codes("RY,,TD");
        assert!(matches!(result, Err(UniverseError::EmptyToken)));
    }

    #[test]
    fn parse_codes_duplicate() {
        let result = parse_codes("RY,TD,RY");
        assert!(matches!(result, Err(UniverseError::DuplicateCode(s)) if s == "RY"));
    }
}
