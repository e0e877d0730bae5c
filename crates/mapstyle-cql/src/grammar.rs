//! The two CQL dialects.

use std::fmt;

/// A CQL dialect.
///
/// The two grammars share arithmetic, literals, functions, comparisons,
/// `BETWEEN`, `LIKE`, `IS NULL` and the logical operators. They differ in:
///
/// | | extended | classic |
/// |---|---|---|
/// | left side of a predicate | any expression | property name |
/// | `IN (..)`, `ILIKE` | yes | no (`in`, `ilike` are property names) |
/// | `"quoted"` property names | yes | no |
/// | `#RRGGBB` color literals | no | yes |
/// | `EXISTS`, `DOES-NOT-EXIST` | no | yes |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    Extended,
    Classic,
}

const SHARED_KEYWORDS: &[&str] = &[
    "AND", "OR", "NOT", "BETWEEN", "LIKE", "IS", "NULL", "INCLUDE", "EXCLUDE", "TRUE", "FALSE",
];

impl Grammar {
    /// Returns `true` if `word` is a keyword and cannot name a property.
    pub fn is_keyword(self, word: &str) -> bool {
        let extra: &[&str] = match self {
            Grammar::Extended => &["IN", "ILIKE"],
            Grammar::Classic => &["EXISTS"],
        };
        SHARED_KEYWORDS
            .iter()
            .chain(extra)
            .any(|keyword| keyword.eq_ignore_ascii_case(word))
    }

    pub fn name(self) -> &'static str {
        match self {
            Grammar::Extended => "extended",
            Grammar::Classic => "classic",
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_per_grammar() {
        assert!(Grammar::Extended.is_keyword("in"));
        assert!(Grammar::Extended.is_keyword("ILike"));
        assert!(!Grammar::Classic.is_keyword("in"));
        assert!(!Grammar::Classic.is_keyword("ilike"));
        assert!(Grammar::Classic.is_keyword("exists"));
        assert!(!Grammar::Extended.is_keyword("exists"));
        assert!(Grammar::Classic.is_keyword("Between"));
        assert!(!Grammar::Classic.is_keyword("name"));
    }
}
