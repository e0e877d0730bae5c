//! Error codes for expression diagnostics.
//!
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unexpected character.
    ///
    /// A character that starts no token in this grammar, such as `#` in the
    /// extended grammar or `"` in the classic one.
    E001,

    /// Unterminated string literal.
    ///
    /// A quote was opened but never closed. Quotes inside a string are
    /// written twice: `'O''Brien'`.
    E002,

    /// Invalid number.
    ///
    /// A numeric literal is malformed, e.g. `1e`, `1.2.3` or `12abc`.
    E003,

    /// Invalid color literal.
    ///
    /// A `#` color must have exactly 6 or 8 hexadecimal digits.
    E004,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected input.
    ///
    /// A token appeared where the grammar expected something else.
    E100,

    /// Incomplete input.
    ///
    /// The input ended before the expression or filter was complete.
    E101,

    /// Trailing input.
    ///
    /// A complete expression or filter was followed by more tokens.
    E102,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unexpected character",
            ErrorCode::E002 => "unterminated string literal",
            ErrorCode::E003 => "invalid number",
            ErrorCode::E004 => "invalid color literal",
            ErrorCode::E100 => "unexpected input",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E102 => "trailing input",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E102.to_string(), "E102");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E002.description(), "unterminated string literal");
        assert_eq!(ErrorCode::E101.description(), "incomplete input");
    }
}
