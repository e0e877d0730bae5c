//! The error returned by the expression resolver.

use thiserror::Error;

use crate::{Grammar, error::Diagnostic};

/// Text that could not be compiled into an expression or filter.
///
/// Carries the diagnostic of the grammar that is reported (the extended one
/// when both grammars rejected the text) and the source text, so adapters
/// can render the diagnostic against it.
#[derive(Debug, Clone, Error)]
#[error("cannot compile `{source_text}`: {diagnostic}")]
pub struct CqlError {
    grammar: Grammar,
    source_text: String,
    diagnostic: Diagnostic,
}

impl CqlError {
    pub fn new(grammar: Grammar, source_text: impl Into<String>, diagnostic: Diagnostic) -> Self {
        Self {
            grammar,
            source_text: source_text.into(),
            diagnostic,
        }
    }

    /// Returns the grammar whose diagnostic is reported.
    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_cql_error_display() {
        let diag = Diagnostic::error("incomplete input, expected an expression")
            .with_code(ErrorCode::E101)
            .with_label(Span::new(3..3), "input ends here");
        let err = CqlError::new(Grammar::Extended, "1 +", diag);

        assert_eq!(
            err.to_string(),
            "cannot compile `1 +`: error[E101]: incomplete input, expected an expression"
        );
        assert_eq!(err.grammar(), Grammar::Extended);
        assert_eq!(err.source_text(), "1 +");
    }
}
