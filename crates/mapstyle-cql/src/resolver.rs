//! Two-stage compilation of CQL text.

use log::{debug, trace};

use mapstyle_core::expr::{Expression, Filter};

use crate::{
    Grammar,
    error::{CqlError, Diagnostic},
    parser,
};

/// Compiles text into expressions and filters.
///
/// Text is parsed with the extended grammar first and, if that fails, with
/// the classic grammar. When both fail the error reports the extended
/// grammar's diagnostic; the classic diagnostic is only logged at debug
/// level.
///
/// # Examples
///
/// ```
/// use mapstyle_cql::ExpressionResolver;
///
/// let resolver = ExpressionResolver::new();
///
/// // Extended grammar
/// assert!(resolver.resolve_filter("name IN ('a', 'b')").is_ok());
/// // Classic grammar, reached through fallback
/// assert!(resolver.resolve_expression("#FF0000").is_ok());
/// // Both fail; the extended diagnostic is reported
/// let err = resolver.resolve_expression("1 +").unwrap_err();
/// assert_eq!(err.diagnostic().code().map(|c| c.as_str()), Some("E101"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionResolver;

impl ExpressionResolver {
    pub fn new() -> Self {
        Self
    }

    /// Compile `text` into an [`Expression`].
    pub fn resolve_expression(&self, text: &str) -> Result<Expression, CqlError> {
        self.resolve(text, "expression", parser::parse_expression)
    }

    /// Compile `text` into a [`Filter`].
    pub fn resolve_filter(&self, text: &str) -> Result<Filter, CqlError> {
        self.resolve(text, "filter", parser::parse_filter)
    }

    fn resolve<O>(
        &self,
        text: &str,
        kind: &'static str,
        parse: fn(&str, Grammar) -> Result<O, Diagnostic>,
    ) -> Result<O, CqlError> {
        let extended = match parse(text, Grammar::Extended) {
            Ok(value) => {
                trace!(kind, grammar = Grammar::Extended.name(), text; "Resolved CQL");
                return Ok(value);
            }
            Err(diagnostic) => diagnostic,
        };

        match parse(text, Grammar::Classic) {
            Ok(value) => {
                debug!(
                    kind,
                    text,
                    extended_error:% = extended;
                    "Extended grammar rejected input, resolved with classic grammar"
                );
                Ok(value)
            }
            Err(classic) => {
                debug!(
                    kind,
                    text,
                    classic_error:% = classic;
                    "Classic grammar also rejected input"
                );
                Err(CqlError::new(Grammar::Extended, text, extended))
            }
        }
    }
}
