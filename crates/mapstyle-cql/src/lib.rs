//! # mapstyle CQL
//!
//! Compiles CQL text into the [`Expression`] and [`Filter`] trees of
//! `mapstyle-core`. Two grammars are supported: the extended grammar (ECQL)
//! and the classic one (CQL). [`ExpressionResolver`] tries them in that
//! order.
//!
//! ## Usage
//!
//! ```
//! use mapstyle_core::expr::{EvaluationContext, Value};
//!
//! let filter = mapstyle_cql::filter("population > 10000 AND name LIKE 'S%'").unwrap();
//! let ctx = EvaluationContext::new()
//!     .with("population", 25000)
//!     .with("name", "Springfield");
//! assert!(filter.evaluate(&ctx));
//!
//! let width = mapstyle_cql::expression("lanes * 2.5").unwrap();
//! assert_eq!(width.evaluate(&ctx.with("lanes", 2)), Value::Float(5.0));
//! ```

pub mod error;
mod grammar;
mod lexer;
mod parser;
mod resolver;
mod span;
mod tokens;

pub use error::CqlError;
pub use grammar::Grammar;
pub use parser::{parse_expression, parse_filter};
pub use resolver::ExpressionResolver;
pub use span::Span;

use mapstyle_core::expr::{Expression, Filter};

/// Compile `text` into an expression, falling back from the extended to the
/// classic grammar.
pub fn expression(text: &str) -> Result<Expression, CqlError> {
    ExpressionResolver::new().resolve_expression(text)
}

/// Compile `text` into a filter, falling back from the extended to the
/// classic grammar.
pub fn filter(text: &str) -> Result<Filter, CqlError> {
    ExpressionResolver::new().resolve_filter(text)
}
