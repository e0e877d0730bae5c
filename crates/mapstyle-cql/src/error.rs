//! Diagnostics for the expression compiler.
//!
//! Lexer and parser failures are reported as a [`Diagnostic`] carrying an
//! [`ErrorCode`], a primary [`Label`] pointing at the offending text, an
//! optional secondary label for context and an optional help line. The resolver wraps the diagnostic in a [`CqlError`]
//! together with the source text and the grammar that produced it.
//!
//! # Example
//!
//! ```
//! # use mapstyle_cql::error::{Diagnostic, ErrorCode};
//! # use mapstyle_cql::Span;
//!
//! let diag = Diagnostic::error("unterminated string literal")
//!     .with_code(ErrorCode::E002)
//!     .with_label(Span::new(7..12), "string starts here")
//!     .with_help("add a closing `'`");
//!
//! assert_eq!(diag.to_string(), "error[E002]: unterminated string literal");
//! ```

mod cql_error;
mod diagnostic;
mod error_code;
mod label;

pub use cql_error::CqlError;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
