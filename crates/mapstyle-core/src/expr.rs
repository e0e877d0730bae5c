//! Expression and filter model.
//!
//! Style fields hold [`Expression`]s rather than plain scalars so that a value
//! can be a literal, a reference to a feature property, or a computed result.
//! Rules select features with [`Filter`]s.
//!
//! # Overview
//!
//! - [`Value`] - A literal value (number, text, boolean, color or null).
//! - [`Expression`] - Literal, property reference, function call or arithmetic.
//! - [`Filter`] - Predicates combined with `AND`/`OR`/`NOT`.
//! - [`EvaluationContext`] - Property values used when evaluating expressions.
//!
//! Both [`Expression`] and [`Filter`] render through [`std::fmt::Display`] as
//! canonical extended CQL text.
//!
//! # Examples
//!
//! ```
//! use mapstyle_core::expr::{EvaluationContext, Expression, Value};
//!
//! let width = Expression::property("lanes") * Expression::from(2.5);
//! let ctx = EvaluationContext::new().with("lanes", 2);
//!
//! assert_eq!(width.evaluate(&ctx), Value::Float(5.0));
//! assert_eq!(width.to_string(), "lanes * 2.5");
//! ```

mod evaluate;
mod expression;
mod filter;
mod value;

pub use evaluate::EvaluationContext;
pub use expression::{ArithmeticOp, Expression};
pub use filter::{ComparisonOp, Filter};
pub use value::Value;

/// Words that cannot be used as bare property names in canonical output.
pub const RESERVED_WORDS: &[&str] = &[
    "AND", "OR", "NOT", "BETWEEN", "LIKE", "ILIKE", "IS", "NULL", "IN", "INCLUDE", "EXCLUDE",
    "TRUE", "FALSE", "EXISTS",
];

/// Returns `true` if `name` can be written as a bare (unquoted) property name.
pub fn is_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    starts_well
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | ':'))
        && !RESERVED_WORDS
            .iter()
            .any(|word| word.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_bare_identifier() {
        assert!(is_bare_identifier("name"));
        assert!(is_bare_identifier("gml:the_geom"));
        assert!(is_bare_identifier("road.class"));
        assert!(is_bare_identifier("名前"));
        assert!(is_bare_identifier("höhe"));
        assert!(!is_bare_identifier("1abc"));
        assert!(!is_bare_identifier("my attr"));
        assert!(!is_bare_identifier("in"));
        assert!(!is_bare_identifier(""));
    }
}
