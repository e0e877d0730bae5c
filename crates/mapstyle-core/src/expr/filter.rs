//! The [`Filter`] tree.

use std::fmt;

use crate::expr::Expression;

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl ComparisonOp {
    /// Returns the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        }
    }
}

/// A predicate over feature properties.
///
/// Negated predicates such as `IS NOT NULL` or `NOT LIKE` are represented as
/// [`Filter::Not`] wrapping the positive form.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every feature.
    Include,
    /// Matches no feature.
    Exclude,
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    Compare {
        op: ComparisonOp,
        left: Expression,
        right: Expression,
    },
    Between {
        expr: Expression,
        lower: Expression,
        upper: Expression,
    },
    /// SQL-style pattern match where `%` matches any run and `_` one character.
    Like {
        expr: Expression,
        pattern: String,
        case_insensitive: bool,
    },
    IsNull(Expression),
    In {
        expr: Expression,
        list: Vec<Expression>,
    },
    /// Tests whether the feature carries the named property at all.
    Exists(String),
}

impl Filter {
    /// Creates a comparison filter.
    pub fn compare(
        op: ComparisonOp,
        left: impl Into<Expression>,
        right: impl Into<Expression>,
    ) -> Self {
        Self::Compare {
            op,
            left: left.into(),
            right: right.into(),
        }
    }

    /// Creates an equality filter.
    pub fn equal(left: impl Into<Expression>, right: impl Into<Expression>) -> Self {
        Self::compare(ComparisonOp::Equal, left, right)
    }

    /// Negates this filter.
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Or(_) => 1,
            Self::And(_) => 2,
            Self::Not(_) => 3,
            _ => 4,
        }
    }

    fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[Filter], sep: &str, own: u8) -> fmt::Result {
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                write!(f, " {sep} ")?;
            }
            if part.precedence() <= own {
                write!(f, "({part})")?;
            } else {
                write!(f, "{part}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include => write!(f, "INCLUDE"),
            Self::Exclude => write!(f, "EXCLUDE"),
            Self::And(parts) => Self::write_joined(f, parts, "AND", 2),
            Self::Or(parts) => Self::write_joined(f, parts, "OR", 1),
            Self::Not(inner) => match inner.as_ref() {
                Self::IsNull(expr) => write!(f, "{expr} IS NOT NULL"),
                Self::Between { expr, lower, upper } => {
                    write!(f, "{expr} NOT BETWEEN {lower} AND {upper}")
                }
                Self::Like {
                    expr,
                    pattern,
                    case_insensitive,
                } => {
                    let keyword = if *case_insensitive { "ILIKE" } else { "LIKE" };
                    write!(f, "{expr} NOT {keyword} '{}'", pattern.replace('\'', "''"))
                }
                Self::In { expr, list } => {
                    write!(f, "{expr} NOT IN (")?;
                    write_list(f, list)?;
                    write!(f, ")")
                }
                other if other.precedence() < 3 => write!(f, "NOT ({other})"),
                other => write!(f, "NOT {other}"),
            },
            Self::Compare { op, left, right } => write!(f, "{left} {} {right}", op.symbol()),
            Self::Between { expr, lower, upper } => {
                write!(f, "{expr} BETWEEN {lower} AND {upper}")
            }
            Self::Like {
                expr,
                pattern,
                case_insensitive,
            } => {
                let keyword = if *case_insensitive { "ILIKE" } else { "LIKE" };
                write!(f, "{expr} {keyword} '{}'", pattern.replace('\'', "''"))
            }
            Self::IsNull(expr) => write!(f, "{expr} IS NULL"),
            Self::In { expr, list } => {
                write!(f, "{expr} IN (")?;
                write_list(f, list)?;
                write!(f, ")")
            }
            Self::Exists(name) => write!(f, "{} EXISTS", Expression::property(name.clone())),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, list: &[Expression]) -> fmt::Result {
    for (i, item) in list.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_display_comparison() {
        let filter = Filter::compare(ComparisonOp::GreaterOrEqual, Expression::property("pop"), 1000);
        assert_eq!(filter.to_string(), "pop >= 1000");
    }

    #[test]
    fn test_filter_display_logic_grouping() {
        let a = Filter::equal(Expression::property("a"), 1);
        let b = Filter::equal(Expression::property("b"), 2);
        let c = Filter::equal(Expression::property("c"), 3);

        let filter = Filter::And(vec![Filter::Or(vec![a.clone(), b.clone()]), c.clone()]);
        assert_eq!(filter.to_string(), "(a = 1 OR b = 2) AND c = 3");

        let negated = Filter::Or(vec![a, b]).negate();
        assert_eq!(negated.to_string(), "NOT (a = 1 OR b = 2)");
    }

    #[test]
    fn test_filter_display_negated_predicates() {
        let not_null = Filter::IsNull(Expression::property("name")).negate();
        assert_eq!(not_null.to_string(), "name IS NOT NULL");

        let not_in = Filter::In {
            expr: Expression::property("kind"),
            list: vec![Expression::from("a"), Expression::from("b")],
        }
        .negate();
        assert_eq!(not_in.to_string(), "kind NOT IN ('a', 'b')");
    }

    #[test]
    fn test_filter_display_like() {
        let like = Filter::Like {
            expr: Expression::property("name"),
            pattern: "Main%".to_string(),
            case_insensitive: true,
        };
        assert_eq!(like.to_string(), "name ILIKE 'Main%'");
    }
}
