//! Evaluation of expressions and filters against feature properties.
//!
//! Evaluation is deliberately small: it covers literals, property lookups,
//! arithmetic and the handful of functions that style values are built from
//! (`Concatenate`, `Recode`, `Categorize`). Unknown functions evaluate to
//! [`Value::Null`].

use std::{cmp::Ordering, collections::HashMap};

use log::debug;

use crate::expr::{ArithmeticOp, ComparisonOp, Expression, Filter, Value};

/// Property values visible to an evaluation.
///
/// The default context is empty, so only expressions that do not reference
/// properties evaluate to something other than null.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    properties: HashMap<String, Value>,
}

impl EvaluationContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property value, returning the context.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a property value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Returns the value of a property, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Returns `true` if the property is present, even when its value is null.
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }
}

impl Expression {
    /// Evaluates the expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle_core::expr::{EvaluationContext, Expression, Value};
    ///
    /// let expr = Expression::from(2) + Expression::from(3);
    /// assert_eq!(expr.evaluate(&EvaluationContext::new()), Value::Integer(5));
    /// ```
    pub fn evaluate(&self, ctx: &EvaluationContext) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Property(name) => ctx.get(name).cloned().unwrap_or_default(),
            Self::Function { name, args } => evaluate_function(name, args, ctx),
            Self::Binary { op, left, right } => {
                arithmetic(*op, &left.evaluate(ctx), &right.evaluate(ctx))
            }
            Self::Negate(inner) => match inner.evaluate(ctx) {
                Value::Integer(i) => Value::Integer(-i),
                other => other.as_f64().map(|v| Value::Float(-v)).unwrap_or_default(),
            },
        }
    }
}

impl Filter {
    /// Evaluates the filter, treating comparisons against null as false.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle_core::expr::{EvaluationContext, Expression, Filter};
    ///
    /// let filter = Filter::equal(Expression::property("kind"), "road");
    /// assert!(filter.evaluate(&EvaluationContext::new().with("kind", "road")));
    /// assert!(!filter.evaluate(&EvaluationContext::new()));
    /// ```
    pub fn evaluate(&self, ctx: &EvaluationContext) -> bool {
        match self {
            Self::Include => true,
            Self::Exclude => false,
            Self::And(parts) => parts.iter().all(|part| part.evaluate(ctx)),
            Self::Or(parts) => parts.iter().any(|part| part.evaluate(ctx)),
            Self::Not(inner) => !inner.evaluate(ctx),
            Self::Compare { op, left, right } => {
                let ordering = compare(&left.evaluate(ctx), &right.evaluate(ctx));
                ordering.is_some_and(|ordering| match op {
                    ComparisonOp::Equal => ordering == Ordering::Equal,
                    ComparisonOp::NotEqual => ordering != Ordering::Equal,
                    ComparisonOp::Less => ordering == Ordering::Less,
                    ComparisonOp::LessOrEqual => ordering != Ordering::Greater,
                    ComparisonOp::Greater => ordering == Ordering::Greater,
                    ComparisonOp::GreaterOrEqual => ordering != Ordering::Less,
                })
            }
            Self::Between { expr, lower, upper } => {
                let value = expr.evaluate(ctx);
                let above = compare(&value, &lower.evaluate(ctx))
                    .is_some_and(|o| o != Ordering::Less);
                let below = compare(&value, &upper.evaluate(ctx))
                    .is_some_and(|o| o != Ordering::Greater);
                above && below
            }
            Self::Like {
                expr,
                pattern,
                case_insensitive,
            } => expr.evaluate(ctx).to_text().is_some_and(|text| {
                if *case_insensitive {
                    like_match(&text.to_lowercase(), &pattern.to_lowercase())
                } else {
                    like_match(&text, pattern)
                }
            }),
            Self::IsNull(expr) => expr.evaluate(ctx).is_null(),
            Self::In { expr, list } => {
                let value = expr.evaluate(ctx);
                list.iter()
                    .any(|item| compare(&value, &item.evaluate(ctx)) == Some(Ordering::Equal))
            }
            Self::Exists(name) => ctx.contains(name),
        }
    }
}

fn arithmetic(op: ArithmeticOp, left: &Value, right: &Value) -> Value {
    if let (Value::Integer(l), Value::Integer(r)) = (left, right) {
        let result = match op {
            ArithmeticOp::Add => l.checked_add(*r),
            ArithmeticOp::Subtract => l.checked_sub(*r),
            ArithmeticOp::Multiply => l.checked_mul(*r),
            // Integer division only when exact, otherwise fall through to floats
            ArithmeticOp::Divide if *r != 0 && l % r == 0 => Some(l / r),
            ArithmeticOp::Divide => None,
        };
        if let Some(result) = result {
            return Value::Integer(result);
        }
    }

    let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) else {
        return Value::Null;
    };
    let result = match op {
        ArithmeticOp::Add => l + r,
        ArithmeticOp::Subtract => l - r,
        ArithmeticOp::Multiply => l * r,
        ArithmeticOp::Divide => l / r,
    };
    Value::Float(result)
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    if left.is_null() || right.is_null() {
        return None;
    }
    if let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) {
        return l.partial_cmp(&r);
    }
    if let (Some(l), Some(r)) = (left.as_bool(), right.as_bool()) {
        return Some(l.cmp(&r));
    }
    if let (Value::Color(l), Some(r)) = (left, right.to_color()) {
        return Some(if *l == r { Ordering::Equal } else { l.to_hex().cmp(&r.to_hex()) });
    }
    Some(left.to_text()?.cmp(&right.to_text()?))
}

fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // Classic two-pointer wildcard match with backtracking on the last `%`
    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '%')
}

fn evaluate_function(name: &str, args: &[Expression], ctx: &EvaluationContext) -> Value {
    match name.to_ascii_lowercase().as_str() {
        "concatenate" => {
            let text: String = args
                .iter()
                .filter_map(|arg| arg.evaluate(ctx).to_text())
                .collect();
            Value::Text(text)
        }
        "recode" => {
            let Some((input, pairs)) = args.split_first() else {
                return Value::Null;
            };
            let input = input.evaluate(ctx);
            pairs
                .chunks_exact(2)
                .find(|pair| compare(&input, &pair[0].evaluate(ctx)) == Some(Ordering::Equal))
                .map(|pair| pair[1].evaluate(ctx))
                .unwrap_or_default()
        }
        "categorize" => {
            // Categorize(input, value0, threshold1, value1, threshold2, value2, ...)
            let Some((input, rest)) = args.split_first() else {
                return Value::Null;
            };
            let Some((first, steps)) = rest.split_first() else {
                return Value::Null;
            };
            let input = input.evaluate(ctx);
            let mut result = first.evaluate(ctx);
            for step in steps.chunks_exact(2) {
                match compare(&input, &step[0].evaluate(ctx)) {
                    Some(Ordering::Less) | None => break,
                    Some(_) => result = step[1].evaluate(ctx),
                }
            }
            result
        }
        _ => {
            debug!(function = name; "Function is not evaluable here, yielding null");
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;
    use crate::color::Color;

    #[test]
    fn test_evaluate_arithmetic() {
        let ctx = EvaluationContext::new().with("width", 2.5).with("lanes", 3);

        let expr = Expression::property("width") * Expression::property("lanes");
        let Value::Float(result) = expr.evaluate(&ctx) else {
            panic!("expected float");
        };
        assert!(approx_eq!(f64, result, 7.5));

        let int_div = Expression::from(7) / Expression::from(2);
        assert_eq!(int_div.evaluate(&ctx), Value::Float(3.5));

        let negated = -Expression::property("lanes");
        assert_eq!(negated.evaluate(&ctx), Value::Integer(-3));
    }

    #[test]
    fn test_evaluate_missing_property_is_null() {
        let expr = Expression::property("missing") + Expression::from(1);
        assert_eq!(expr.evaluate(&EvaluationContext::new()), Value::Null);
    }

    #[test]
    fn test_evaluate_color_literal() {
        let expr = Expression::from(Color::from_hex("#00FF00").unwrap());
        let color = expr.evaluate(&EvaluationContext::new()).to_color().unwrap();
        assert_eq!(color.to_rgb8(), [0, 255, 0]);
    }

    #[test]
    fn test_evaluate_functions() {
        let ctx = EvaluationContext::new().with("kind", "river").with("pop", 250);

        let concat = Expression::function(
            "Concatenate",
            vec![Expression::from("pop="), Expression::property("pop")],
        );
        assert_eq!(concat.evaluate(&ctx), Value::from("pop=250"));

        let recode = Expression::function(
            "Recode",
            vec![
                Expression::property("kind"),
                Expression::from("road"),
                Expression::from("#000000"),
                Expression::from("river"),
                Expression::from("#0000FF"),
            ],
        );
        assert_eq!(recode.evaluate(&ctx), Value::from("#0000FF"));

        let categorize = Expression::function(
            "Categorize",
            vec![
                Expression::property("pop"),
                Expression::from("small"),
                Expression::from(100),
                Expression::from("medium"),
                Expression::from(1000),
                Expression::from("large"),
            ],
        );
        assert_eq!(categorize.evaluate(&ctx), Value::from("medium"));

        let unknown = Expression::function("buffer", vec![]);
        assert_eq!(unknown.evaluate(&ctx), Value::Null);
    }

    #[test]
    fn test_filter_comparisons() {
        let ctx = EvaluationContext::new().with("pop", 500).with("name", "Main Street");

        assert!(Filter::compare(ComparisonOp::Greater, Expression::property("pop"), 100).evaluate(&ctx));
        assert!(!Filter::compare(ComparisonOp::Less, Expression::property("pop"), 100).evaluate(&ctx));
        assert!(Filter::compare(ComparisonOp::NotEqual, Expression::property("name"), "x").evaluate(&ctx));

        let between = Filter::Between {
            expr: Expression::property("pop"),
            lower: Expression::from(100),
            upper: Expression::from(500),
        };
        assert!(between.evaluate(&ctx));
    }

    #[test]
    fn test_filter_null_comparison_is_false() {
        let ctx = EvaluationContext::new();
        let equal = Filter::equal(Expression::property("missing"), 1);
        assert!(!equal.evaluate(&ctx));
        assert!(!Filter::compare(ComparisonOp::NotEqual, Expression::property("missing"), 1).evaluate(&ctx));
        assert!(Filter::IsNull(Expression::property("missing")).evaluate(&ctx));
    }

    #[test]
    fn test_filter_like() {
        let ctx = EvaluationContext::new().with("name", "Main Street");
        let like = |pattern: &str, case_insensitive| Filter::Like {
            expr: Expression::property("name"),
            pattern: pattern.to_string(),
            case_insensitive,
        };

        assert!(like("Main%", false).evaluate(&ctx));
        assert!(like("%Street", false).evaluate(&ctx));
        assert!(like("M_in%", false).evaluate(&ctx));
        assert!(!like("main%", false).evaluate(&ctx));
        assert!(like("main%", true).evaluate(&ctx));
        assert!(!like("Main", false).evaluate(&ctx));
    }

    #[test]
    fn test_filter_in_and_exists() {
        let ctx = EvaluationContext::new().with("kind", "road").with("empty", Value::Null);
        let filter = Filter::In {
            expr: Expression::property("kind"),
            list: vec![Expression::from("rail"), Expression::from("road")],
        };
        assert!(filter.evaluate(&ctx));
        assert!(Filter::Exists("empty".to_string()).evaluate(&ctx));
        assert!(!Filter::Exists("other".to_string()).evaluate(&ctx));
    }

    #[test]
    fn test_filter_logic() {
        let ctx = EvaluationContext::new();
        assert!(Filter::And(vec![Filter::Include, Filter::Include]).evaluate(&ctx));
        assert!(!Filter::And(vec![Filter::Include, Filter::Exclude]).evaluate(&ctx));
        assert!(Filter::Or(vec![Filter::Exclude, Filter::Include]).evaluate(&ctx));
        assert!(Filter::Exclude.negate().evaluate(&ctx));
    }
}
