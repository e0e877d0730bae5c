//! The [`Expression`] tree.

use std::{fmt, ops};

use crate::{color::Color, expr::Value};

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOp {
    /// Returns the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Subtract => 1,
            Self::Multiply | Self::Divide => 2,
        }
    }
}

/// An expression producing a [`Value`] when evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A constant.
    Literal(Value),
    /// A reference to a feature property by name.
    Property(String),
    /// A named function applied to arguments.
    Function { name: String, args: Vec<Expression> },
    /// A binary arithmetic operation.
    Binary {
        op: ArithmeticOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Arithmetic negation.
    Negate(Box<Expression>),
}

impl Expression {
    /// Creates a literal expression.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Creates a property reference.
    pub fn property(name: impl Into<String>) -> Self {
        Self::Property(name.into())
    }

    /// Creates a function call.
    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Self::Function {
            name: name.into(),
            args,
        }
    }

    /// Creates a binary arithmetic expression.
    pub fn binary(op: ArithmeticOp, left: Expression, right: Expression) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Returns the literal value, if this is a literal.
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the property name, if this is a property reference.
    pub fn as_property(&self) -> Option<&str> {
        match self {
            Self::Property(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the literal as a float, if this is a numeric literal.
    pub fn literal_f64(&self) -> Option<f64> {
        self.as_literal().and_then(Value::as_f64)
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Binary { op, .. } => op.precedence(),
            Self::Negate(_) => 3,
            _ => 4,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Property(name) => {
                if super::is_bare_identifier(name) {
                    write!(f, "{name}")
                } else {
                    write!(f, "\"{}\"", name.replace('"', "\"\""))
                }
            }
            Self::Function { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Self::Binary { op, left, right } => {
                let own = op.precedence();
                if left.precedence() < own {
                    write!(f, "({left})")?;
                } else {
                    write!(f, "{left}")?;
                }
                write!(f, " {} ", op.symbol())?;
                // Right operands of equal precedence need grouping: a - (b - c)
                if right.precedence() <= own {
                    write!(f, "({right})")
                } else {
                    write!(f, "{right}")
                }
            }
            Self::Negate(inner) => {
                if inner.precedence() < 3 {
                    write!(f, "-({inner})")
                } else {
                    write!(f, "-{inner}")
                }
            }
        }
    }
}

impl Default for Expression {
    /// A null literal.
    fn default() -> Self {
        Self::Literal(Value::Null)
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<&Expression> for Expression {
    fn from(value: &Expression) -> Self {
        value.clone()
    }
}

macro_rules! literal_from {
    ($($ty:ty),* $(,)?) => {
        $(impl From<$ty> for Expression {
            fn from(value: $ty) -> Self {
                Self::Literal(Value::from(value))
            }
        })*
    };
}

literal_from!(bool, i32, i64, f32, f64, &str, String, Color);

macro_rules! arithmetic_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl ops::$trait for Expression {
            type Output = Expression;

            fn $method(self, rhs: Expression) -> Expression {
                Expression::binary($op, self, rhs)
            }
        }
    };
}

arithmetic_op!(Add, add, ArithmeticOp::Add);
arithmetic_op!(Sub, sub, ArithmeticOp::Subtract);
arithmetic_op!(Mul, mul, ArithmeticOp::Multiply);
arithmetic_op!(Div, div, ArithmeticOp::Divide);

impl ops::Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        Expression::Negate(Box::new(self))
    }
}
