//! Literal values carried by expressions.

use std::fmt;

use crate::color::Color;

/// A literal value.
///
/// Conversions between kinds are lenient, following how style engines treat
/// literals: numeric text converts to a number, color text converts to a
/// [`Color`], and everything renders as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Color(Color),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts the value to a float when it is numeric or numeric text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) | Self::Color(_) | Self::Null => None,
        }
    }

    /// Converts the value to a boolean.
    ///
    /// Text converts when it reads `true` or `false` in any case.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Self::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    /// Converts the value to a [`Color`].
    ///
    /// Text is parsed as a CSS color or hex literal. Integers are read as
    /// packed `0xRRGGBB`.
    pub fn to_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            Self::Text(s) => Color::new(s.trim())
                .or_else(|_| Color::from_hex(s.trim()))
                .ok(),
            Self::Integer(i) if (0..=0xFF_FF_FF).contains(i) => {
                Color::from_hex(&format!("#{i:06X}")).ok()
            }
            _ => None,
        }
    }

    /// Renders the value as plain text, without quoting.
    ///
    /// Returns `None` for [`Value::Null`].
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(format_float(*f)),
            Self::Text(s) => Some(s.clone()),
            Self::Color(c) => Some(c.to_hex()),
        }
    }
}

/// Formats a float so that it always reads back as a float.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(true) => write!(f, "TRUE"),
            Self::Bool(false) => write!(f, "FALSE"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{}", format_float(*v)),
            Self::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Color(c) => write!(f, "'{}'", c.to_hex()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Color> for Value {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_value_as_f64() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert!(approx_eq!(f64, Value::from(" 2.5 ").as_f64().unwrap(), 2.5));
        assert_eq!(Value::from("abc").as_f64(), None);
        assert_eq!(Value::Null.as_f64(), None);
    }

    #[test]
    fn test_value_to_color() {
        let red = Color::new("red").unwrap();
        assert_eq!(Value::from("#FF0000").to_color(), Some(red));
        assert_eq!(Value::from("red").to_color(), Some(red));
        assert_eq!(Value::Integer(0xFF0000).to_color(), Some(red));
        assert_eq!(Value::Float(1.0).to_color(), None);
    }

    #[test]
    fn test_value_display_quotes_text() {
        assert_eq!(Value::from("it's").to_string(), "'it''s'");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Integer(2).to_string(), "2");
        assert_eq!(Value::Bool(true).to_string(), "TRUE");
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(Value::Float(1.5).to_text().as_deref(), Some("1.5"));
        assert_eq!(
            Value::Color(Color::new("lime").unwrap()).to_text().as_deref(),
            Some("#00FF00")
        );
        assert_eq!(Value::Null.to_text(), None);
    }
}
