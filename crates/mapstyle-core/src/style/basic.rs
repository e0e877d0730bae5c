//! Small leaf values shared across the tree.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::expr::Expression;

/// Vendor-specific options attached to symbolizers and feature type styles.
///
/// Insertion order is preserved; setting an existing key replaces its value.
pub type VendorOptions = IndexMap<String, String>;

/// Human readable title and abstract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Description {
    title: Option<String>,
    abstract_text: Option<String>,
}

impl Description {
    pub fn new(title: Option<String>, abstract_text: Option<String>) -> Self {
        Self {
            title,
            abstract_text,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn abstract_text(&self) -> Option<&str> {
        self.abstract_text.as_deref()
    }

    /// Returns `true` if neither title nor abstract is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.abstract_text.is_none()
    }
}

/// Relative position of a graphic or label against its anchor location.
///
/// `(0, 0)` is the bottom-left corner, `(1, 1)` the top-right one.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorPoint {
    x: Expression,
    y: Expression,
}

impl AnchorPoint {
    pub fn new(x: Expression, y: Expression) -> Self {
        Self { x, y }
    }

    /// Returns the horizontal fraction of the width.
    pub fn x(&self) -> &Expression {
        &self.x
    }

    /// Returns the vertical fraction of the height.
    pub fn y(&self) -> &Expression {
        &self.y
    }
}

/// Offset of a graphic or label from its location, in the symbolizer's unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Displacement {
    x: Expression,
    y: Expression,
}

impl Displacement {
    pub fn new(x: Expression, y: Expression) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> &Expression {
        &self.x
    }

    pub fn y(&self) -> &Expression {
        &self.y
    }
}

/// A named dimension restriction of a feature type constraint.
///
/// The value is kept as text, for example `2024-01-01/2024-12-31` for a
/// `time` extent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extent {
    name: String,
    value: String,
}

impl Extent {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Unit in which symbolizer sizes are expressed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitOfMeasure {
    /// Screen pixels (SLD default)
    #[default]
    Pixel,
    /// Ground metres
    Metre,
    /// Ground feet
    Foot,
}

impl UnitOfMeasure {
    /// Returns the OGC URI identifying this unit.
    pub fn uri(self) -> &'static str {
        match self {
            Self::Pixel => "http://www.opengeospatial.org/se/units/pixel",
            Self::Metre => "http://www.opengeospatial.org/se/units/metre",
            Self::Foot => "http://www.opengeospatial.org/se/units/foot",
        }
    }
}

impl FromStr for UnitOfMeasure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pixel" | "px" => Ok(Self::Pixel),
            "metre" | "meter" | "m" => Ok(Self::Metre),
            "foot" | "ft" => Ok(Self::Foot),
            _ if s == Self::Pixel.uri() => Ok(Self::Pixel),
            _ if s == Self::Metre.uri() => Ok(Self::Metre),
            _ if s == Self::Foot.uri() => Ok(Self::Foot),
            _ => Err(format!(
                "invalid unit of measure `{s}`, valid values: pixel, metre, foot"
            )),
        }
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pixel => "pixel",
            Self::Metre => "metre",
            Self::Foot => "foot",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_of_measure_from_str() {
        assert_eq!("metre".parse::<UnitOfMeasure>().unwrap(), UnitOfMeasure::Metre);
        assert_eq!("ft".parse::<UnitOfMeasure>().unwrap(), UnitOfMeasure::Foot);
        assert_eq!(
            UnitOfMeasure::Pixel.uri().parse::<UnitOfMeasure>().unwrap(),
            UnitOfMeasure::Pixel
        );

        let err = "furlong".parse::<UnitOfMeasure>().unwrap_err();
        assert!(err.contains("invalid unit of measure `furlong`"));
    }

    #[test]
    fn test_description_is_empty() {
        assert!(Description::default().is_empty());
        assert!(!Description::new(Some("Roads".to_string()), None).is_empty());
    }
}
