//! Color handling for style descriptors
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Colors compare and hash by their 8-bit sRGB components,
//! so `red`, `#ff0000` and `rgb(255, 0, 0)` are the same color.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Rgba8, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate.
#[derive(Clone, Copy, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a CSS color string.
    ///
    /// Accepts anything the color crate parses, such as `"#ff0000"`,
    /// `"rgb(255, 0, 0)"` or `"red"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// assert_ne!(red, blue);
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Create a new `Color` from a strict hexadecimal literal.
    ///
    /// The literal may carry a `#` or `0x` prefix and must have six (`RRGGBB`)
    /// or eight (`RRGGBBAA`) hex digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapstyle_core::color::Color;
    ///
    /// let green = Color::from_hex("#00FF00").unwrap();
    /// assert_eq!(green.to_rgb8(), [0, 255, 0]);
    /// assert!(Color::from_hex("green").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let digits = hex
            .strip_prefix('#')
            .or_else(|| hex.strip_prefix("0x"))
            .or_else(|| hex.strip_prefix("0X"))
            .unwrap_or(hex);

        let valid_len = digits.len() == 6 || digits.len() == 8;
        if !valid_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!(
                "invalid hex color `{hex}`, expected #RRGGBB or #RRGGBBAA"
            ));
        }

        Self::new(&format!("#{digits}"))
    }

    /// Creates a new color with the specified alpha value in `0.0..=1.0`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Returns the 8-bit sRGB components including alpha.
    pub fn to_rgba8(&self) -> Rgba8 {
        self.color.to_alpha_color::<Srgb>().to_rgba8()
    }

    /// Returns the 8-bit sRGB red, green and blue components.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let Rgba8 { r, g, b, .. } = self.to_rgba8();
        [r, g, b]
    }

    fn components(&self) -> [u8; 4] {
        let Rgba8 { r, g, b, a } = self.to_rgba8();
        [r, g, b, a]
    }

    /// Returns the color as an uppercase `#RRGGBB` string, or `#RRGGBBAA`
    /// when the color is not fully opaque.
    pub fn to_hex(&self) -> String {
        let Rgba8 { r, g, b, a } = self.to_rgba8();
        if a == u8::MAX {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.components() == other.components()
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components().hash(state);
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
