//! Configuration types for the mapstyle builders.
//!
//! The configuration overrides the values a [`DefaultStyleFactory`] hands to
//! freshly reset builders. All types implement [`serde::Deserialize`] so a
//! configuration can be loaded from TOML.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration.
//! - [`DefaultsConfig`] - Overrides for the factory defaults; every key is optional.
//!
//! # Example
//!
//! ```
//! # use mapstyle::config::AppConfig;
//! let config = AppConfig::from_toml_str(
//!     r##"
//!     [defaults]
//!     stroke_color = "#0000FF"
//!     stroke_width = 2.5
//!     "##,
//! )
//! .unwrap();
//!
//! let defaults = config.style_defaults().unwrap();
//! assert_eq!(defaults.stroke_width, 2.5);
//! assert_eq!(defaults.stroke_color.to_rgb8(), [0, 0, 255]);
//! ```
//!
//! [`DefaultStyleFactory`]: mapstyle_core::factory::DefaultStyleFactory

use serde::Deserialize;
use thiserror::Error;

use mapstyle_core::{
    color::Color,
    factory::StyleDefaults,
    style::{FontStyle, FontWeight, LineCap, LineJoin},
};

/// Errors raised while reading or applying a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Factory default overrides.
    #[serde(default)]
    defaults: DefaultsConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given default overrides.
    pub fn new(defaults: DefaultsConfig) -> Self {
        Self { defaults }
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid TOML or does
    /// not match the configuration layout.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Returns the default overrides.
    pub fn defaults(&self) -> &DefaultsConfig {
        &self.defaults
    }

    /// Applies the overrides onto the built-in [`StyleDefaults`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a configured color string
    /// cannot be parsed.
    pub fn style_defaults(&self) -> Result<StyleDefaults, ConfigError> {
        let config = &self.defaults;
        let mut defaults = StyleDefaults::default();

        if let Some(color) = config.stroke_color().map_err(invalid("stroke_color"))? {
            defaults.stroke_color = color;
        }
        if let Some(color) = config.fill_color().map_err(invalid("fill_color"))? {
            defaults.fill_color = color;
        }
        if let Some(color) = config.text_color().map_err(invalid("text_color"))? {
            defaults.text_color = color;
        }
        if let Some(color) = config.halo_color().map_err(invalid("halo_color"))? {
            defaults.halo_color = color;
        }

        let numbers = [
            (config.stroke_width, &mut defaults.stroke_width),
            (config.stroke_opacity, &mut defaults.stroke_opacity),
            (config.fill_opacity, &mut defaults.fill_opacity),
            (config.halo_radius, &mut defaults.halo_radius),
            (config.font_size, &mut defaults.font_size),
            (config.relief_factor, &mut defaults.relief_factor),
            (config.raster_opacity, &mut defaults.raster_opacity),
        ];
        for (value, target) in numbers {
            if let Some(value) = value {
                *target = value;
            }
        }

        if let Some(line_join) = config.line_join {
            defaults.line_join = line_join;
        }
        if let Some(line_cap) = config.line_cap {
            defaults.line_cap = line_cap;
        }
        if let Some(style) = config.font_style {
            defaults.font_style = style;
        }
        if let Some(weight) = config.font_weight {
            defaults.font_weight = weight;
        }
        if let Some(family) = &config.font_family {
            defaults.font_family = family.clone();
        }
        if let Some(mark_name) = &config.mark_name {
            defaults.mark_name = mark_name.clone();
        }

        Ok(defaults)
    }
}

fn invalid(key: &'static str) -> impl Fn(String) -> ConfigError {
    move |reason| ConfigError::InvalidValue { key, reason }
}

/// Overrides for the values builders reset to.
///
/// Keys that are absent keep the built-in default.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    stroke_color: Option<String>,
    #[serde(default)]
    stroke_width: Option<f64>,
    #[serde(default)]
    stroke_opacity: Option<f64>,
    #[serde(default)]
    line_join: Option<LineJoin>,
    #[serde(default)]
    line_cap: Option<LineCap>,
    #[serde(default)]
    fill_color: Option<String>,
    #[serde(default)]
    fill_opacity: Option<f64>,
    #[serde(default)]
    text_color: Option<String>,
    #[serde(default)]
    halo_color: Option<String>,
    #[serde(default)]
    halo_radius: Option<f64>,
    #[serde(default)]
    font_family: Option<String>,
    #[serde(default)]
    font_size: Option<f64>,
    #[serde(default)]
    font_style: Option<FontStyle>,
    #[serde(default)]
    font_weight: Option<FontWeight>,
    #[serde(default)]
    mark_name: Option<String>,
    #[serde(default)]
    relief_factor: Option<f64>,
    #[serde(default)]
    raster_opacity: Option<f64>,
}

impl DefaultsConfig {
    /// Returns the parsed default stroke [`Color`], if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn stroke_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.stroke_color.as_deref(), "stroke")
    }

    /// Returns the parsed default fill [`Color`], if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn fill_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.fill_color.as_deref(), "fill")
    }

    /// Returns the parsed default label [`Color`], if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn text_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.text_color.as_deref(), "text")
    }

    /// Returns the parsed default halo [`Color`], if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn halo_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.halo_color.as_deref(), "halo")
    }

    pub fn stroke_width(&self) -> Option<f64> {
        self.stroke_width
    }

    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    pub fn mark_name(&self) -> Option<&str> {
        self.mark_name.as_deref()
    }
}

fn parse_color(value: Option<&str>, what: &str) -> Result<Option<Color>, String> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {what} color in config: {err}"))
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_empty_config_keeps_builtin_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.style_defaults().unwrap(), StyleDefaults::default());
        assert!(config.defaults().stroke_width().is_none());
    }

    #[test]
    fn test_overrides_apply() {
        let config = AppConfig::from_toml_str(
            r##"
            [defaults]
            fill_color = "#FF0000"
            fill_opacity = 0.25
            line_join = "round"
            line_cap = "square"
            font_family = "DejaVu Sans"
            font_weight = "bold"
            mark_name = "circle"
            relief_factor = 40.0
            "##,
        )
        .unwrap();

        let defaults = config.style_defaults().unwrap();
        assert_eq!(defaults.fill_color.to_rgb8(), [255, 0, 0]);
        assert!(approx_eq!(f64, defaults.fill_opacity, 0.25));
        assert_eq!(defaults.line_join, LineJoin::Round);
        assert_eq!(defaults.line_cap, LineCap::Square);
        assert_eq!(defaults.font_family, "DejaVu Sans");
        assert_eq!(defaults.font_weight, FontWeight::Bold);
        assert_eq!(defaults.mark_name, "circle");
        assert!(approx_eq!(f64, defaults.relief_factor, 40.0));
        // untouched keys
        assert!(approx_eq!(f64, defaults.stroke_width, 1.0));
        assert_eq!(defaults.font_style, FontStyle::Normal);
    }

    #[test]
    fn test_invalid_color_names_the_key() {
        let config = AppConfig::from_toml_str(
            r#"
            [defaults]
            halo_color = "not-a-color"
            "#,
        )
        .unwrap();

        assert!(config.defaults().halo_color().is_err());
        let err = config.style_defaults().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "halo_color", .. }
        ));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = AppConfig::from_toml_str("[defaults\nstroke_width = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = AppConfig::from_toml_str("[defaults]\nline_cap = \"flat\"").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse TOML configuration"));
    }
}
