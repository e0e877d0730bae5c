//! Error types for mapstyle operations.
//!
//! [`BuildError`] covers failures raised by the builders themselves, and
//! [`MapStyleError`] wraps everything a [`StyleKit`](crate::StyleKit) can
//! return.

use std::io;

use thiserror::Error;

use mapstyle_cql::CqlError;

use crate::config::ConfigError;

/// Failures raised by builder operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A color literal passed to a `color_hex` setter could not be parsed.
    #[error("invalid color literal `{literal}`: {reason}")]
    InvalidColor { literal: String, reason: String },

    /// Root materialization was requested from a tree whose root has no
    /// meaning at the requested level.
    #[error("cannot build a {target} from a {builder} builder")]
    Unsupported {
        builder: &'static str,
        target: &'static str,
    },

    /// The builder's node was released, for example by a root reset.
    #[error("builder is detached from its tree")]
    Detached,
}

/// The main error type for mapstyle operations.
#[derive(Debug, Error)]
pub enum MapStyleError {
    #[error(transparent)]
    Cql(#[from] CqlError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_messages_name_the_literal() {
        let err = BuildError::InvalidColor {
            literal: "#12".to_string(),
            reason: "expected 6 or 8 hex digits".to_string(),
        };
        assert!(err.to_string().contains("`#12`"));

        let err = BuildError::Unsupported {
            builder: "color replacement",
            target: "style",
        };
        assert_eq!(
            err.to_string(),
            "cannot build a style from a color replacement builder"
        );
    }

    #[test]
    fn test_map_style_error_from_cql() {
        let err = mapstyle_cql::expression("1 +").unwrap_err();
        let wrapped = MapStyleError::from(err.clone());
        assert_eq!(wrapped.to_string(), err.to_string());
    }
}
