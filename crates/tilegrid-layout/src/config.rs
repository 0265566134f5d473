#![forbid(unsafe_code)]

//! Grid configuration as data.
//!
//! A [`GridConfig`] fixes the initial column/row counts and the uniform tile
//! margin. It can be built in code or, with the `config` feature, loaded
//! from TOML or JSON:
//!
//! ```toml
//! # dashboard.toml
//! columns = 6
//! rows = 4
//! tile_margin = 6.0
//! ```
//!
//! ```rust,ignore
//! let config = GridConfig::from_toml_file("dashboard.toml")?.validated()?;
//! let panel = DashboardPanel::new(config);
//! ```
//!
//! Missing keys take their defaults (4 x 4 grid, 4px margin).

#[cfg(feature = "config")]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::GridDims;

/// Default uniform tile margin in pixels.
pub const DEFAULT_TILE_MARGIN: f64 = 4.0;

/// Panel construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of grid columns.
    pub columns: u16,
    /// Number of grid rows.
    pub rows: u16,
    /// Pixels removed from each side of a tile's cell rectangle.
    pub tile_margin: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        let dims = GridDims::default();
        Self {
            columns: dims.columns,
            rows: dims.rows,
            tile_margin: DEFAULT_TILE_MARGIN,
        }
    }
}

impl GridConfig {
    /// Grid dimensions described by this config.
    #[must_use]
    pub const fn dims(&self) -> GridDims {
        GridDims::new(self.columns, self.rows)
    }

    /// Margin actually applied: negative or non-finite values become 0.
    #[must_use]
    pub fn effective_margin(&self) -> f64 {
        if self.tile_margin.is_finite() {
            self.tile_margin.max(0.0)
        } else {
            0.0
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, GridConfigError> {
        toml::from_str(s).map_err(GridConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, GridConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(GridConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, GridConfigError> {
        serde_json::from_str(s).map_err(GridConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GridConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(GridConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid. The panel itself tolerates every value reported here; a
    /// zero-sized grid simply places nothing.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.columns == 0 {
            errors.push("columns must be > 0".into());
        }
        if self.rows == 0 {
            errors.push("rows must be > 0".into());
        }
        if !self.tile_margin.is_finite() {
            errors.push(format!("tile_margin must be finite, got {}", self.tile_margin));
        } else if self.tile_margin < 0.0 {
            errors.push(format!("tile_margin must be >= 0, got {}", self.tile_margin));
        }

        errors
    }

    /// Consume the config, returning it only if [`validate`](Self::validate)
    /// reports nothing.
    pub fn validated(self) -> Result<Self, GridConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(GridConfigError::Validation(errors))
        }
    }
}

/// Errors from loading or validating a [`GridConfig`].
#[derive(Debug)]
pub enum GridConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for GridConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for GridConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_validates_clean() {
        let errors = GridConfig::default().validate();
        assert!(errors.is_empty(), "default should validate: {errors:?}");
        assert_eq!(GridConfig::default().dims(), GridDims::new(4, 4));
    }

    #[test]
    fn validate_catches_zero_dims() {
        let config = GridConfig {
            columns: 0,
            rows: 0,
            ..GridConfig::default()
        };
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("columns")));
        assert!(errors.iter().any(|e| e.contains("rows")));
    }

    #[test]
    fn validate_catches_bad_margin() {
        let mut config = GridConfig::default();
        config.tile_margin = -1.0;
        assert!(config.validate().iter().any(|e| e.contains("tile_margin")));
        config.tile_margin = f64::NAN;
        assert!(config.validate().iter().any(|e| e.contains("finite")));
        assert_eq!(config.effective_margin(), 0.0);
    }

    #[test]
    fn validated_wraps_errors() {
        let config = GridConfig {
            rows: 0,
            ..GridConfig::default()
        };
        match config.validated() {
            Err(GridConfigError::Validation(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn effective_margin_floors_negative() {
        let config = GridConfig {
            tile_margin: -3.0,
            ..GridConfig::default()
        };
        assert_eq!(config.effective_margin(), 0.0);
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_fills_missing_keys() {
        let config = GridConfig::from_toml_str("columns = 6\n").expect("valid toml");
        assert_eq!(config.columns, 6);
        assert_eq!(config.rows, 4);
        assert_eq!(config.tile_margin, DEFAULT_TILE_MARGIN);
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_round_trip() {
        let config = GridConfig {
            columns: 8,
            rows: 3,
            tile_margin: 2.5,
        };
        let json = serde_json::to_string(&config).expect("serialize");
        assert_eq!(GridConfig::from_json_str(&json).expect("parse"), config);
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_parse_error_is_reported() {
        let err = GridConfig::from_toml_str("columns = \"many\"").expect_err("type mismatch");
        assert!(err.to_string().starts_with("TOML parse error"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn missing_file_is_io_error() {
        let err = GridConfig::from_json_file("/nonexistent/tilegrid/dashboard.json")
            .expect_err("missing file");
        assert!(matches!(err, GridConfigError::Io(_)));
    }
}
