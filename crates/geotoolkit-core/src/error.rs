//! Error types for geotoolkit

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeotoolkitError {
    // Geometry errors
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("Operation '{operation}' does not support {found} geometries")]
    UnsupportedGeometry { operation: String, found: String },

    // Parameter errors
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    // Projection errors
    #[error("Projection from EPSG:{from} to EPSG:{to} failed: {reason}")]
    Projection { from: u32, to: u32, reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GeotoolkitError {
    /// Shorthand for an invalid-geometry error
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        GeotoolkitError::InvalidGeometry { reason: reason.into() }
    }

    /// Shorthand for an invalid-parameter error
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        GeotoolkitError::InvalidParameter { name: name.into(), reason: reason.into() }
    }

    /// Shorthand for an unsupported-geometry error
    pub fn unsupported(operation: impl Into<String>, found: impl Into<String>) -> Self {
        GeotoolkitError::UnsupportedGeometry {
            operation: operation.into(),
            found: found.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeotoolkitError>;
