// Copyright 2026 PulseCtrl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for pulse optimization.

use std::fmt;

/// Result type alias for pulse-ctrl operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Config(String),
    /// Problem or amplitude validation error
    Validation(ValidationError),
    /// Optimizer failure (solver setup or line search)
    Optimization(String),
    /// Plot rendering error
    Plot(String),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Validation(e) => write!(f, "Validation error: {}", e),
            Error::Optimization(msg) => write!(f, "Optimization error: {}", msg),
            Error::Plot(msg) => write!(f, "Plot error: {}", msg),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Validation errors for control problems and amplitude arrays.
#[derive(Debug)]
pub enum ValidationError {
    /// Field validation failed
    Field { field: String, message: String },
    /// Matrix dimension mismatch
    Dimension {
        what: String,
        expected: usize,
        actual: usize,
    },
    /// Physics constraint violated (hermiticity, unitarity)
    PhysicsConstraint(String),
    /// Resource limit exceeded
    ResourceLimit {
        resource: String,
        limit: u64,
        requested: u64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Field { field, message } => {
                write!(f, "Field '{}': {}", field, message)
            }
            ValidationError::Dimension {
                what,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Dimension mismatch for {}: expected {}, got {}",
                    what, expected, actual
                )
            }
            ValidationError::PhysicsConstraint(msg) => {
                write!(f, "Physics constraint violated: {}", msg)
            }
            ValidationError::ResourceLimit {
                resource,
                limit,
                requested,
            } => {
                write!(
                    f,
                    "Resource limit exceeded for {}: limit={}, requested={}",
                    resource, limit, requested
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_error_display_config() {
        let e = Error::Config("bad tslot count".into());
        assert_eq!(e.to_string(), "Configuration error: bad tslot count");
    }

    #[test]
    fn test_error_display_validation() {
        let e = Error::Validation(ValidationError::PhysicsConstraint("unitarity".into()));
        assert_eq!(
            e.to_string(),
            "Validation error: Physics constraint violated: unitarity"
        );
    }

    #[test]
    fn test_error_display_optimization() {
        let e = Error::Optimization("line search failed".into());
        assert_eq!(e.to_string(), "Optimization error: line search failed");
    }

    #[test]
    fn test_error_display_plot() {
        let e = Error::Plot("backend".into());
        assert_eq!(e.to_string(), "Plot error: backend");
    }

    #[test]
    fn test_error_display_io() {
        let e = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(e.to_string(), "IO error: gone");
    }

    #[test]
    fn test_validation_error_display_field() {
        let e = ValidationError::Field {
            field: "num_tslots".into(),
            message: "must be > 0".into(),
        };
        assert_eq!(e.to_string(), "Field 'num_tslots': must be > 0");
    }

    #[test]
    fn test_validation_error_display_dimension() {
        let e = ValidationError::Dimension {
            what: "control 0".into(),
            expected: 2,
            actual: 4,
        };
        assert_eq!(
            e.to_string(),
            "Dimension mismatch for control 0: expected 2, got 4"
        );
    }

    #[test]
    fn test_validation_error_display_resource_limit() {
        let e = ValidationError::ResourceLimit {
            resource: "num_tslots".into(),
            limit: 10_000,
            requested: 20_000,
        };
        assert_eq!(
            e.to_string(),
            "Resource limit exceeded for num_tslots: limit=10000, requested=20000"
        );
    }

    #[test]
    fn test_error_source_io() {
        let e = Error::Io(std::io::Error::other("disk"));
        assert!(e.source().is_some());
    }

    #[test]
    fn test_error_source_validation() {
        let e = Error::Validation(ValidationError::PhysicsConstraint("bad".into()));
        assert!(e.source().is_some());
    }

    #[test]
    fn test_error_source_none_for_config() {
        let e = Error::Config("x".into());
        assert!(e.source().is_none());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
    }

    #[test]
    fn test_from_validation_error() {
        let ve = ValidationError::PhysicsConstraint("x".into());
        let e: Error = ve.into();
        assert!(matches!(e, Error::Validation(_)));
    }

    #[test]
    fn test_from_serde_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("{{{{").unwrap_err();
        let e: Error = yaml_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let e: Error = json_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }
}
