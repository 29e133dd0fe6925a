//! Error types for hamlog

use thiserror::Error;

use crate::types::QsoId;

/// Main error type for hamlog infrastructure failures
///
/// Expected business outcomes (validation failures, missing records) are not
/// represented here; see [`crate::service::QsoError`].
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// An update matched no row
    #[error("Update conflict: QSO {id} was not written")]
    Conflict {
        /// Identifier of the record that could not be updated
        id: QsoId,
    },
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::error::Error as StdError;

    #[test]
    fn test_configuration_error() {
        let error = Error::Configuration {
            message: "Invalid database URL".to_string(),
        };

        assert_eq!(error.to_string(), "Configuration error: Invalid database URL");
    }

    #[test]
    fn test_conflict_error() {
        let error = Error::Conflict { id: 42 };
        assert_eq!(error.to_string(), "Update conflict: QSO 42 was not written");
        assert!(error.source().is_none());
    }

    #[test]
    fn test_config_error_conversion() {
        let error = Error::from(config::ConfigError::NotFound("server.port".to_string()));
        assert!(matches!(error, Error::Configuration { .. }));
        assert!(error.to_string().contains("server.port"));
    }
}
