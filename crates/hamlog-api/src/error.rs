//! JSON error bodies and the mapping from QSO outcomes to HTTP statuses

use axum::{http::StatusCode, response::Json};
use hamlog_core::QsoError;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// The record broke a business rule
pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
/// Query string or body could not be accepted
pub const INVALID_PARAMETERS: &str = "INVALID_PARAMETERS";
/// Path and body identify different records
pub const ID_MISMATCH: &str = "ID_MISMATCH";
/// No record with the requested id
pub const QSO_NOT_FOUND: &str = "QSO_NOT_FOUND";
/// Storage failed
pub const DATABASE_ERROR: &str = "DATABASE_ERROR";

/// Error response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    /// Additional details
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Error body without details
    #[must_use]
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            details: None,
        }
    }

    /// Attach structured details
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Rejection returned by every handler
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Build an [`ApiError`]
#[must_use]
pub fn api_error(status: StatusCode, body: ErrorResponse) -> ApiError {
    (status, Json(body))
}

/// Map a failed QSO operation to its HTTP response
#[must_use]
pub fn qso_error(err: QsoError) -> ApiError {
    match err {
        QsoError::Validation(e) => {
            warn!(reason = %e, "QSO rejected by validation");
            api_error(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(e.message(), VALIDATION_FAILED),
            )
        }
        QsoError::IdMismatch { path_id, body_id } => {
            warn!(path_id, body_id, "QSO id in body does not match path");
            api_error(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("QSO id in body does not match the URL", ID_MISMATCH)
                    .with_details(serde_json::json!({ "pathId": path_id, "bodyId": body_id })),
            )
        }
        QsoError::NotFound { id } => {
            info!(id, "QSO not found");
            api_error(
                StatusCode::NOT_FOUND,
                ErrorResponse::new(format!("QSO {id} not found"), QSO_NOT_FOUND),
            )
        }
        QsoError::Storage(e) => {
            error!(error = %e, "QSO storage failure");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Failed to access QSO storage", DATABASE_ERROR),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamlog_core::{Error, Validator};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = Validator::default().validate(None).unwrap_err();

        let (status, Json(body)) = qso_error(QsoError::Validation(err));

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "QSO data is required.");
        assert_eq!(body.code, VALIDATION_FAILED);
        assert!(body.details.is_none());
    }

    #[test]
    fn test_id_mismatch_carries_both_ids() {
        let (status, Json(body)) = qso_error(QsoError::IdMismatch {
            path_id: 1,
            body_id: 2,
        });

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, ID_MISMATCH);
        assert_eq!(
            body.details,
            Some(serde_json::json!({ "pathId": 1, "bodyId": 2 }))
        );
    }

    #[test]
    fn test_not_found() {
        let (status, Json(body)) = qso_error(QsoError::NotFound { id: 9 });

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, QSO_NOT_FOUND);
    }

    #[test]
    fn test_storage_failure_hides_internals() {
        let (status, Json(body)) = qso_error(QsoError::Storage(Error::Database(
            "no such table: qsos".to_string(),
        )));

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, DATABASE_ERROR);
        assert!(!body.error.contains("qsos"));
    }
}
