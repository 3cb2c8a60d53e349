//! HTTP boundary errors.
//!
//! Every client-visible failure uses the same BLOCKED body as a refused
//! estimate:
//!
//! ```json
//! {"status": "BLOCKED", "clarification_notes": ["Server error — check input format"]}
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use inkquote_core::EstimateResponse;
use tracing::{error, warn};

use crate::state::ReloadError;

/// Note returned for unreadable requests and handler panics.
pub const SERVER_ERROR_NOTE: &str = "Server error — check input format";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body missing, not JSON, or not shaped like the endpoint's request.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// A handler panicked.
    #[error("Handler panicked: {0}")]
    Panic(String),

    /// `/rules/reload` could not install new rules.
    #[error("Rule reload failed: {0}")]
    Reload(#[from] ReloadError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, note) = match &self {
            ApiError::MalformedRequest(detail) => {
                warn!(detail = %detail, "Rejected malformed request");
                (StatusCode::BAD_REQUEST, SERVER_ERROR_NOTE.to_string())
            }
            ApiError::Panic(detail) => {
                error!(detail = %detail, "Handler panicked");
                (StatusCode::BAD_REQUEST, SERVER_ERROR_NOTE.to_string())
            }
            ApiError::Reload(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        (status, Json(EstimateResponse::blocked(vec![note]))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkquote_rules::RulesError;
    use std::path::PathBuf;

    #[test]
    fn test_status_codes() {
        let response = ApiError::MalformedRequest("EOF while parsing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Panic("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let missing = RulesError::MissingFile(PathBuf::from("rules/products.csv"));
        let response = ApiError::from(ReloadError::from(missing)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_reload_note_names_the_problem() {
        let err = ApiError::from(ReloadError::from(RulesError::invalid_row("addons.csv", 3, "unit_price is required")));
        assert_eq!(err.to_string(), "Rule reload failed: addons.csv:3: unit_price is required");
    }
}
