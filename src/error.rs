use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Rejected before any upstream call.
    #[error("{0}")]
    Validation(String),
    /// Embedding, search or completion failure. The provider's text is
    /// passed through to the caller.
    #[error("{0:#}")]
    Upstream(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    output: String,
}

impl From<JsonRejection> for RelayError {
    fn from(rejection: JsonRejection) -> Self {
        RelayError::Validation(rejection.body_text())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match &self {
            RelayError::Validation(reason) => {
                tracing::warn!(%reason, "rejected request");
                StatusCode::BAD_REQUEST
            }
            RelayError::Upstream(e) => {
                tracing::error!(error = %format!("{:#}", e), "upstream call failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ErrorBody { output: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn validation_maps_to_bad_request() {
        let response = RelayError::Validation("Please enter a valid text".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_maps_to_server_error_with_full_chain() {
        let error = RelayError::from(anyhow!("connection refused").context("Embedding request failed"));

        assert_eq!(error.to_string(), "Embedding request failed: connection refused");
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
