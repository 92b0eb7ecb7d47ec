use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use deploytrack_core::LedgerError;
use serde_json::json;

/// Carries a [`LedgerError`] out of a handler as a JSON error body.
#[derive(Debug)]
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(error: LedgerError) -> Self {
        Self(error)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            LedgerError::NotFound { .. } => StatusCode::NOT_FOUND,
            LedgerError::InvalidReference(_)
            | LedgerError::InvalidStatus(_)
            | LedgerError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            LedgerError::Conflict(_) => StatusCode::CONFLICT,
            LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // storage details stay in the logs
        let message = match &self.0 {
            LedgerError::Storage(err) => {
                tracing::error!("storage failure: {:?}", err);
                "internal error".to_owned()
            }
            other => other.to_string(),
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (LedgerError::not_found("component", "api"), StatusCode::NOT_FOUND),
            (
                LedgerError::InvalidStatus("deployed".to_owned()),
                StatusCode::BAD_REQUEST,
            ),
            (
                LedgerError::InvalidArgument("environment".to_owned()),
                StatusCode::BAD_REQUEST,
            ),
            (
                LedgerError::Conflict("duplicate".to_owned()),
                StatusCode::CONFLICT,
            ),
            (
                LedgerError::Storage(anyhow::anyhow!("connection reset")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError(error).status_code(), expected);
        }
    }
}
