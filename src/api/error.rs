//! HTTP error mapping.

use crate::core::{Error, ErrorKind};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

/// Failure of an HTTP handler.
#[derive(Debug)]
pub enum ApiError {
    /// Engine failure
    Engine(Error),
    /// No resolved identity on the request
    Unauthenticated,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Engine(err) => match err.kind() {
                ErrorKind::Validation | ErrorKind::InvalidState | ErrorKind::Config => {
                    StatusCode::BAD_REQUEST
                }
                ErrorKind::Authorization => StatusCode::FORBIDDEN,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Unauthenticated => ErrorBody {
                kind: "UNAUTHENTICATED".to_string(),
                message: "missing caller identity".to_string(),
            },
            ApiError::Engine(err) => ErrorBody {
                kind: err.kind().as_str().to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Engine(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(status = %status, error = ?self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
