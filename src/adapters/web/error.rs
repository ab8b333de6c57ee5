//! HTTP error bodies. Maps `DomainError` onto status codes.

use crate::domain::{CompletionError, DomainError};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn from_domain(err: DomainError, request_id: Option<String>) -> Self {
        let (status, error) = match &err {
            DomainError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
            DomainError::MalformedCompletion(_) => {
                (StatusCode::BAD_GATEWAY, "Malformed completion")
            }
            DomainError::CompletionService(kind) => match kind {
                CompletionError::QuotaExceeded(_) => {
                    (StatusCode::TOO_MANY_REQUESTS, "Completion quota exceeded")
                }
                CompletionError::Timeout => {
                    (StatusCode::GATEWAY_TIMEOUT, "Completion service timed out")
                }
                CompletionError::InvalidResponse(_) => {
                    (StatusCode::BAD_GATEWAY, "Completion service error")
                }
                CompletionError::ServiceUnavailable(_) | CompletionError::Cancelled => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Completion service unavailable",
                ),
            },
            DomainError::Frontend(_) | DomainError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %err, "unhandled error");
            "An unexpected error occurred. Please try again later.".to_string()
        } else {
            if status.is_server_error() {
                tracing::error!(error = %err, status = status.as_u16(), "consultation failed");
            }
            err.to_string()
        };

        Self {
            status,
            body: ErrorBody {
                error: error.to_string(),
                detail: Some(detail),
                request_id,
            },
        }
    }

    pub fn rejected(rejection: JsonRejection, request_id: Option<String>) -> Self {
        Self {
            status: rejection.status(),
            body: ErrorBody {
                error: "Invalid request body".to_string(),
                detail: Some(rejection.body_text()),
                request_id,
            },
        }
    }
}

/// Gives the bare 504 emitted by the request timeout layer the standard error body.
/// Handler errors already carry a JSON body and pass through untouched.
pub async fn fill_timeout_body(response: Response) -> Response {
    if response.status() != StatusCode::GATEWAY_TIMEOUT
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    tracing::warn!(request_id = ?request_id, "request timed out");
    let mut filled = ApiError {
        status: StatusCode::GATEWAY_TIMEOUT,
        body: ErrorBody {
            error: "Request timed out".to_string(),
            detail: Some("The consultation did not finish in time. Please try again.".to_string()),
            request_id,
        },
    }
    .into_response();
    for (name, value) in response.headers() {
        if name != header::CONTENT_LENGTH && !filled.headers().contains_key(name) {
            filled.headers_mut().insert(name.clone(), value.clone());
        }
    }
    filled
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
