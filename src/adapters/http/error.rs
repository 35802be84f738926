//! API error envelope and status mapping.

use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::domain::credits::CreditError;
use crate::domain::foundation::{DomainError, ErrorCode};

/// JSON error body returned for every failed request.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Stable machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// API error type that converts domain errors to HTTP responses.
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<CreditError> for ApiError {
    fn from(err: CreditError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,
            ErrorCode::UserNotFound
            | ErrorCode::ReferralNotFound
            | ErrorCode::SubscriptionNotFound => StatusCode::NOT_FOUND,
            ErrorCode::InsufficientCredits | ErrorCode::PaymentFailed => {
                StatusCode::PAYMENT_REQUIRED
            }
            ErrorCode::Unauthorized | ErrorCode::InvalidWebhookSignature => {
                StatusCode::UNAUTHORIZED
            }
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::InvalidStateTransition | ErrorCode::FeatureAlreadyUnlocked => {
                StatusCode::CONFLICT
            }
            ErrorCode::PaymentUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::SelfReferral
            | ErrorCode::DuplicateConversion
            | ErrorCode::DuplicateReference => StatusCode::OK,
            ErrorCode::DatabaseError
            | ErrorCode::ExternalServiceError
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse::new(self.0.code.to_string(), self.0.message.clone());
        (status, Json(body)).into_response()
    }
}
