//! HTTP handlers for payment webhooks.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::payments::HandlePaymentWebhookCommand;
use crate::domain::payments::WebhookError;

use super::super::{ApiState, ErrorResponse};

/// POST /api/webhooks/stripe - Handle payment provider webhook events
///
/// No user authentication; authenticity comes from the signature header.
/// Unknown event types are acknowledged with 200 so the provider never
/// retry-storms us over events we do not care about.
pub async fn handle_stripe_webhook(
    State(state): State<ApiState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> axum::response::Response {
    let Some(signature) = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
    else {
        let body = ErrorResponse::new("MISSING_SIGNATURE", "Missing Stripe-Signature header");
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    };

    let handler = state.webhook_handler();
    let result = handler
        .handle(HandlePaymentWebhookCommand {
            payload: body.to_vec(),
            signature: signature.to_string(),
        })
        .await;

    match result {
        Ok(_) => StatusCode::OK.into_response(),
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                tracing::error!(error = %err, "webhook processing failed, provider will retry");
            } else {
                tracing::warn!(error = %err, "webhook rejected");
            }
            let body = ErrorResponse::new(error_code(&err), err.to_string());
            (status, Json(body)).into_response()
        }
    }
}

fn error_code(err: &WebhookError) -> &'static str {
    match err {
        WebhookError::InvalidSignature | WebhookError::TimestampOutOfRange => "INVALID_SIGNATURE",
        WebhookError::ParseError(_) => "PARSE_ERROR",
        WebhookError::MissingMetadata(_) | WebhookError::MissingField(_) => "MISSING_FIELD",
        WebhookError::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
        WebhookError::InvalidTransition(_) => "INVALID_STATE_TRANSITION",
        WebhookError::Ignored(_) => "IGNORED",
        WebhookError::Database(_) => "INTERNAL_ERROR",
    }
}
