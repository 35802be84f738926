//! HTTP handlers for referral endpoints.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::referral::{GetOrCreateReferralCommand, RecordConversionCommand};
use crate::domain::foundation::DomainError;
use crate::domain::referral::ConversionOutcome;
use crate::domain::unlock::GatedFeature;

use super::super::{ApiError, ApiState, AuthenticatedUser, ErrorResponse};
use super::dto::{
    ConversionResponse, CreateReferralRequest, RecordConversionRequest, ReferralResponse,
};

/// POST /api/referrals - Get or create the caller's referral for a feature
pub async fn create_referral(
    State(state): State<ApiState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateReferralRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let feature = GatedFeature::parse(&request.feature).ok_or_else(|| {
        ApiError::from(DomainError::validation(
            "feature",
            format!("Unknown feature: {}", request.feature),
        ))
    })?;

    let handler = state.get_or_create_referral_handler();
    let result = handler
        .handle(GetOrCreateReferralCommand {
            user_id: user.user_id,
            feature,
            target_id: request.target_id,
        })
        .await?;

    let response = ReferralResponse {
        referral_code: result.referral.referral_code,
        feature: result.referral.feature.as_str().to_string(),
        target_id: result.referral.target_id,
        successful_referrals: result.referral.successful_referrals,
        threshold: result.threshold,
        remaining: result.remaining,
    };

    Ok(Json(response))
}

/// POST /api/referrals/convert - Record a conversion for the caller
///
/// The caller is the referred user. Self-referrals and duplicates are quiet
/// no-ops (`counted: false`); an unknown code is a 404.
pub async fn record_conversion(
    State(state): State<ApiState>,
    user: AuthenticatedUser,
    Json(request): Json<RecordConversionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.record_conversion_handler();
    let result = handler
        .handle(RecordConversionCommand {
            referral_code: request.referral_code,
            referred_user_id: user.user_id,
        })
        .await?;

    let response = match result.outcome {
        ConversionOutcome::CodeNotFound => {
            let body = ErrorResponse::new("REFERRAL_NOT_FOUND", "Unknown referral code");
            return Ok((StatusCode::NOT_FOUND, Json(body)).into_response());
        }
        outcome => ConversionResponse {
            counted: outcome.recorded(),
        },
    };

    Ok(Json(response).into_response())
}
