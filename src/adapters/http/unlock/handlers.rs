//! HTTP handlers for unlock endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::response::IntoResponse;

use crate::application::handlers::unlock::{CheckAccessQuery, UnlockFeatureCommand};
use crate::domain::foundation::DomainError;
use crate::domain::unlock::GatedFeature;

use super::super::{ApiError, ApiState, AuthenticatedUser};
use super::dto::{AccessParams, AccessResponse, UnlockRequest, UnlockResponse};

fn parse_feature(raw: &str) -> Result<GatedFeature, ApiError> {
    GatedFeature::parse(raw).ok_or_else(|| {
        ApiError::from(DomainError::validation(
            "feature",
            format!("Unknown feature: {}", raw),
        ))
    })
}

/// GET /api/unlock/:feature/access - Check access without changing state
pub async fn check_access(
    State(state): State<ApiState>,
    user: AuthenticatedUser,
    Path(feature): Path<String>,
    Query(params): Query<AccessParams>,
) -> Result<impl IntoResponse, ApiError> {
    let feature = parse_feature(&feature)?;

    let handler = state.check_access_handler();
    let result = handler
        .handle(CheckAccessQuery {
            user_id: user.user_id,
            feature,
            target_id: params.target_id,
        })
        .await?;

    Ok(Json(AccessResponse::from(result.decision)))
}

/// POST /api/unlock/:feature - Unlock a gated feature
///
/// Deducts credits only when the paid path wins; subscription and referral
/// unlocks spend nothing. Repeats are idempotent.
pub async fn unlock_feature(
    State(state): State<ApiState>,
    user: AuthenticatedUser,
    Path(feature): Path<String>,
    Json(request): Json<UnlockRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let feature = parse_feature(&feature)?;

    let handler = state.unlock_feature_handler();
    let result = handler
        .handle(UnlockFeatureCommand {
            user_id: user.user_id,
            feature,
            target_id: request.target_id,
        })
        .await?;

    Ok(Json(UnlockResponse {
        method: result.method,
        credits_spent: result.credits_spent,
        already_unlocked: result.already_unlocked,
    }))
}
