//! HTTP handlers for rarity endpoints.

use axum::extract::{Json, Query, State};
use axum::response::IntoResponse;

use crate::application::handlers::rarity::CalculateRarityQuery;

use super::super::ApiState;
use super::dto::{RarityParams, RarityResponse};

/// GET /api/rarity?birthdate=YYYY-MM-DD - Calculate a birthdate's rarity
///
/// Public endpoint. Malformed dates never fail; the handler serves the
/// default score and logs the fallback.
pub async fn calculate_rarity(
    State(state): State<ApiState>,
    Query(params): Query<RarityParams>,
) -> impl IntoResponse {
    let handler = state.calculate_rarity_handler();
    let result = handler.handle(CalculateRarityQuery {
        birthdate: params.birthdate,
    });

    Json(RarityResponse {
        score: result.score,
        label: result.band.label(),
        color: result.band.color(),
    })
}
