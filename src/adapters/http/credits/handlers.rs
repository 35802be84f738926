//! HTTP handlers for credit endpoints.

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::credits::{
    ConfirmCheckoutCommand, ConfirmCheckoutResult, GetBalanceQuery, GrantBonusCommand,
    PurchaseCreditsCommand,
};
use crate::domain::credits::CreditPack;
use crate::domain::foundation::{DomainError, UserId};

use super::super::{ApiError, ApiState, AuthenticatedUser};
use super::dto::{
    BalanceResponse, CheckoutResponse, CheckoutSuccessParams, CheckoutSuccessResponse,
    GrantBonusRequest, GrantBonusResponse, PurchaseCreditsRequest, TransactionResponse,
};

const HISTORY_LIMIT: u32 = 50;

/// GET /api/credits - Current balance and recent ledger history
pub async fn get_credits(
    State(state): State<ApiState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.get_balance_handler();
    let result = handler
        .handle(GetBalanceQuery {
            user_id: user.user_id,
            history_limit: HISTORY_LIMIT,
        })
        .await?;

    let response = BalanceResponse {
        balance: result.balance,
        transactions: result
            .history
            .into_iter()
            .map(TransactionResponse::from)
            .collect(),
    };

    Ok(Json(response))
}

/// POST /api/credits/purchase - Start a credit pack checkout
pub async fn purchase_credits(
    State(state): State<ApiState>,
    user: AuthenticatedUser,
    Json(request): Json<PurchaseCreditsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pack = CreditPack::from_id(&request.pack).ok_or_else(|| {
        ApiError::from(DomainError::validation(
            "pack",
            format!("Unknown credit pack: {}", request.pack),
        ))
    })?;

    let handler = state.purchase_credits_handler();
    let result = handler
        .handle(PurchaseCreditsCommand {
            user_id: user.user_id,
            email: request.email,
            pack,
            success_url: request.success_url,
            cancel_url: request.cancel_url,
        })
        .await?;

    let response = CheckoutResponse {
        checkout_url: result.checkout_url,
        session_id: result.session_id,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/credits/success?session_id= - Confirm a completed checkout
///
/// No authentication: this is the redirect target and the session id is the
/// correlation secret. Awarding is idempotent against the webhook path.
pub async fn checkout_success(
    State(state): State<ApiState>,
    Query(params): Query<CheckoutSuccessParams>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.confirm_checkout_handler();
    let result = handler
        .handle(ConfirmCheckoutCommand {
            session_id: params.session_id,
        })
        .await?;

    let response = match result {
        ConfirmCheckoutResult::Credited { amount, .. } => CheckoutSuccessResponse {
            status: "credited",
            credits_added: Some(amount),
        },
        ConfirmCheckoutResult::AlreadyCredited => CheckoutSuccessResponse {
            status: "already_credited",
            credits_added: None,
        },
        ConfirmCheckoutResult::NotPaid => CheckoutSuccessResponse {
            status: "pending",
            credits_added: None,
        },
    };

    Ok(Json(response))
}

/// POST /api/credits/grant - Grant bonus credits
pub async fn grant_bonus(
    State(state): State<ApiState>,
    _admin: AuthenticatedUser, // Would check admin role in production
    Json(request): Json<GrantBonusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = UserId::new(request.user_id)
        .map_err(|e| ApiError::from(DomainError::validation("user_id", e.to_string())))?;

    let handler = state.grant_bonus_handler();
    let result = handler
        .handle(GrantBonusCommand {
            user_id,
            amount: request.amount,
            note: request.note,
        })
        .await?;

    Ok(Json(GrantBonusResponse {
        balance: result.balance,
    }))
}
