//! HTTP DTOs for credit endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::credits::{CreditTransaction, TransactionType};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a credit pack checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseCreditsRequest {
    /// Pack id: "starter", "plus", or "pro".
    pub pack: String,
    /// User's email for checkout pre-fill.
    pub email: String,
    /// URL to redirect after successful checkout.
    pub success_url: String,
    /// URL to redirect after cancelled checkout.
    pub cancel_url: String,
}

/// Query parameters for the checkout success redirect.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSuccessParams {
    pub session_id: String,
}

/// Request to grant bonus credits (admin).
#[derive(Debug, Clone, Deserialize)]
pub struct GrantBonusRequest {
    pub user_id: String,
    pub amount: u32,
    #[serde(default)]
    pub note: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response carrying the checkout URL.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
    pub session_id: String,
}

/// Response for the success confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSuccessResponse {
    /// "credited", "already_credited", or "pending".
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_added: Option<u32>,
}

/// Balance plus recent transactions.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceResponse {
    pub balance: u32,
    pub transactions: Vec<TransactionResponse>,
}

/// One ledger row for API consumption.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionResponse {
    pub id: String,
    pub amount: i64,
    pub transaction_type: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
    /// ISO 8601.
    pub created_at: String,
}

impl From<CreditTransaction> for TransactionResponse {
    fn from(tx: CreditTransaction) -> Self {
        Self {
            id: tx.id.to_string(),
            amount: tx.amount,
            transaction_type: tx.transaction_type,
            related_type: tx.related_type,
            related_id: tx.related_id,
            created_at: tx.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Response after a bonus grant.
#[derive(Debug, Clone, Serialize)]
pub struct GrantBonusResponse {
    pub balance: u32,
}
