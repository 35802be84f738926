//! ConfirmCheckoutHandler - Command handler for the checkout success page.
//!
//! The success redirect races the webhook: both paths award credits keyed
//! by the same payment-intent reference id, so whichever lands second is a
//! ledger-level no-op.

use std::sync::Arc;

use crate::domain::credits::{CreditTransaction, TransactionReference};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::{CreditLedger, CreditOutcome, PaymentProvider};

/// Command to confirm a checkout session after redirect.
#[derive(Debug, Clone)]
pub struct ConfirmCheckoutCommand {
    pub session_id: String,
}

/// Result of the confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmCheckoutResult {
    /// Credits awarded now.
    Credited { user_id: UserId, amount: u32 },

    /// The webhook got there first; nothing more to do.
    AlreadyCredited,

    /// The session exists but the payment has not settled.
    NotPaid,
}

/// Handler for confirming a checkout session in-request.
pub struct ConfirmCheckoutHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    ledger: Arc<dyn CreditLedger>,
}

impl ConfirmCheckoutHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>, ledger: Arc<dyn CreditLedger>) -> Self {
        Self {
            payment_provider,
            ledger,
        }
    }

    pub async fn handle(
        &self,
        cmd: ConfirmCheckoutCommand,
    ) -> Result<ConfirmCheckoutResult, DomainError> {
        let session = self
            .payment_provider
            .get_checkout_session(&cmd.session_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ValidationFailed,
                    format!("Unknown checkout session: {}", cmd.session_id),
                )
            })?;

        if !session.is_paid() {
            return Ok(ConfirmCheckoutResult::NotPaid);
        }

        let payment_intent_id = session.payment_intent_id.clone().ok_or_else(|| {
            DomainError::new(
                ErrorCode::ExternalServiceError,
                "Paid session without payment intent",
            )
        })?;

        let user_id = session
            .metadata
            .get("user_id")
            .and_then(|s| UserId::new(s.clone()).ok())
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ValidationFailed, "Session missing user_id metadata")
            })?;

        let amount: u32 = session
            .metadata
            .get("credits_to_award")
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ValidationFailed,
                    "Session missing credits_to_award metadata",
                )
            })?;

        let transaction = CreditTransaction::purchase(
            user_id.clone(),
            amount,
            TransactionReference::purchase(payment_intent_id),
            serde_json::json!({ "checkout_session": session.id }),
        );

        match self.ledger.credit(&transaction).await.map_err(DomainError::from)? {
            CreditOutcome::Applied => {
                tracing::info!(user_id = %user_id, amount, "credits awarded via checkout confirmation");
                Ok(ConfirmCheckoutResult::Credited { user_id, amount })
            }
            CreditOutcome::Duplicate => Ok(ConfirmCheckoutResult::AlreadyCredited),
        }
    }
}
