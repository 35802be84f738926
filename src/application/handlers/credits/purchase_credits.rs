//! PurchaseCreditsHandler - Command handler for starting a credit checkout.

use std::sync::Arc;

use crate::domain::credits::CreditPack;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{CreateCheckoutRequest, PaymentProvider};

/// Command to start a credit pack checkout.
#[derive(Debug, Clone)]
pub struct PurchaseCreditsCommand {
    pub user_id: UserId,
    pub email: String,
    pub pack: CreditPack,
    pub success_url: String,
    pub cancel_url: String,
}

/// Result carrying the provider checkout URL.
#[derive(Debug, Clone)]
pub struct PurchaseCreditsResult {
    pub checkout_url: String,
    pub session_id: String,
}

/// Handler for starting a credit pack purchase.
///
/// Nothing is written locally at this point; credits are awarded only when
/// the payment settles (webhook or success confirmation).
pub struct PurchaseCreditsHandler {
    payment_provider: Arc<dyn PaymentProvider>,
}

impl PurchaseCreditsHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self { payment_provider }
    }

    pub async fn handle(
        &self,
        cmd: PurchaseCreditsCommand,
    ) -> Result<PurchaseCreditsResult, DomainError> {
        let session = self
            .payment_provider
            .create_credit_checkout(CreateCheckoutRequest {
                user_id: cmd.user_id.clone(),
                email: cmd.email,
                pack: cmd.pack,
                success_url: cmd.success_url,
                cancel_url: cmd.cancel_url,
            })
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            pack = cmd.pack.id(),
            session_id = %session.id,
            "credit checkout session created"
        );

        Ok(PurchaseCreditsResult {
            checkout_url: session.url,
            session_id: session.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payments::StripeEvent;
    use crate::ports::{CheckoutSession, CheckoutSessionDetails, PaymentError};
    use async_trait::async_trait;

    struct MockPaymentProvider {
        fail: bool,
    }

    #[async_trait]
    impl PaymentProvider for MockPaymentProvider {
        async fn create_credit_checkout(
            &self,
            request: CreateCheckoutRequest,
        ) -> Result<CheckoutSession, PaymentError> {
            if self.fail {
                return Err(PaymentError::network("connection refused"));
            }
            Ok(CheckoutSession {
                id: format!("cs_{}", request.pack.id()),
                url: "https://checkout.stripe.com/test".to_string(),
                expires_at: 1704153600,
            })
        }

        async fn get_checkout_session(
            &self,
            _session_id: &str,
        ) -> Result<Option<CheckoutSessionDetails>, PaymentError> {
            Ok(None)
        }

        async fn verify_webhook(
            &self,
            _payload: &[u8],
            _signature: &str,
        ) -> Result<StripeEvent, PaymentError> {
            Err(PaymentError::invalid_webhook("not implemented"))
        }
    }

    fn test_command() -> PurchaseCreditsCommand {
        PurchaseCreditsCommand {
            user_id: UserId::new("user-1").unwrap(),
            email: "user@example.com".to_string(),
            pack: CreditPack::Starter,
            success_url: "https://cosmichub.test/credits/success".to_string(),
            cancel_url: "https://cosmichub.test/credits".to_string(),
        }
    }

    #[tokio::test]
    async fn returns_checkout_url() {
        let handler = PurchaseCreditsHandler::new(Arc::new(MockPaymentProvider { fail: false }));

        let result = handler.handle(test_command()).await.unwrap();
        assert_eq!(result.checkout_url, "https://checkout.stripe.com/test");
        assert_eq!(result.session_id, "cs_starter");
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_domain_error() {
        let handler = PurchaseCreditsHandler::new(Arc::new(MockPaymentProvider { fail: true }));

        let result = handler.handle(test_command()).await;
        assert!(result.is_err());
    }
}
