//! Fallback provider used when payment configuration is absent.
//!
//! Missing Stripe keys are a configuration error for the payment feature
//! only: the rest of the site keeps working and every payment call fails
//! with a generic "payment system unavailable" message, never a stack
//! trace.

use async_trait::async_trait;

use crate::domain::payments::StripeEvent;
use crate::ports::{
    CheckoutSession, CheckoutSessionDetails, CreateCheckoutRequest, PaymentError, PaymentProvider,
};

/// Provider that rejects every call with a generic unavailability error.
pub struct UnavailablePaymentProvider;

impl UnavailablePaymentProvider {
    fn unavailable() -> PaymentError {
        PaymentError::authentication("Payment system unavailable")
    }
}

#[async_trait]
impl PaymentProvider for UnavailablePaymentProvider {
    async fn create_credit_checkout(
        &self,
        _request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        Err(Self::unavailable())
    }

    async fn get_checkout_session(
        &self,
        _session_id: &str,
    ) -> Result<Option<CheckoutSessionDetails>, PaymentError> {
        Err(Self::unavailable())
    }

    async fn verify_webhook(
        &self,
        _payload: &[u8],
        _signature: &str,
    ) -> Result<StripeEvent, PaymentError> {
        Err(Self::unavailable())
    }
}
