//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe REST API.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::payments::StripeEvent;
use crate::ports::{
    CheckoutSession, CheckoutSessionDetails, CreateCheckoutRequest, PaymentError, PaymentErrorCode,
    PaymentProvider,
};

use super::webhook_types::{hex_encode, SignatureHeader, StripeCheckoutSession};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Whether to require livemode events in production.
    require_livemode: bool,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            require_livemode: false,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Require livemode events in production.
    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Verify webhook signature using HMAC-SHA256.
    ///
    /// # Security
    ///
    /// - Uses constant-time comparison to prevent timing attacks
    /// - Validates timestamp to prevent replay attacks
    fn verify_signature(
        &self,
        payload: &[u8],
        header: &SignatureHeader,
    ) -> Result<(), PaymentError> {
        // 1. Validate timestamp (prevent replay attacks)
        let now = chrono::Utc::now().timestamp();
        let age = now - header.timestamp;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                age_secs = age,
                "Webhook event too old - possible replay attack"
            );
            return Err(PaymentError::invalid_webhook(format!(
                "Event too old ({} seconds)",
                age
            )));
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                "Webhook event from future - clock skew or manipulation"
            );
            return Err(PaymentError::invalid_webhook("Event timestamp in future"));
        }

        // 2. Compute expected signature
        let signed_payload = format!("{}.{}", header.timestamp, String::from_utf8_lossy(payload));

        let mut mac =
            HmacSha256::new_from_slice(self.config.webhook_secret.expose_secret().as_bytes())
                .expect("HMAC can take key of any size");

        mac.update(signed_payload.as_bytes());
        let expected = mac.finalize().into_bytes();

        // 3. Constant-time comparison
        let expected_bytes: &[u8] = expected.as_slice();
        let provided_bytes: &[u8] = &header.v1_signature;

        if expected_bytes.ct_eq(provided_bytes).unwrap_u8() != 1 {
            tracing::warn!(
                expected_signature = hex_encode(expected_bytes),
                "Invalid webhook signature"
            );
            return Err(PaymentError::invalid_webhook("Invalid signature"));
        }

        Ok(())
    }

    async fn read_session(
        &self,
        response: reqwest::Response,
    ) -> Result<StripeCheckoutSession, PaymentError> {
        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "Stripe checkout session call failed");
            return Err(PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Stripe API error: {}", error_text),
            ));
        }

        response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse Stripe response: {}", e),
            )
        })
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_credit_checkout(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let pack = request.pack;

        let params = vec![
            ("mode", "payment".to_string()),
            ("customer_email", request.email.clone()),
            ("success_url", request.success_url.clone()),
            ("cancel_url", request.cancel_url.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            ("line_items[0][price_data][currency]", "usd".to_string()),
            (
                "line_items[0][price_data][unit_amount]",
                pack.price_cents().to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                pack.display_name().to_string(),
            ),
            ("metadata[user_id]", request.user_id.to_string()),
            ("metadata[credit_pack_id]", pack.id().to_string()),
            ("metadata[credits_to_award]", pack.credits().to_string()),
            (
                "payment_intent_data[metadata][user_id]",
                request.user_id.to_string(),
            ),
            (
                "payment_intent_data[metadata][credits_to_award]",
                pack.credits().to_string(),
            ),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let session = self.read_session(response).await?;

        let checkout_url = session.url.ok_or_else(|| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                "Checkout session created without a URL",
            )
        })?;

        Ok(CheckoutSession {
            id: session.id,
            url: checkout_url,
            expires_at: session.expires_at,
        })
    }

    async fn get_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<Option<CheckoutSessionDetails>, PaymentError> {
        let url = format!(
            "{}/v1/checkout/sessions/{}",
            self.config.api_base_url, session_id
        );

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let session = self.read_session(response).await?;

        Ok(Some(CheckoutSessionDetails {
            id: session.id,
            payment_intent_id: session.payment_intent,
            payment_status: session.payment_status,
            metadata: session.metadata,
        }))
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<StripeEvent, PaymentError> {
        let header = SignatureHeader::parse(signature)
            .map_err(|e| PaymentError::invalid_webhook(e.to_string()))?;

        self.verify_signature(payload, &header)?;

        let event: StripeEvent = serde_json::from_slice(payload).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse webhook payload");
            PaymentError::invalid_webhook(format!("Invalid JSON: {}", e))
        })?;

        if self.config.require_livemode && !event.livemode {
            tracing::warn!(event_id = %event.id, "Rejected test mode event in production");
            return Err(PaymentError::invalid_webhook(
                "Test mode events not allowed in production",
            ));
        }

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Signs a payload the way Stripe does, for round-trip verification.
    fn sign(secret: &str, timestamp: i64, payload: &[u8]) -> String {
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed_payload.as_bytes());
        format!("t={},v1={}", timestamp, hex_encode(&mac.finalize().into_bytes()))
    }

    fn adapter(secret: &str) -> StripePaymentAdapter {
        StripePaymentAdapter::new(StripeConfig::new("sk_test_123", secret))
    }

    fn event_payload() -> Vec<u8> {
        br#"{
            "id": "evt_1",
            "type": "payment_intent.succeeded",
            "created": 1704067200,
            "data": {"object": {"id": "pi_1"}},
            "livemode": false
        }"#
        .to_vec()
    }

    #[tokio::test]
    async fn valid_signature_verifies_and_parses() {
        let secret = "whsec_test";
        let payload = event_payload();
        let signature = sign(secret, chrono::Utc::now().timestamp(), &payload);

        let event = adapter(secret)
            .verify_webhook(&payload, &signature)
            .await
            .unwrap();

        assert_eq!(event.id, "evt_1");
        assert_eq!(event.event_type, "payment_intent.succeeded");
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let payload = event_payload();
        let signature = sign("whsec_other", chrono::Utc::now().timestamp(), &payload);

        let result = adapter("whsec_test").verify_webhook(&payload, &signature).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn tampered_payload_is_rejected() {
        let secret = "whsec_test";
        let payload = event_payload();
        let signature = sign(secret, chrono::Utc::now().timestamp(), &payload);

        let mut tampered = payload.clone();
        tampered[10] ^= 0x01;

        let result = adapter(secret).verify_webhook(&tampered, &signature).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn stale_timestamp_is_rejected() {
        let secret = "whsec_test";
        let payload = event_payload();
        let stale = chrono::Utc::now().timestamp() - MAX_TIMESTAMP_AGE_SECS - 10;
        let signature = sign(secret, stale, &payload);

        let result = adapter(secret).verify_webhook(&payload, &signature).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn future_timestamp_is_rejected() {
        let secret = "whsec_test";
        let payload = event_payload();
        let future = chrono::Utc::now().timestamp() + MAX_FUTURE_TOLERANCE_SECS + 10;
        let signature = sign(secret, future, &payload);

        let result = adapter(secret).verify_webhook(&payload, &signature).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn garbled_header_is_rejected() {
        let result = adapter("whsec_test")
            .verify_webhook(&event_payload(), "not-a-signature")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mode_event_rejected_when_livemode_required() {
        let secret = "whsec_test";
        let config = StripeConfig::new("sk_live_123", secret).with_require_livemode(true);
        let adapter = StripePaymentAdapter::new(config);

        let payload = event_payload(); // livemode: false
        let signature = sign(secret, chrono::Utc::now().timestamp(), &payload);

        let result = adapter.verify_webhook(&payload, &signature).await;
        assert!(result.is_err());
    }
}
