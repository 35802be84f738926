//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe integration, including:
//!
//! - Checkout session creation for credit packs
//! - Checkout session retrieval for success confirmation
//! - Webhook signature verification (HMAC-SHA256, constant-time)

mod stripe_adapter;
mod unavailable_provider;
mod webhook_types;

pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
pub use unavailable_provider::UnavailablePaymentProvider;
pub use webhook_types::{SignatureHeader, SignatureParseError};
