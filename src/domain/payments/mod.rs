//! Payments domain module.
//!
//! Models the payment provider's webhook event envelope and the error
//! taxonomy for reconciling those events against the credit ledger and
//! subscription records.

mod stripe_event;
mod webhook_errors;

pub use stripe_event::{StripeEvent, StripeEventData, StripeEventType};
pub use webhook_errors::WebhookError;

#[cfg(test)]
pub use stripe_event::StripeEventBuilder;
