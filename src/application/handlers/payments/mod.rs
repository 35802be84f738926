//! Payment handlers.
//!
//! ## Commands
//! - Processing payment provider webhooks

mod handle_payment_webhook;

pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandleWebhookResult,
};
