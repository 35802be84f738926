//! HandlePaymentWebhookHandler - Command handler for payment provider webhooks.
//!
//! Each event handler is a thin adapter: extract ids and amounts from the
//! event payload, then lean on the credit ledger's reference idempotency and
//! the subscription state machine. Replayed deliveries are no-ops, unknown
//! event types are acknowledged without action, and nothing here retries a
//! provider call in-request.

use std::sync::Arc;

use crate::domain::credits::{CreditError, CreditPack, CreditTransaction, TransactionReference};
use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::payments::{StripeEvent, StripeEventType, WebhookError};
use crate::domain::subscription::{Subscription, SubscriptionStatus};
use crate::ports::{CreditLedger, CreditOutcome, PaymentProvider, SubscriptionRepository};

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload.
    pub payload: Vec<u8>,
    /// Webhook signature header.
    pub signature: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleWebhookResult {
    /// Credit purchase settled, ledger credited.
    CreditsAwarded { user_id: UserId, amount: u32 },
    /// Replayed delivery, ledger already has this reference.
    DuplicateDelivery,
    /// Refund processed, credits clawed back.
    CreditsClawedBack { user_id: UserId, amount: u32 },
    /// Payment failure logged; no state change.
    PaymentFailureNoted,
    /// Invoice paid, subscription renewed.
    SubscriptionRenewed,
    /// Invoice failed, subscription past due.
    SubscriptionPastDue,
    /// Subscription state synced from provider.
    SubscriptionSynced,
    /// Subscription ended.
    SubscriptionCanceled,
    /// Event acknowledged but no action taken.
    Acknowledged,
    /// Event ignored (unknown or unsupported type).
    Ignored,
}

/// Handler for processing payment provider webhooks.
pub struct HandlePaymentWebhookHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    ledger: Arc<dyn CreditLedger>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        ledger: Arc<dyn CreditLedger>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            payment_provider,
            ledger,
            subscriptions,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandleWebhookResult, WebhookError> {
        let event = self
            .payment_provider
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await
            .map_err(|_| WebhookError::InvalidSignature)?;

        tracing::debug!(event_id = %event.id, event_type = %event.event_type, "webhook received");

        match event.parsed_type() {
            StripeEventType::PaymentIntentSucceeded => self.handle_payment_succeeded(&event).await,
            StripeEventType::PaymentIntentFailed => self.handle_payment_failed(&event),
            StripeEventType::ChargeRefunded => self.handle_charge_refunded(&event).await,
            StripeEventType::InvoicePaid => self.handle_invoice_paid(&event).await,
            StripeEventType::InvoicePaymentFailed => self.handle_invoice_failed(&event).await,
            StripeEventType::CustomerSubscriptionUpdated => {
                self.handle_subscription_updated(&event).await
            }
            StripeEventType::CustomerSubscriptionDeleted => {
                self.handle_subscription_deleted(&event).await
            }
            StripeEventType::Unknown => {
                tracing::warn!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    "unhandled webhook event type, acknowledging"
                );
                Ok(HandleWebhookResult::Ignored)
            }
        }
    }

    /// Awards credits for a settled credit pack payment.
    async fn handle_payment_succeeded(
        &self,
        event: &StripeEvent,
    ) -> Result<HandleWebhookResult, WebhookError> {
        let payment_intent_id = event
            .object_str("id")
            .ok_or(WebhookError::MissingField("id"))?
            .to_string();

        let (user_id, amount) = match read_credit_metadata(event)? {
            Some(pair) => pair,
            None => {
                // Payment intents without credit metadata belong to other
                // flows (e.g. subscription invoices); nothing to award.
                tracing::debug!(event_id = %event.id, "payment intent without credit metadata");
                return Ok(HandleWebhookResult::Acknowledged);
            }
        };

        let transaction = CreditTransaction::purchase(
            user_id.clone(),
            amount,
            TransactionReference::webhook(payment_intent_id),
            serde_json::json!({ "event": event.id }),
        );

        match self.ledger.credit(&transaction).await? {
            CreditOutcome::Applied => {
                tracing::info!(user_id = %user_id, amount, "credits awarded via webhook");
                Ok(HandleWebhookResult::CreditsAwarded { user_id, amount })
            }
            CreditOutcome::Duplicate => {
                tracing::debug!(event_id = %event.id, "duplicate credit delivery ignored");
                Ok(HandleWebhookResult::DuplicateDelivery)
            }
        }
    }

    /// A failed payment changes nothing locally.
    fn handle_payment_failed(
        &self,
        event: &StripeEvent,
    ) -> Result<HandleWebhookResult, WebhookError> {
        tracing::warn!(
            event_id = %event.id,
            payment_intent = event.object_str("id").unwrap_or("unknown"),
            "payment intent failed"
        );
        Ok(HandleWebhookResult::PaymentFailureNoted)
    }

    /// Claws back credits for a refunded charge.
    ///
    /// If the user already spent the credits the clawback fails the balance
    /// check; that is logged and acknowledged, never retried.
    async fn handle_charge_refunded(
        &self,
        event: &StripeEvent,
    ) -> Result<HandleWebhookResult, WebhookError> {
        let charge_id = event
            .object_str("id")
            .ok_or(WebhookError::MissingField("id"))?
            .to_string();

        let (user_id, amount) = match read_credit_metadata(event)? {
            Some(pair) => pair,
            None => {
                tracing::debug!(event_id = %event.id, "refunded charge without credit metadata");
                return Ok(HandleWebhookResult::Acknowledged);
            }
        };

        let transaction = CreditTransaction::refund(
            user_id.clone(),
            amount,
            TransactionReference::webhook(charge_id),
            serde_json::json!({ "event": event.id }),
        );

        match self.ledger.deduct(&transaction).await {
            Ok(CreditOutcome::Applied) => {
                tracing::info!(user_id = %user_id, amount, "credits clawed back for refund");
                Ok(HandleWebhookResult::CreditsClawedBack { user_id, amount })
            }
            Ok(CreditOutcome::Duplicate) => Ok(HandleWebhookResult::DuplicateDelivery),
            Err(CreditError::InsufficientCredits { required, balance }) => {
                tracing::warn!(
                    user_id = %user_id,
                    required,
                    balance,
                    "refund clawback skipped, credits already spent"
                );
                Ok(HandleWebhookResult::Acknowledged)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Renews the subscription billed by this invoice.
    async fn handle_invoice_paid(
        &self,
        event: &StripeEvent,
    ) -> Result<HandleWebhookResult, WebhookError> {
        let subscription_id = event
            .object_str("subscription")
            .ok_or(WebhookError::MissingField("subscription"))?;

        let mut subscription = self
            .subscriptions
            .find_by_stripe_subscription_id(subscription_id)
            .await?
            .ok_or(WebhookError::SubscriptionNotFound)?;

        match subscription.renew() {
            Ok(()) => {
                self.subscriptions.update(&subscription).await?;
                Ok(HandleWebhookResult::SubscriptionRenewed)
            }
            Err(err) => {
                // A paid invoice for an ended subscription is stale news.
                tracing::warn!(subscription_id, error = %err, "stale invoice.paid event");
                Ok(HandleWebhookResult::Acknowledged)
            }
        }
    }

    /// Marks the billed subscription past due.
    async fn handle_invoice_failed(
        &self,
        event: &StripeEvent,
    ) -> Result<HandleWebhookResult, WebhookError> {
        let subscription_id = event
            .object_str("subscription")
            .ok_or(WebhookError::MissingField("subscription"))?;

        let mut subscription = self
            .subscriptions
            .find_by_stripe_subscription_id(subscription_id)
            .await?
            .ok_or(WebhookError::SubscriptionNotFound)?;

        match subscription.mark_past_due() {
            Ok(()) => {
                self.subscriptions.update(&subscription).await?;
                Ok(HandleWebhookResult::SubscriptionPastDue)
            }
            Err(err) => {
                tracing::warn!(subscription_id, error = %err, "stale invoice.payment_failed event");
                Ok(HandleWebhookResult::Acknowledged)
            }
        }
    }

    /// Syncs local state to the provider's subscription snapshot.
    ///
    /// Unknown subscription ids with user metadata create the local record;
    /// this is how checkout-created subscriptions first land.
    async fn handle_subscription_updated(
        &self,
        event: &StripeEvent,
    ) -> Result<HandleWebhookResult, WebhookError> {
        let subscription_id = event
            .object_str("id")
            .ok_or(WebhookError::MissingField("id"))?;

        let provider_status = event
            .object_str("status")
            .ok_or(WebhookError::MissingField("status"))?;
        let status = match SubscriptionStatus::from_provider(provider_status) {
            Some(status) => status,
            None => {
                tracing::debug!(subscription_id, provider_status, "untracked subscription status");
                return Ok(HandleWebhookResult::Acknowledged);
            }
        };

        let existing = self
            .subscriptions
            .find_by_stripe_subscription_id(subscription_id)
            .await?;

        let mut subscription = match existing {
            Some(subscription) => subscription,
            None => {
                let user_id = event
                    .metadata_str("user_id")
                    .and_then(|s| UserId::new(s).ok())
                    .ok_or(WebhookError::MissingMetadata("user_id"))?;
                let plan_id = read_plan_id(event);

                let subscription = Subscription::new(
                    user_id,
                    subscription_id.to_string(),
                    plan_id,
                    status,
                );
                self.subscriptions.save(&subscription).await?;
                return Ok(HandleWebhookResult::SubscriptionSynced);
            }
        };

        if status == SubscriptionStatus::Canceled {
            let ends_at = read_period_end(event);
            match subscription.cancel(ends_at) {
                Ok(()) => {}
                Err(_) => return Ok(HandleWebhookResult::Acknowledged), // already canceled
            }
        } else {
            subscription
                .sync_status(status)
                .map_err(|e| WebhookError::InvalidTransition(e.to_string()))?;

            let cancel_at_period_end = event
                .data
                .object
                .get("cancel_at_period_end")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if cancel_at_period_end {
                if let Some(ends_at) = read_period_end(event) {
                    subscription.note_pending_cancellation(ends_at);
                }
            }
        }

        self.subscriptions.update(&subscription).await?;
        Ok(HandleWebhookResult::SubscriptionSynced)
    }

    /// Ends the subscription; a soft state change, the record is kept.
    async fn handle_subscription_deleted(
        &self,
        event: &StripeEvent,
    ) -> Result<HandleWebhookResult, WebhookError> {
        let subscription_id = event
            .object_str("id")
            .ok_or(WebhookError::MissingField("id"))?;

        let mut subscription = match self
            .subscriptions
            .find_by_stripe_subscription_id(subscription_id)
            .await?
        {
            Some(subscription) => subscription,
            None => {
                tracing::warn!(subscription_id, "deletion event for unknown subscription");
                return Ok(HandleWebhookResult::Acknowledged);
            }
        };

        match subscription.cancel(None) {
            Ok(()) => {
                self.subscriptions.update(&subscription).await?;
                Ok(HandleWebhookResult::SubscriptionCanceled)
            }
            Err(_) => Ok(HandleWebhookResult::Acknowledged), // already canceled
        }
    }
}

/// Reads (user_id, credits) from event metadata.
///
/// `credits_to_award` wins; `credit_pack_id` is the fallback for sessions
/// that only recorded the pack. Returns `None` when neither is present.
fn read_credit_metadata(event: &StripeEvent) -> Result<Option<(UserId, u32)>, WebhookError> {
    let user_id = match event.metadata_str("user_id") {
        Some(raw) => UserId::new(raw).map_err(|_| WebhookError::MissingMetadata("user_id"))?,
        None => return Ok(None),
    };

    if let Some(raw) = event.metadata_str("credits_to_award") {
        let amount = raw
            .parse::<u32>()
            .map_err(|_| WebhookError::ParseError(format!("bad credits_to_award: {}", raw)))?;
        return Ok(Some((user_id, amount)));
    }

    if let Some(pack_id) = event.metadata_str("credit_pack_id") {
        let pack = CreditPack::from_id(pack_id)
            .ok_or_else(|| WebhookError::ParseError(format!("unknown credit pack: {}", pack_id)))?;
        return Ok(Some((user_id, pack.credits())));
    }

    Ok(None)
}

fn read_plan_id(event: &StripeEvent) -> String {
    event
        .data
        .object
        .get("plan")
        .and_then(|p| p.get("id"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string()
}

fn read_period_end(event: &StripeEvent) -> Option<Timestamp> {
    event
        .data
        .object
        .get("current_period_end")
        .and_then(|v| v.as_i64())
        .map(Timestamp::from_unix_secs)
}
