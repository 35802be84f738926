//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::handlers::credits::{
    ConfirmCheckoutHandler, GetBalanceHandler, GrantBonusHandler, PurchaseCreditsHandler,
};
use crate::application::handlers::payments::HandlePaymentWebhookHandler;
use crate::application::handlers::rarity::CalculateRarityHandler;
use crate::application::handlers::referral::{GetOrCreateReferralHandler, RecordConversionHandler};
use crate::application::handlers::unlock::{CheckAccessHandler, UnlockFeatureHandler};
use crate::ports::{CreditLedger, PaymentProvider, ReferralStore, SubscriptionRepository, UnlockStore};

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped
/// dependencies for efficient sharing across handlers.
#[derive(Clone)]
pub struct ApiState {
    pub ledger: Arc<dyn CreditLedger>,
    pub referrals: Arc<dyn ReferralStore>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub unlock_store: Arc<dyn UnlockStore>,
    pub payment_provider: Arc<dyn PaymentProvider>,
}

impl ApiState {
    /// Create handlers on demand from the shared state.
    pub fn get_balance_handler(&self) -> GetBalanceHandler {
        GetBalanceHandler::new(self.ledger.clone())
    }

    pub fn purchase_credits_handler(&self) -> PurchaseCreditsHandler {
        PurchaseCreditsHandler::new(self.payment_provider.clone())
    }

    pub fn confirm_checkout_handler(&self) -> ConfirmCheckoutHandler {
        ConfirmCheckoutHandler::new(self.payment_provider.clone(), self.ledger.clone())
    }

    pub fn grant_bonus_handler(&self) -> GrantBonusHandler {
        GrantBonusHandler::new(self.ledger.clone())
    }

    pub fn calculate_rarity_handler(&self) -> CalculateRarityHandler {
        CalculateRarityHandler::new()
    }

    pub fn get_or_create_referral_handler(&self) -> GetOrCreateReferralHandler {
        GetOrCreateReferralHandler::new(self.referrals.clone())
    }

    pub fn record_conversion_handler(&self) -> RecordConversionHandler {
        RecordConversionHandler::new(self.referrals.clone())
    }

    pub fn check_access_handler(&self) -> CheckAccessHandler {
        CheckAccessHandler::new(
            self.unlock_store.clone(),
            self.subscriptions.clone(),
            self.referrals.clone(),
            self.ledger.clone(),
        )
    }

    pub fn unlock_feature_handler(&self) -> UnlockFeatureHandler {
        UnlockFeatureHandler::new(
            self.unlock_store.clone(),
            self.subscriptions.clone(),
            self.referrals.clone(),
            self.ledger.clone(),
        )
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.payment_provider.clone(),
            self.ledger.clone(),
            self.subscriptions.clone(),
        )
    }
}
