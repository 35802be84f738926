//! UnlockFeatureHandler - Command handler for unlocking a gated feature.

use std::sync::Arc;

use crate::domain::credits::{CreditError, CreditTransaction};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::unlock::{evaluate, FeatureUnlock, GatedFeature, UnlockMethod};
use crate::ports::{CreditLedger, ReferralStore, SubscriptionRepository, UnlockStore};

use super::snapshot;

/// Command to unlock a gated feature for a user.
#[derive(Debug, Clone)]
pub struct UnlockFeatureCommand {
    pub user_id: UserId,
    pub feature: GatedFeature,
    pub target_id: Option<String>,
}

/// Result of a successful unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockFeatureResult {
    /// How the unlock was earned. `None` credits spent except on the paid
    /// path.
    pub method: UnlockMethod,

    /// Credits deducted (0 for subscription/referral paths and repeats).
    pub credits_spent: u32,

    /// The unlock already existed before this call.
    pub already_unlocked: bool,
}

/// Handler for unlocking a gated feature.
///
/// Walks the policy's priority order and persists the winning method. Only
/// the credit path mutates the ledger; the deduction and the balance check
/// are one atomic ledger operation, so a concurrent double-submit can never
/// spend twice.
pub struct UnlockFeatureHandler {
    unlock_store: Arc<dyn UnlockStore>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    referrals: Arc<dyn ReferralStore>,
    ledger: Arc<dyn CreditLedger>,
}

impl UnlockFeatureHandler {
    pub fn new(
        unlock_store: Arc<dyn UnlockStore>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        referrals: Arc<dyn ReferralStore>,
        ledger: Arc<dyn CreditLedger>,
    ) -> Self {
        Self {
            unlock_store,
            subscriptions,
            referrals,
            ledger,
        }
    }

    pub async fn handle(
        &self,
        cmd: UnlockFeatureCommand,
    ) -> Result<UnlockFeatureResult, DomainError> {
        if let Some(existing) = self
            .unlock_store
            .find(&cmd.user_id, cmd.feature, cmd.target_id.as_deref())
            .await?
        {
            return Ok(UnlockFeatureResult {
                method: existing.method,
                credits_spent: 0,
                already_unlocked: true,
            });
        }

        let snapshot = snapshot::gather(
            &self.unlock_store,
            &self.subscriptions,
            &self.referrals,
            &self.ledger,
            &cmd.user_id,
            cmd.feature,
            cmd.target_id.as_deref(),
        )
        .await?;

        let decision = evaluate(cmd.feature, &snapshot);
        let method = match decision.reason.unlock_method() {
            Some(method) => method,
            None => {
                let cost = cmd.feature.credit_cost();
                return Err(DomainError::new(
                    ErrorCode::InsufficientCredits,
                    CreditError::insufficient(cost, snapshot.credit_balance).message(),
                )
                .with_detail("feature", cmd.feature.as_str()));
            }
        };

        let mut credits_spent = 0;
        if method == UnlockMethod::Credits {
            let cost = cmd.feature.credit_cost();
            let transaction = CreditTransaction::deduction(
                cmd.user_id.clone(),
                cost,
                cmd.feature.as_str(),
                cmd.target_id.clone(),
                serde_json::json!({ "unlock": true }),
            );

            // The snapshot may be stale under concurrency; the ledger's
            // conditional decrement is the authoritative check.
            self.ledger
                .deduct(&transaction)
                .await
                .map_err(DomainError::from)?;
            credits_spent = cost;
        }

        let unlock = FeatureUnlock::new(
            cmd.user_id.clone(),
            cmd.feature,
            cmd.target_id.clone(),
            method,
        );
        self.unlock_store.save(&unlock).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            feature = cmd.feature.as_str(),
            method = method.as_str(),
            credits_spent,
            "feature unlocked"
        );

        Ok(UnlockFeatureResult {
            method,
            credits_spent,
            already_unlocked: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryCreditLedger, InMemoryReferralStore, InMemorySubscriptionRepository,
        InMemoryUnlockStore,
    };
    use crate::domain::subscription::{Subscription, SubscriptionStatus};

    fn test_user_id() -> UserId {
        UserId::new("user-1").unwrap()
    }

    struct Fixture {
        unlock_store: Arc<InMemoryUnlockStore>,
        subscriptions: Arc<InMemorySubscriptionRepository>,
        referrals: Arc<InMemoryReferralStore>,
        ledger: Arc<InMemoryCreditLedger>,
    }

    impl Fixture {
        fn new(balance: u32) -> Self {
            Self {
                unlock_store: Arc::new(InMemoryUnlockStore::new()),
                subscriptions: Arc::new(InMemorySubscriptionRepository::new()),
                referrals: Arc::new(InMemoryReferralStore::new()),
                ledger: Arc::new(InMemoryCreditLedger::with_user(test_user_id(), balance)),
            }
        }

        fn handler(&self) -> UnlockFeatureHandler {
            UnlockFeatureHandler::new(
                self.unlock_store.clone(),
                self.subscriptions.clone(),
                self.referrals.clone(),
                self.ledger.clone(),
            )
        }
    }

    fn command(feature: GatedFeature) -> UnlockFeatureCommand {
        UnlockFeatureCommand {
            user_id: test_user_id(),
            feature,
            target_id: None,
        }
    }

    #[tokio::test]
    async fn exact_balance_spends_down_to_zero() {
        let fixture = Fixture::new(2);

        let result = fixture.handler().handle(command(GatedFeature::Report)).await.unwrap();

        assert_eq!(result.method, UnlockMethod::Credits);
        assert_eq!(result.credits_spent, 2);
        assert_eq!(fixture.ledger.balance(&test_user_id()).await.unwrap(), 0);

        let history = fixture.ledger.history(&test_user_id(), 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, -2);
    }

    #[tokio::test]
    async fn insufficient_balance_is_rejected_with_shortfall() {
        let fixture = Fixture::new(1);

        let err = fixture
            .handler()
            .handle(command(GatedFeature::Report))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientCredits);
        assert!(err.message.contains("1 available"));
        assert_eq!(fixture.ledger.balance(&test_user_id()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn subscription_unlock_spends_nothing() {
        let fixture = Fixture::new(10);
        fixture
            .subscriptions
            .save(&Subscription::new(
                test_user_id(),
                "sub_1".to_string(),
                "price_monthly".to_string(),
                SubscriptionStatus::Active,
            ))
            .await
            .unwrap();

        let result = fixture.handler().handle(command(GatedFeature::Report)).await.unwrap();

        assert_eq!(result.method, UnlockMethod::Subscription);
        assert_eq!(result.credits_spent, 0);
        assert_eq!(fixture.ledger.balance(&test_user_id()).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn referral_unlock_with_zero_credits() {
        let fixture = Fixture::new(0);
        let referral = fixture
            .referrals
            .get_or_create(&test_user_id(), GatedFeature::Report, None)
            .await
            .unwrap();
        for i in 0..3 {
            let referred = UserId::new(format!("referred-{}", i)).unwrap();
            fixture
                .referrals
                .record_conversion(&referral.referral_code, &referred)
                .await
                .unwrap();
        }

        let result = fixture.handler().handle(command(GatedFeature::Report)).await.unwrap();

        assert_eq!(result.method, UnlockMethod::Referral);
        assert_eq!(result.credits_spent, 0);
    }

    #[tokio::test]
    async fn repeat_unlock_is_idempotent() {
        let fixture = Fixture::new(4);
        let handler = fixture.handler();

        let first = handler.handle(command(GatedFeature::Report)).await.unwrap();
        assert!(!first.already_unlocked);
        assert_eq!(first.credits_spent, 2);

        let second = handler.handle(command(GatedFeature::Report)).await.unwrap();
        assert!(second.already_unlocked);
        assert_eq!(second.credits_spent, 0);
        assert_eq!(second.method, UnlockMethod::Credits);

        // Only one deduction ever happened.
        assert_eq!(fixture.ledger.balance(&test_user_id()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unlocks_are_scoped_per_target() {
        let fixture = Fixture::new(4);
        let handler = fixture.handler();

        let mut cmd = command(GatedFeature::Compatibility);
        cmd.target_id = Some("archetype-leo".to_string());
        handler.handle(cmd.clone()).await.unwrap();

        cmd.target_id = Some("archetype-virgo".to_string());
        let second = handler.handle(cmd).await.unwrap();
        assert!(!second.already_unlocked);

        assert_eq!(fixture.ledger.balance(&test_user_id()).await.unwrap(), 0);
    }
}
