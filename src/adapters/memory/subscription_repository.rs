//! In-memory implementation of SubscriptionRepository.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionRepository;

/// In-memory subscription repository.
pub struct InMemorySubscriptionRepository {
    subscriptions: Mutex<Vec<Subscription>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self {
            subscriptions: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemorySubscriptionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut subscriptions = self.subscriptions.lock().unwrap();

        let conflicting = subscriptions.iter().any(|s| {
            s.user_id == subscription.user_id && s.status.has_access() && subscription.status.has_access()
        });
        if conflicting {
            return Err(DomainError::validation(
                "user_id",
                "User already has an active subscription",
            ));
        }

        subscriptions.push(subscription.clone());
        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        match subscriptions.iter_mut().find(|s| s.id == subscription.id) {
            Some(slot) => {
                *slot = subscription.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription not found",
            )),
        }
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError> {
        let subscriptions = self.subscriptions.lock().unwrap();
        Ok(subscriptions
            .iter()
            .filter(|s| &s.user_id == user_id)
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn find_by_stripe_subscription_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError> {
        let subscriptions = self.subscriptions.lock().unwrap();
        Ok(subscriptions
            .iter()
            .find(|s| s.stripe_subscription_id == stripe_subscription_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subscription::SubscriptionStatus;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn subscription(stripe_id: &str, status: SubscriptionStatus) -> Subscription {
        Subscription::new(
            user(),
            stripe_id.to_string(),
            "price_monthly".to_string(),
            status,
        )
    }

    #[tokio::test]
    async fn second_active_subscription_is_rejected() {
        let repo = InMemorySubscriptionRepository::new();
        repo.save(&subscription("sub_1", SubscriptionStatus::Active))
            .await
            .unwrap();

        let result = repo
            .save(&subscription("sub_2", SubscriptionStatus::Active))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn canceled_history_allows_a_new_active() {
        let repo = InMemorySubscriptionRepository::new();
        let mut old = subscription("sub_1", SubscriptionStatus::Active);
        old.cancel(None).unwrap();
        repo.save(&old).await.unwrap();

        let result = repo
            .save(&subscription("sub_2", SubscriptionStatus::Active))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn update_replaces_by_id() {
        let repo = InMemorySubscriptionRepository::new();
        let mut sub = subscription("sub_1", SubscriptionStatus::Active);
        repo.save(&sub).await.unwrap();

        sub.mark_past_due().unwrap();
        repo.update(&sub).await.unwrap();

        let found = repo
            .find_by_stripe_subscription_id("sub_1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.status, SubscriptionStatus::PastDue);
    }

    #[tokio::test]
    async fn update_unknown_subscription_fails() {
        let repo = InMemorySubscriptionRepository::new();
        let sub = subscription("sub_1", SubscriptionStatus::Active);
        assert!(repo.update(&sub).await.is_err());
    }
}
