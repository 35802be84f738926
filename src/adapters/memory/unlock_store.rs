//! In-memory implementation of UnlockStore.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::unlock::{FeatureUnlock, GatedFeature};
use crate::ports::UnlockStore;

/// In-memory unlock flag store.
pub struct InMemoryUnlockStore {
    unlocks: Mutex<Vec<FeatureUnlock>>,
}

impl InMemoryUnlockStore {
    pub fn new() -> Self {
        Self {
            unlocks: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryUnlockStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_key(
    unlock: &FeatureUnlock,
    user_id: &UserId,
    feature: GatedFeature,
    target_id: Option<&str>,
) -> bool {
    &unlock.user_id == user_id
        && unlock.feature == feature
        && unlock.target_id.as_deref() == target_id
}

#[async_trait]
impl UnlockStore for InMemoryUnlockStore {
    async fn find(
        &self,
        user_id: &UserId,
        feature: GatedFeature,
        target_id: Option<&str>,
    ) -> Result<Option<FeatureUnlock>, DomainError> {
        let unlocks = self.unlocks.lock().unwrap();
        Ok(unlocks
            .iter()
            .find(|u| matches_key(u, user_id, feature, target_id))
            .cloned())
    }

    async fn save(&self, unlock: &FeatureUnlock) -> Result<(), DomainError> {
        let mut unlocks = self.unlocks.lock().unwrap();

        // First method wins; repeated saves keep the original record.
        let exists = unlocks
            .iter()
            .any(|u| matches_key(u, &unlock.user_id, unlock.feature, unlock.target_id.as_deref()));
        if !exists {
            unlocks.push(unlock.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::unlock::UnlockMethod;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[tokio::test]
    async fn save_then_find_roundtrip() {
        let store = InMemoryUnlockStore::new();
        let unlock = FeatureUnlock::new(user(), GatedFeature::Report, None, UnlockMethod::Referral);

        store.save(&unlock).await.unwrap();

        let found = store
            .find(&user(), GatedFeature::Report, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.method, UnlockMethod::Referral);
    }

    #[tokio::test]
    async fn first_method_wins_on_repeat_save() {
        let store = InMemoryUnlockStore::new();
        store
            .save(&FeatureUnlock::new(
                user(),
                GatedFeature::Report,
                None,
                UnlockMethod::Referral,
            ))
            .await
            .unwrap();
        store
            .save(&FeatureUnlock::new(
                user(),
                GatedFeature::Report,
                None,
                UnlockMethod::Credits,
            ))
            .await
            .unwrap();

        let found = store
            .find(&user(), GatedFeature::Report, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.method, UnlockMethod::Referral);
    }

    #[tokio::test]
    async fn targets_are_distinct_artifacts() {
        let store = InMemoryUnlockStore::new();
        store
            .save(&FeatureUnlock::new(
                user(),
                GatedFeature::Compatibility,
                Some("archetype-leo".to_string()),
                UnlockMethod::Credits,
            ))
            .await
            .unwrap();

        let other = store
            .find(&user(), GatedFeature::Compatibility, Some("archetype-virgo"))
            .await
            .unwrap();
        assert!(other.is_none());
    }
}
