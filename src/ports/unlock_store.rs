//! Unlock store port.
//!
//! Persists the terminal unlocked flag per (user, feature, target) so access
//! re-checks short-circuit without consulting subscription, referral, or
//! ledger state.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::unlock::{FeatureUnlock, GatedFeature};

/// Port for persisted unlock flags.
#[async_trait]
pub trait UnlockStore: Send + Sync {
    /// Returns the unlock flag for the artifact, if one was persisted.
    async fn find(
        &self,
        user_id: &UserId,
        feature: GatedFeature,
        target_id: Option<&str>,
    ) -> Result<Option<FeatureUnlock>, DomainError>;

    /// Persists an unlock flag.
    ///
    /// Idempotent: saving an artifact that is already unlocked keeps the
    /// original record (first method wins).
    async fn save(&self, unlock: &FeatureUnlock) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn unlock_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn UnlockStore) {}
    }
}
