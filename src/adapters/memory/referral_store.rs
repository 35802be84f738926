//! In-memory implementation of ReferralStore.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::referral::{ConversionOutcome, Referral, ReferralConversion};
use crate::domain::unlock::GatedFeature;
use crate::ports::ReferralStore;

#[derive(Default)]
struct ReferralState {
    referrals: Vec<Referral>,
    conversions: Vec<ReferralConversion>,
}

/// In-memory referral store.
///
/// Conversion recording runs under one lock so the insert and the counter
/// increment are observed together, like the transactional PostgreSQL path.
pub struct InMemoryReferralStore {
    state: Mutex<ReferralState>,
}

impl InMemoryReferralStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ReferralState::default()),
        }
    }
}

impl Default for InMemoryReferralStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_key(
    referral: &Referral,
    user_id: &UserId,
    feature: GatedFeature,
    target_id: Option<&str>,
) -> bool {
    &referral.user_id == user_id
        && referral.feature == feature
        && referral.target_id.as_deref() == target_id
}

#[async_trait]
impl ReferralStore for InMemoryReferralStore {
    async fn get_or_create(
        &self,
        user_id: &UserId,
        feature: GatedFeature,
        target_id: Option<&str>,
    ) -> Result<Referral, DomainError> {
        let mut state = self.state.lock().unwrap();

        if let Some(existing) = state
            .referrals
            .iter()
            .find(|r| matches_key(r, user_id, feature, target_id))
        {
            return Ok(existing.clone());
        }

        let referral = Referral::new(
            user_id.clone(),
            feature,
            target_id.map(str::to_string),
        );
        state.referrals.push(referral.clone());
        Ok(referral)
    }

    async fn find(
        &self,
        user_id: &UserId,
        feature: GatedFeature,
        target_id: Option<&str>,
    ) -> Result<Option<Referral>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .referrals
            .iter()
            .find(|r| matches_key(r, user_id, feature, target_id))
            .cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Referral>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .referrals
            .iter()
            .find(|r| r.referral_code == code)
            .cloned())
    }

    async fn record_conversion(
        &self,
        code: &str,
        referred_user_id: &UserId,
    ) -> Result<ConversionOutcome, DomainError> {
        let mut state = self.state.lock().unwrap();

        let Some(index) = state.referrals.iter().position(|r| r.referral_code == code) else {
            return Ok(ConversionOutcome::CodeNotFound);
        };

        let (referral_id, referrer, feature) = {
            let referral = &state.referrals[index];
            (referral.id, referral.user_id.clone(), referral.feature)
        };

        if &referrer == referred_user_id {
            return Ok(ConversionOutcome::SelfReferral);
        }

        let duplicate = state
            .conversions
            .iter()
            .any(|c| c.referral_id == referral_id && &c.referred_user_id == referred_user_id);
        if duplicate {
            return Ok(ConversionOutcome::Duplicate);
        }

        state.conversions.push(ReferralConversion::new(
            referral_id,
            referred_user_id.clone(),
            feature,
        ));
        let referral = &mut state.referrals[index];
        referral.record_success();
        Ok(ConversionOutcome::Recorded {
            new_total: referral.successful_referrals,
        })
    }
}
