//! RecordConversionHandler - Command handler for referral conversions.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::referral::ConversionOutcome;
use crate::ports::ReferralStore;

/// Command to record a conversion against a referral code.
#[derive(Debug, Clone)]
pub struct RecordConversionCommand {
    pub referral_code: String,
    pub referred_user_id: UserId,
}

/// Outcome of the conversion attempt.
#[derive(Debug, Clone)]
pub struct RecordConversionResult {
    pub outcome: ConversionOutcome,
}

/// Handler for recording referral conversions.
///
/// Self-referrals and duplicates are quiet no-ops: the response never tells
/// the referred user why nothing counted.
pub struct RecordConversionHandler {
    referrals: Arc<dyn ReferralStore>,
}

impl RecordConversionHandler {
    pub fn new(referrals: Arc<dyn ReferralStore>) -> Self {
        Self { referrals }
    }

    pub async fn handle(
        &self,
        cmd: RecordConversionCommand,
    ) -> Result<RecordConversionResult, DomainError> {
        let outcome = self
            .referrals
            .record_conversion(&cmd.referral_code, &cmd.referred_user_id)
            .await?;

        match outcome {
            ConversionOutcome::Recorded { new_total } => {
                tracing::info!(
                    code = %cmd.referral_code,
                    referred = %cmd.referred_user_id,
                    new_total,
                    "referral conversion recorded"
                );
            }
            ConversionOutcome::SelfReferral => {
                tracing::debug!(code = %cmd.referral_code, "self-referral rejected");
            }
            ConversionOutcome::Duplicate => {
                tracing::debug!(
                    code = %cmd.referral_code,
                    referred = %cmd.referred_user_id,
                    "duplicate conversion ignored"
                );
            }
            ConversionOutcome::CodeNotFound => {
                tracing::warn!(code = %cmd.referral_code, "conversion for unknown referral code");
            }
        }

        Ok(RecordConversionResult { outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryReferralStore;
    use crate::domain::unlock::GatedFeature;

    fn referrer() -> UserId {
        UserId::new("referrer").unwrap()
    }

    async fn store_with_referral() -> (Arc<InMemoryReferralStore>, String) {
        let store = Arc::new(InMemoryReferralStore::new());
        let referral = store
            .get_or_create(&referrer(), GatedFeature::Report, None)
            .await
            .unwrap();
        (store, referral.referral_code)
    }

    #[tokio::test]
    async fn records_conversion_for_new_user() {
        let (store, code) = store_with_referral().await;
        let handler = RecordConversionHandler::new(store);

        let result = handler
            .handle(RecordConversionCommand {
                referral_code: code,
                referred_user_id: UserId::new("referred-1").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(result.outcome, ConversionOutcome::Recorded { new_total: 1 });
    }

    #[tokio::test]
    async fn self_referral_is_silent_noop() {
        let (store, code) = store_with_referral().await;
        let handler = RecordConversionHandler::new(store.clone());

        let result = handler
            .handle(RecordConversionCommand {
                referral_code: code,
                referred_user_id: referrer(),
            })
            .await
            .unwrap();

        assert_eq!(result.outcome, ConversionOutcome::SelfReferral);
        let referral = store
            .find(&referrer(), GatedFeature::Report, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(referral.successful_referrals, 0);
    }

    #[tokio::test]
    async fn same_referred_user_counts_once() {
        let (store, code) = store_with_referral().await;
        let handler = RecordConversionHandler::new(store.clone());

        let cmd = RecordConversionCommand {
            referral_code: code,
            referred_user_id: UserId::new("referred-1").unwrap(),
        };

        let first = handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await.unwrap();

        assert!(first.outcome.recorded());
        assert_eq!(second.outcome, ConversionOutcome::Duplicate);

        let referral = store
            .find(&referrer(), GatedFeature::Report, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(referral.successful_referrals, 1);
    }

    #[tokio::test]
    async fn unknown_code_reports_not_found() {
        let store = Arc::new(InMemoryReferralStore::new());
        let handler = RecordConversionHandler::new(store);

        let result = handler
            .handle(RecordConversionCommand {
                referral_code: "nope".to_string(),
                referred_user_id: UserId::new("referred-1").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(result.outcome, ConversionOutcome::CodeNotFound);
    }
}
