//! PostgreSQL implementation of ReferralStore.
//!
//! Conversion recording runs the row lock, the conversion insert, and the
//! counter increment in one transaction, so concurrent conversions for the
//! same referral can never lose an update.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ReferralId, Timestamp, UserId};
use crate::domain::referral::{ConversionOutcome, Referral, ReferralConversion};
use crate::domain::unlock::GatedFeature;
use crate::ports::ReferralStore;

use super::parse_user_id_as_uuid;

/// PostgreSQL implementation of the ReferralStore port.
pub struct PostgresReferralStore {
    pool: PgPool,
}

impl PostgresReferralStore {
    /// Creates a new PostgresReferralStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a referral.
#[derive(Debug, sqlx::FromRow)]
struct ReferralRow {
    id: Uuid,
    user_id: Uuid,
    referral_code: String,
    feature: String,
    target_id: Option<String>,
    successful_referrals: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReferralRow> for Referral {
    type Error = DomainError;

    fn try_from(row: ReferralRow) -> Result<Self, Self::Error> {
        let feature = parse_feature(&row.feature)?;

        Ok(Referral {
            id: ReferralId::from_uuid(row.id),
            user_id: UserId::new(row.user_id.to_string())
                .map_err(|e| DomainError::database(format!("Invalid user_id: {}", e)))?,
            referral_code: row.referral_code,
            feature,
            target_id: row.target_id,
            successful_referrals: row.successful_referrals.max(0) as u32,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn parse_feature(s: &str) -> Result<GatedFeature, DomainError> {
    GatedFeature::parse(s)
        .ok_or_else(|| DomainError::database(format!("Invalid feature value: {}", s)))
}

const SELECT_REFERRAL: &str = r#"
    SELECT id, user_id, referral_code, feature, target_id, successful_referrals, created_at
    FROM referrals
"#;

#[async_trait]
impl ReferralStore for PostgresReferralStore {
    async fn get_or_create(
        &self,
        user_id: &UserId,
        feature: GatedFeature,
        target_id: Option<&str>,
    ) -> Result<Referral, DomainError> {
        if let Some(existing) = self.find(user_id, feature, target_id).await? {
            return Ok(existing);
        }

        let referral = Referral::new(user_id.clone(), feature, target_id.map(str::to_string));
        let user_uuid = parse_user_id_as_uuid(user_id)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO referrals (
                id, user_id, referral_code, feature, target_id, successful_referrals, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, feature, COALESCE(target_id, '')) DO NOTHING
            "#,
        )
        .bind(referral.id.as_uuid())
        .bind(user_uuid)
        .bind(&referral.referral_code)
        .bind(referral.feature.as_str())
        .bind(&referral.target_id)
        .bind(referral.successful_referrals as i32)
        .bind(referral.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to create referral: {}", e)))?;

        if inserted.rows_affected() == 1 {
            return Ok(referral);
        }

        // Lost a creation race; the winner's row is the canonical one.
        self.find(user_id, feature, target_id)
            .await?
            .ok_or_else(|| DomainError::database("Referral vanished after conflict"))
    }

    async fn find(
        &self,
        user_id: &UserId,
        feature: GatedFeature,
        target_id: Option<&str>,
    ) -> Result<Option<Referral>, DomainError> {
        let user_uuid = parse_user_id_as_uuid(user_id)?;

        let row: Option<ReferralRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 AND feature = $2 AND COALESCE(target_id, '') = COALESCE($3, '')",
            SELECT_REFERRAL
        ))
        .bind(user_uuid)
        .bind(feature.as_str())
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find referral: {}", e)))?;

        row.map(Referral::try_from).transpose()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Referral>, DomainError> {
        let row: Option<ReferralRow> =
            sqlx::query_as(&format!("{} WHERE referral_code = $1", SELECT_REFERRAL))
                .bind(code)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to find referral: {}", e)))?;

        row.map(Referral::try_from).transpose()
    }

    async fn record_conversion(
        &self,
        code: &str,
        referred_user_id: &UserId,
    ) -> Result<ConversionOutcome, DomainError> {
        let referred_uuid = parse_user_id_as_uuid(referred_user_id)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database(format!("Failed to begin transaction: {}", e)))?;

        let row: Option<ReferralRow> = sqlx::query_as(&format!(
            "{} WHERE referral_code = $1 FOR UPDATE",
            SELECT_REFERRAL
        ))
        .bind(code)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to lock referral: {}", e)))?;

        let Some(row) = row else {
            return Ok(ConversionOutcome::CodeNotFound);
        };
        let referral = Referral::try_from(row)?;

        if &referral.user_id == referred_user_id {
            return Ok(ConversionOutcome::SelfReferral);
        }

        let conversion = ReferralConversion::new(
            referral.id,
            referred_user_id.clone(),
            referral.feature,
        );
        let inserted = sqlx::query(
            r#"
            INSERT INTO referral_conversions (
                id, referral_id, referred_user_id, feature, converted_at
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (referral_id, referred_user_id) DO NOTHING
            "#,
        )
        .bind(conversion.id.as_uuid())
        .bind(conversion.referral_id.as_uuid())
        .bind(referred_uuid)
        .bind(conversion.feature.as_str())
        .bind(conversion.converted_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert conversion: {}", e)))?;

        if inserted.rows_affected() == 0 {
            return Ok(ConversionOutcome::Duplicate);
        }

        let (new_total,): (i32,) = sqlx::query_as(
            r#"
            UPDATE referrals
            SET successful_referrals = successful_referrals + 1
            WHERE id = $1
            RETURNING successful_referrals
            "#,
        )
        .bind(referral.id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to increment counter: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database(format!("Failed to commit conversion: {}", e)))?;

        Ok(ConversionOutcome::Recorded {
            new_total: new_total.max(0) as u32,
        })
    }
}
