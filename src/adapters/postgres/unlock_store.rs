//! PostgreSQL implementation of UnlockStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::unlock::{FeatureUnlock, GatedFeature, UnlockMethod};
use crate::ports::UnlockStore;

use super::parse_user_id_as_uuid;

/// PostgreSQL implementation of the UnlockStore port.
pub struct PostgresUnlockStore {
    pool: PgPool,
}

impl PostgresUnlockStore {
    /// Creates a new PostgresUnlockStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an unlock flag.
#[derive(Debug, sqlx::FromRow)]
struct UnlockRow {
    user_id: Uuid,
    feature: String,
    target_id: Option<String>,
    method: String,
    unlocked_at: DateTime<Utc>,
}

impl TryFrom<UnlockRow> for FeatureUnlock {
    type Error = DomainError;

    fn try_from(row: UnlockRow) -> Result<Self, Self::Error> {
        let feature = GatedFeature::parse(&row.feature)
            .ok_or_else(|| DomainError::database(format!("Invalid feature value: {}", row.feature)))?;
        let method = UnlockMethod::parse(&row.method)
            .ok_or_else(|| DomainError::database(format!("Invalid method value: {}", row.method)))?;

        Ok(FeatureUnlock {
            user_id: UserId::new(row.user_id.to_string())
                .map_err(|e| DomainError::database(format!("Invalid user_id: {}", e)))?,
            feature,
            target_id: row.target_id,
            method,
            unlocked_at: Timestamp::from_datetime(row.unlocked_at),
        })
    }
}

#[async_trait]
impl UnlockStore for PostgresUnlockStore {
    async fn find(
        &self,
        user_id: &UserId,
        feature: GatedFeature,
        target_id: Option<&str>,
    ) -> Result<Option<FeatureUnlock>, DomainError> {
        let user_uuid = parse_user_id_as_uuid(user_id)?;

        let row: Option<UnlockRow> = sqlx::query_as(
            r#"
            SELECT user_id, feature, target_id, method, unlocked_at
            FROM feature_unlocks
            WHERE user_id = $1 AND feature = $2
              AND COALESCE(target_id, '') = COALESCE($3, '')
            "#,
        )
        .bind(user_uuid)
        .bind(feature.as_str())
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find unlock: {}", e)))?;

        row.map(FeatureUnlock::try_from).transpose()
    }

    async fn save(&self, unlock: &FeatureUnlock) -> Result<(), DomainError> {
        let user_uuid = parse_user_id_as_uuid(&unlock.user_id)?;

        // First method wins; a concurrent unlock keeps the original row.
        sqlx::query(
            r#"
            INSERT INTO feature_unlocks (user_id, feature, target_id, method, unlocked_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, feature, COALESCE(target_id, '')) DO NOTHING
            "#,
        )
        .bind(user_uuid)
        .bind(unlock.feature.as_str())
        .bind(&unlock.target_id)
        .bind(unlock.method.as_str())
        .bind(unlock.unlocked_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save unlock: {}", e)))?;

        Ok(())
    }
}
