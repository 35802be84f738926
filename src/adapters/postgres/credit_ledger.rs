//! PostgreSQL implementation of CreditLedger.
//!
//! The deduction path is the one correctness-critical query in the system:
//! a conditional decrement (`... AND credits >= $n`) with an affected-row
//! check, inside the same transaction as the ledger insert. Two concurrent
//! requests can both pass an application-level balance read, but only one
//! conditional update can win.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::credits::{
    CreditError, CreditTransaction, ReferenceType, TransactionReference, TransactionType,
};
use crate::domain::foundation::{TransactionId, Timestamp, UserId};
use crate::ports::{CreditLedger, CreditOutcome};

use super::parse_user_id_as_uuid;

/// PostgreSQL implementation of the CreditLedger port.
pub struct PostgresCreditLedger {
    pool: PgPool,
}

impl PostgresCreditLedger {
    /// Creates a new PostgresCreditLedger with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a credit transaction.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    user_id: Uuid,
    amount: i64,
    transaction_type: String,
    related_type: Option<String>,
    related_id: Option<String>,
    reference_type: Option<String>,
    reference_id: Option<String>,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for CreditTransaction {
    type Error = CreditError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let reference = match (row.reference_type.as_deref(), row.reference_id) {
            (Some(kind), Some(id)) => Some(TransactionReference {
                reference_type: parse_reference_type(kind)?,
                reference_id: id,
            }),
            _ => None,
        };

        Ok(CreditTransaction {
            id: TransactionId::from_uuid(row.id),
            user_id: UserId::new(row.user_id.to_string())
                .map_err(|e| CreditError::infrastructure(format!("Invalid user_id: {}", e)))?,
            amount: row.amount,
            transaction_type: parse_transaction_type(&row.transaction_type)?,
            related_type: row.related_type,
            related_id: row.related_id,
            reference,
            metadata: row.metadata,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn parse_transaction_type(s: &str) -> Result<TransactionType, CreditError> {
    match s {
        "purchase" => Ok(TransactionType::Purchase),
        "deduction" => Ok(TransactionType::Deduction),
        "refund" => Ok(TransactionType::Refund),
        "bonus" => Ok(TransactionType::Bonus),
        _ => Err(CreditError::infrastructure(format!(
            "Invalid transaction type: {}",
            s
        ))),
    }
}

fn parse_reference_type(s: &str) -> Result<ReferenceType, CreditError> {
    match s {
        "purchase" => Ok(ReferenceType::Purchase),
        "webhook" => Ok(ReferenceType::Webhook),
        _ => Err(CreditError::infrastructure(format!(
            "Invalid reference type: {}",
            s
        ))),
    }
}

impl PostgresCreditLedger {
    /// Returns true when a ledger row already carries this reference id.
    async fn reference_exists(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        transaction: &CreditTransaction,
    ) -> Result<bool, CreditError> {
        let Some(reference) = &transaction.reference else {
            return Ok(false);
        };

        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM credit_transactions WHERE reference_id = $1")
                .bind(&reference.reference_id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(|e| {
                    CreditError::infrastructure(format!("Failed to check reference: {}", e))
                })?;

        Ok(existing.is_some())
    }

    async fn insert_transaction(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        transaction: &CreditTransaction,
        user_uuid: Uuid,
    ) -> Result<(), CreditError> {
        sqlx::query(
            r#"
            INSERT INTO credit_transactions (
                id, user_id, amount, transaction_type, related_type, related_id,
                reference_type, reference_id, metadata, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(transaction.id.as_uuid())
        .bind(user_uuid)
        .bind(transaction.amount)
        .bind(transaction.transaction_type.as_str())
        .bind(&transaction.related_type)
        .bind(&transaction.related_id)
        .bind(transaction.reference.as_ref().map(|r| r.reference_type.as_str()))
        .bind(transaction.reference.as_ref().map(|r| r.reference_id.as_str()))
        .bind(&transaction.metadata)
        .bind(transaction.created_at.as_datetime())
        .execute(&mut **tx)
        .await
        .map_err(|e| CreditError::infrastructure(format!("Failed to insert transaction: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl CreditLedger for PostgresCreditLedger {
    async fn deduct(&self, transaction: &CreditTransaction) -> Result<CreditOutcome, CreditError> {
        if transaction.amount >= 0 {
            return Err(CreditError::invalid_amount(transaction.amount));
        }
        let amount = transaction.amount.unsigned_abs() as i64;
        let user_uuid = parse_user_id_as_uuid(&transaction.user_id)
            .map_err(|e| CreditError::infrastructure(e.to_string()))?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            CreditError::infrastructure(format!("Failed to begin transaction: {}", e))
        })?;

        if Self::reference_exists(&mut tx, transaction).await? {
            return Ok(CreditOutcome::Duplicate);
        }

        // Atomic conditional decrement; affected-row count is the balance
        // check.
        let result = sqlx::query(
            "UPDATE users SET credits = credits - $2 WHERE id = $1 AND credits >= $2",
        )
        .bind(user_uuid)
        .bind(amount)
        .execute(&mut *tx)
        .await
        .map_err(|e| CreditError::infrastructure(format!("Failed to deduct credits: {}", e)))?;

        if result.rows_affected() == 0 {
            let balance: Option<(i64,)> = sqlx::query_as("SELECT credits FROM users WHERE id = $1")
                .bind(user_uuid)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    CreditError::infrastructure(format!("Failed to read balance: {}", e))
                })?;

            return match balance {
                Some((balance,)) => Err(CreditError::insufficient(
                    amount as u32,
                    balance.max(0) as u32,
                )),
                None => Err(CreditError::user_not_found(transaction.user_id.clone())),
            };
        }

        Self::insert_transaction(&mut tx, transaction, user_uuid).await?;

        tx.commit().await.map_err(|e| {
            CreditError::infrastructure(format!("Failed to commit deduction: {}", e))
        })?;

        Ok(CreditOutcome::Applied)
    }

    async fn credit(&self, transaction: &CreditTransaction) -> Result<CreditOutcome, CreditError> {
        if transaction.amount <= 0 {
            return Err(CreditError::invalid_amount(transaction.amount));
        }
        let user_uuid = parse_user_id_as_uuid(&transaction.user_id)
            .map_err(|e| CreditError::infrastructure(e.to_string()))?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            CreditError::infrastructure(format!("Failed to begin transaction: {}", e))
        })?;

        if Self::reference_exists(&mut tx, transaction).await? {
            return Ok(CreditOutcome::Duplicate);
        }

        let result = sqlx::query("UPDATE users SET credits = credits + $2 WHERE id = $1")
            .bind(user_uuid)
            .bind(transaction.amount)
            .execute(&mut *tx)
            .await
            .map_err(|e| CreditError::infrastructure(format!("Failed to credit user: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(CreditError::user_not_found(transaction.user_id.clone()));
        }

        if let Err(err) = Self::insert_transaction(&mut tx, transaction, user_uuid).await {
            // A concurrent delivery can slip between the reference check and
            // the insert; the unique index resolves the race in its favor.
            if err.to_string().contains("credit_transactions_reference_id_key") {
                return Ok(CreditOutcome::Duplicate);
            }
            return Err(err);
        }

        tx.commit()
            .await
            .map_err(|e| CreditError::infrastructure(format!("Failed to commit credit: {}", e)))?;

        Ok(CreditOutcome::Applied)
    }

    async fn balance(&self, user_id: &UserId) -> Result<u32, CreditError> {
        let user_uuid = parse_user_id_as_uuid(user_id)
            .map_err(|e| CreditError::infrastructure(e.to_string()))?;

        let row: Option<(i64,)> = sqlx::query_as("SELECT credits FROM users WHERE id = $1")
            .bind(user_uuid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CreditError::infrastructure(format!("Failed to read balance: {}", e)))?;

        match row {
            Some((credits,)) => Ok(credits.max(0) as u32),
            None => Err(CreditError::user_not_found(user_id.clone())),
        }
    }

    async fn history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<CreditTransaction>, CreditError> {
        let user_uuid = parse_user_id_as_uuid(user_id)
            .map_err(|e| CreditError::infrastructure(e.to_string()))?;

        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, amount, transaction_type, related_type, related_id,
                   reference_type, reference_id, metadata, created_at
            FROM credit_transactions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_uuid)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CreditError::infrastructure(format!("Failed to read history: {}", e)))?;

        rows.into_iter().map(CreditTransaction::try_from).collect()
    }
}
