//! Credit transaction entity.
//!
//! # Invariants
//!
//! - Created once, immutable thereafter; never updated or deleted.
//! - `amount` is signed: positive credits the balance, negative debits it.
//! - Webhook-sourced transactions carry a [`TransactionReference`] whose
//!   `(reference_type, reference_id)` pair is unique - the idempotency key
//!   that makes duplicate webhook delivery a no-op.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, TransactionId, UserId};

/// Kind of balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Credits bought through checkout.
    Purchase,
    /// Credits spent on a gated feature.
    Deduction,
    /// Credits clawed back after a payment-provider refund.
    Refund,
    /// Credits granted without payment (admin action, promotions).
    Bonus,
}

impl TransactionType {
    /// Stable string form used in storage and API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "purchase",
            TransactionType::Deduction => "deduction",
            TransactionType::Refund => "refund",
            TransactionType::Bonus => "bonus",
        }
    }
}

/// Origin of an external reference id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    /// Checkout session confirmed in-request.
    Purchase,
    /// Payment-provider webhook delivery.
    Webhook,
}

impl ReferenceType {
    /// Stable string form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceType::Purchase => "purchase",
            ReferenceType::Webhook => "webhook",
        }
    }
}

/// External payment-provider reference, the ledger's idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionReference {
    pub reference_type: ReferenceType,
    pub reference_id: String,
}

impl TransactionReference {
    pub fn webhook(reference_id: impl Into<String>) -> Self {
        Self {
            reference_type: ReferenceType::Webhook,
            reference_id: reference_id.into(),
        }
    }

    pub fn purchase(reference_id: impl Into<String>) -> Self {
        Self {
            reference_type: ReferenceType::Purchase,
            reference_id: reference_id.into(),
        }
    }
}

/// One immutable row in the credit ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTransaction {
    /// Unique identifier for this transaction.
    pub id: TransactionId,

    /// User whose balance changed.
    pub user_id: UserId,

    /// Signed amount: positive = credit, negative = debit.
    pub amount: i64,

    /// Kind of balance change.
    pub transaction_type: TransactionType,

    /// Kind of entity this transaction relates to (e.g. "report",
    /// "credit_pack").
    pub related_type: Option<String>,

    /// Identifier of the related entity, when one exists.
    pub related_id: Option<String>,

    /// External reference for idempotent crediting, when webhook- or
    /// checkout-sourced.
    pub reference: Option<TransactionReference>,

    /// Free-form context recorded alongside the change.
    pub metadata: serde_json::Value,

    /// When the transaction was appended.
    pub created_at: Timestamp,
}

impl CreditTransaction {
    /// A purchase appends a positive amount with an external reference.
    pub fn purchase(
        user_id: UserId,
        amount: u32,
        reference: TransactionReference,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            amount: i64::from(amount),
            transaction_type: TransactionType::Purchase,
            related_type: Some("credit_pack".to_string()),
            related_id: None,
            reference: Some(reference),
            metadata,
            created_at: Timestamp::now(),
        }
    }

    /// A deduction appends a negative amount tied to the consumed feature.
    pub fn deduction(
        user_id: UserId,
        amount: u32,
        related_type: impl Into<String>,
        related_id: Option<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            amount: -i64::from(amount),
            transaction_type: TransactionType::Deduction,
            related_type: Some(related_type.into()),
            related_id,
            reference: None,
            metadata,
            created_at: Timestamp::now(),
        }
    }

    /// A refund claws back previously awarded credits.
    pub fn refund(
        user_id: UserId,
        amount: u32,
        reference: TransactionReference,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            amount: -i64::from(amount),
            transaction_type: TransactionType::Refund,
            related_type: Some("credit_pack".to_string()),
            related_id: None,
            reference: Some(reference),
            metadata,
            created_at: Timestamp::now(),
        }
    }

    /// A bonus grants credits with no external reference.
    pub fn bonus(user_id: UserId, amount: u32, metadata: serde_json::Value) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            amount: i64::from(amount),
            transaction_type: TransactionType::Bonus,
            related_type: None,
            related_id: None,
            reference: None,
            metadata,
            created_at: Timestamp::now(),
        }
    }

    /// True when this transaction credits the balance.
    pub fn is_credit(&self) -> bool {
        self.amount > 0
    }
}
