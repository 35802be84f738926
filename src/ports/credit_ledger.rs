//! Credit ledger port.
//!
//! The only interface through which balances change. Implementations must
//! guarantee two contracts:
//!
//! - **Atomic check-and-deduct**: the balance comparison and the decrement
//!   execute as one unit against the backing store (conditional update with
//!   affected-row check, or equivalent), so concurrent deductions can never
//!   double-spend.
//! - **Reference idempotency**: crediting with a reference id that already
//!   exists in the ledger mutates nothing and reports [`CreditOutcome::Duplicate`].
//!   This is what makes webhook redelivery safe.

use async_trait::async_trait;

use crate::domain::credits::{CreditError, CreditTransaction};
use crate::domain::foundation::UserId;

/// Result of a credit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditOutcome {
    /// Balance changed and a ledger row was appended.
    Applied,

    /// A transaction with this reference id already exists; nothing changed.
    /// Treated as success by callers.
    Duplicate,
}

/// Port for the append-only credit ledger.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Apply a debit transaction (negative amount).
    ///
    /// Decrements the user's balance and appends the ledger row atomically.
    /// When the transaction carries a reference whose id already exists in
    /// the ledger (a replayed refund clawback), nothing changes and
    /// `Duplicate` is returned.
    ///
    /// # Errors
    ///
    /// - `InsufficientCredits` if the balance is below the debit; no state
    ///   changes.
    /// - `InvalidAmount` if the transaction amount is not negative.
    /// - `UserNotFound` / `Infrastructure` on persistence failure.
    async fn deduct(&self, transaction: &CreditTransaction) -> Result<CreditOutcome, CreditError>;

    /// Apply a credit transaction (positive amount).
    ///
    /// Increments the user's balance and appends the ledger row atomically.
    /// When the transaction carries a reference whose id already exists in
    /// the ledger, nothing changes and `Duplicate` is returned.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the transaction amount is not positive.
    /// - `UserNotFound` / `Infrastructure` on persistence failure.
    async fn credit(&self, transaction: &CreditTransaction) -> Result<CreditOutcome, CreditError>;

    /// Current denormalized balance.
    async fn balance(&self, user_id: &UserId) -> Result<u32, CreditError>;

    /// Ledger rows for a user, newest first.
    async fn history(&self, user_id: &UserId, limit: u32) -> Result<Vec<CreditTransaction>, CreditError>;
}
