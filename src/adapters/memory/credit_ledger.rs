//! In-memory implementation of CreditLedger.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::credits::{CreditError, CreditTransaction};
use crate::domain::foundation::UserId;
use crate::ports::{CreditLedger, CreditOutcome};

#[derive(Default)]
struct LedgerState {
    balances: HashMap<String, u32>,
    transactions: Vec<CreditTransaction>,
}

/// In-memory credit ledger.
///
/// The single mutex makes every balance-check-and-mutate a critical
/// section, mirroring the conditional UPDATE the PostgreSQL adapter runs.
pub struct InMemoryCreditLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryCreditLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// Creates a ledger with one registered user at the given balance.
    pub fn with_user(user_id: UserId, credits: u32) -> Self {
        let ledger = Self::new();
        ledger.register_user(user_id, credits);
        ledger
    }

    /// Registers a user row.
    pub fn register_user(&self, user_id: UserId, credits: u32) {
        let mut state = self.state.lock().unwrap();
        state.balances.insert(user_id.to_string(), credits);
    }

    fn has_reference(state: &LedgerState, transaction: &CreditTransaction) -> bool {
        let Some(reference) = &transaction.reference else {
            return false;
        };
        state.transactions.iter().any(|t| {
            t.reference
                .as_ref()
                .is_some_and(|r| r.reference_id == reference.reference_id)
        })
    }
}

impl Default for InMemoryCreditLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CreditLedger for InMemoryCreditLedger {
    async fn deduct(&self, transaction: &CreditTransaction) -> Result<CreditOutcome, CreditError> {
        if transaction.amount >= 0 {
            return Err(CreditError::invalid_amount(transaction.amount));
        }
        let amount = transaction.amount.unsigned_abs() as u32;

        let mut state = self.state.lock().unwrap();

        if Self::has_reference(&state, transaction) {
            return Ok(CreditOutcome::Duplicate);
        }

        let key = transaction.user_id.to_string();
        let balance = *state
            .balances
            .get(&key)
            .ok_or_else(|| CreditError::user_not_found(transaction.user_id.clone()))?;

        if amount > balance {
            return Err(CreditError::insufficient(amount, balance));
        }

        state.balances.insert(key, balance - amount);
        state.transactions.push(transaction.clone());
        Ok(CreditOutcome::Applied)
    }

    async fn credit(&self, transaction: &CreditTransaction) -> Result<CreditOutcome, CreditError> {
        if transaction.amount <= 0 {
            return Err(CreditError::invalid_amount(transaction.amount));
        }
        let amount = transaction.amount as u32;

        let mut state = self.state.lock().unwrap();

        if Self::has_reference(&state, transaction) {
            return Ok(CreditOutcome::Duplicate);
        }

        let key = transaction.user_id.to_string();
        let balance = *state
            .balances
            .get(&key)
            .ok_or_else(|| CreditError::user_not_found(transaction.user_id.clone()))?;

        state.balances.insert(key, balance + amount);
        state.transactions.push(transaction.clone());
        Ok(CreditOutcome::Applied)
    }

    async fn balance(&self, user_id: &UserId) -> Result<u32, CreditError> {
        let state = self.state.lock().unwrap();
        state
            .balances
            .get(&user_id.to_string())
            .copied()
            .ok_or_else(|| CreditError::user_not_found(user_id.clone()))
    }

    async fn history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<CreditTransaction>, CreditError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .transactions
            .iter()
            .rev()
            .filter(|t| &t.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credits::TransactionReference;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[tokio::test]
    async fn ledger_sum_matches_balance() {
        let ledger = InMemoryCreditLedger::with_user(user(), 0);

        ledger
            .credit(&CreditTransaction::purchase(
                user(),
                10,
                TransactionReference::webhook("pi_1"),
                serde_json::Value::Null,
            ))
            .await
            .unwrap();
        ledger
            .credit(&CreditTransaction::bonus(user(), 4, serde_json::Value::Null))
            .await
            .unwrap();
        ledger
            .deduct(&CreditTransaction::deduction(
                user(),
                2,
                "report",
                None,
                serde_json::Value::Null,
            ))
            .await
            .unwrap();

        let balance = ledger.balance(&user()).await.unwrap();
        let sum: i64 = ledger
            .history(&user(), 100)
            .await
            .unwrap()
            .iter()
            .map(|t| t.amount)
            .sum();

        assert_eq!(balance, 12);
        assert_eq!(sum, i64::from(balance));
    }

    #[tokio::test]
    async fn overdraft_leaves_balance_untouched() {
        let ledger = InMemoryCreditLedger::with_user(user(), 1);

        let result = ledger
            .deduct(&CreditTransaction::deduction(
                user(),
                2,
                "report",
                None,
                serde_json::Value::Null,
            ))
            .await;

        assert!(matches!(
            result,
            Err(CreditError::InsufficientCredits {
                required: 2,
                balance: 1
            })
        ));
        assert_eq!(ledger.balance(&user()).await.unwrap(), 1);
        assert!(ledger.history(&user(), 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_reference_is_noop_across_types() {
        let ledger = InMemoryCreditLedger::with_user(user(), 0);

        let via_webhook = CreditTransaction::purchase(
            user(),
            10,
            TransactionReference::webhook("pi_1"),
            serde_json::Value::Null,
        );
        let via_confirm = CreditTransaction::purchase(
            user(),
            10,
            TransactionReference::purchase("pi_1"),
            serde_json::Value::Null,
        );

        assert_eq!(
            ledger.credit(&via_webhook).await.unwrap(),
            CreditOutcome::Applied
        );
        assert_eq!(
            ledger.credit(&via_confirm).await.unwrap(),
            CreditOutcome::Duplicate
        );
        assert_eq!(ledger.balance(&user()).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn positive_amount_rejected_by_deduct() {
        let ledger = InMemoryCreditLedger::with_user(user(), 10);
        let mut tx =
            CreditTransaction::deduction(user(), 2, "report", None, serde_json::Value::Null);
        tx.amount = 2; // corrupt the sign

        assert!(matches!(
            ledger.deduct(&tx).await,
            Err(CreditError::InvalidAmount(2))
        ));
    }

    #[tokio::test]
    async fn unknown_user_is_reported() {
        let ledger = InMemoryCreditLedger::new();
        let result = ledger.balance(&user()).await;
        assert!(matches!(result, Err(CreditError::UserNotFound(_))));
    }
}
