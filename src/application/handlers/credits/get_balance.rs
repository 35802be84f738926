//! GetBalanceHandler - Query handler for balance and ledger history.

use std::sync::Arc;

use crate::domain::credits::{CreditError, CreditTransaction};
use crate::domain::foundation::UserId;
use crate::ports::CreditLedger;

/// Query for a user's balance and recent transactions.
#[derive(Debug, Clone)]
pub struct GetBalanceQuery {
    pub user_id: UserId,
    /// Maximum transactions to return, newest first.
    pub history_limit: u32,
}

/// Balance plus recent ledger rows.
#[derive(Debug, Clone)]
pub struct GetBalanceResult {
    pub balance: u32,
    pub history: Vec<CreditTransaction>,
}

/// Handler for the balance/history query.
pub struct GetBalanceHandler {
    ledger: Arc<dyn CreditLedger>,
}

impl GetBalanceHandler {
    pub fn new(ledger: Arc<dyn CreditLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, query: GetBalanceQuery) -> Result<GetBalanceResult, CreditError> {
        let balance = self.ledger.balance(&query.user_id).await?;
        let history = self
            .ledger
            .history(&query.user_id, query.history_limit)
            .await?;

        Ok(GetBalanceResult { balance, history })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCreditLedger;
    use crate::domain::credits::{CreditTransaction, TransactionReference};

    fn test_user_id() -> UserId {
        UserId::new("user-123").unwrap()
    }

    #[tokio::test]
    async fn returns_zero_for_fresh_user() {
        let ledger = Arc::new(InMemoryCreditLedger::with_user(test_user_id(), 0));
        let handler = GetBalanceHandler::new(ledger);

        let result = handler
            .handle(GetBalanceQuery {
                user_id: test_user_id(),
                history_limit: 10,
            })
            .await
            .unwrap();

        assert_eq!(result.balance, 0);
        assert!(result.history.is_empty());
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let ledger = Arc::new(InMemoryCreditLedger::with_user(test_user_id(), 0));

        let first = CreditTransaction::purchase(
            test_user_id(),
            10,
            TransactionReference::webhook("pi_1"),
            serde_json::Value::Null,
        );
        let second = CreditTransaction::bonus(test_user_id(), 5, serde_json::Value::Null);
        ledger.credit(&first).await.unwrap();
        ledger.credit(&second).await.unwrap();

        let handler = GetBalanceHandler::new(ledger);
        let result = handler
            .handle(GetBalanceQuery {
                user_id: test_user_id(),
                history_limit: 10,
            })
            .await
            .unwrap();

        assert_eq!(result.balance, 15);
        assert_eq!(result.history.len(), 2);
        assert_eq!(result.history[0].id, second.id);
    }
}
