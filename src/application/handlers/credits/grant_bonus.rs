//! GrantBonusHandler - Command handler for admin credit grants.

use std::sync::Arc;

use crate::domain::credits::{CreditError, CreditTransaction};
use crate::domain::foundation::UserId;
use crate::ports::CreditLedger;

/// Command to grant bonus credits outside a purchase.
#[derive(Debug, Clone)]
pub struct GrantBonusCommand {
    pub user_id: UserId,
    pub amount: u32,
    pub note: String,
}

/// Result carrying the new balance.
#[derive(Debug, Clone)]
pub struct GrantBonusResult {
    pub balance: u32,
}

/// Handler for admin bonus grants.
pub struct GrantBonusHandler {
    ledger: Arc<dyn CreditLedger>,
}

impl GrantBonusHandler {
    pub fn new(ledger: Arc<dyn CreditLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, cmd: GrantBonusCommand) -> Result<GrantBonusResult, CreditError> {
        if cmd.amount == 0 {
            return Err(CreditError::invalid_amount(0));
        }

        let transaction = CreditTransaction::bonus(
            cmd.user_id.clone(),
            cmd.amount,
            serde_json::json!({ "note": cmd.note }),
        );
        self.ledger.credit(&transaction).await?;

        let balance = self.ledger.balance(&cmd.user_id).await?;

        tracing::info!(user_id = %cmd.user_id, amount = cmd.amount, "bonus credits granted");

        Ok(GrantBonusResult { balance })
    }
}
