//! Credit handlers.
//!
//! ## Commands
//! - Starting a credit pack checkout
//! - Confirming a checkout session in-request
//! - Granting bonus credits (admin)
//!
//! ## Queries
//! - Get balance and ledger history

mod confirm_checkout;
mod get_balance;
mod grant_bonus;
mod purchase_credits;

// Commands
pub use confirm_checkout::{ConfirmCheckoutCommand, ConfirmCheckoutHandler, ConfirmCheckoutResult};
pub use grant_bonus::{GrantBonusCommand, GrantBonusHandler, GrantBonusResult};
pub use purchase_credits::{PurchaseCreditsCommand, PurchaseCreditsHandler, PurchaseCreditsResult};

// Queries
pub use get_balance::{GetBalanceHandler, GetBalanceQuery, GetBalanceResult};
