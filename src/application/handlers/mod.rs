//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.
//!
//! - `credits` - balance/history queries, checkout, confirmation, grants
//! - `unlock` - access checks and feature unlocking
//! - `referral` - referral creation and conversion recording
//! - `rarity` - rarity score calculation
//! - `payments` - webhook reconciliation

pub mod credits;
pub mod payments;
pub mod rarity;
pub mod referral;
pub mod unlock;
