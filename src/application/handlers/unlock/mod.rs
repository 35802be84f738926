//! Unlock handlers.
//!
//! ## Commands
//! - Unlocking a gated feature (persists the flag, deducts on the paid path)
//!
//! ## Queries
//! - Checking access to a gated feature

mod check_access;
mod snapshot;
mod unlock_feature;

// Commands
pub use unlock_feature::{UnlockFeatureCommand, UnlockFeatureHandler, UnlockFeatureResult};

// Queries
pub use check_access::{CheckAccessHandler, CheckAccessQuery, CheckAccessResult};
