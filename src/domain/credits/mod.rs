//! Credits domain module.
//!
//! The credit ledger is append-only: every change to a user's balance is
//! recorded as exactly one immutable [`CreditTransaction`]. The denormalized
//! balance on the user row is the fast-read value; replaying the ledger in
//! creation order must always reproduce it.

mod errors;
mod pricing;
mod transaction;

pub use errors::CreditError;
pub use pricing::{CreditPack, COMPATIBILITY_REPORT_COST, COSMIC_SNAPSHOT_COST, RARITY_DETAIL_COST, REPORT_PDF_COST};
pub use transaction::{CreditTransaction, ReferenceType, TransactionReference, TransactionType};
