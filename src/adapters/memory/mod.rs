//! In-memory store implementations.
//!
//! Mutex-guarded state that reproduces the same atomicity contracts as the
//! PostgreSQL adapters (conditional decrement, transactional conversion
//! recording), so handler and integration tests exercise identical
//! semantics without a database.

mod credit_ledger;
mod referral_store;
mod subscription_repository;
mod unlock_store;

pub use credit_ledger::InMemoryCreditLedger;
pub use referral_store::InMemoryReferralStore;
pub use subscription_repository::InMemorySubscriptionRepository;
pub use unlock_store::InMemoryUnlockStore;
