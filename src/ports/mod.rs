//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `CreditLedger` - Append-only ledger + denormalized balance
//! - `ReferralStore` - Referral records and atomic conversion recording
//! - `SubscriptionRepository` - Subscription persistence
//! - `UnlockStore` - Persisted per-artifact unlock flags
//!
//! ## Provider Ports
//!
//! - `PaymentProvider` - Checkout sessions and webhook verification

mod credit_ledger;
mod payment_provider;
mod referral_store;
mod subscription_repository;
mod unlock_store;

pub use credit_ledger::{CreditLedger, CreditOutcome};
pub use payment_provider::{
    CheckoutSession, CheckoutSessionDetails, CreateCheckoutRequest, PaymentError, PaymentErrorCode,
    PaymentProvider,
};
pub use referral_store::ReferralStore;
pub use subscription_repository::SubscriptionRepository;
pub use unlock_store::UnlockStore;
