//! Unlock domain module.
//!
//! Decides whether a user may access a gated artifact, combining persisted
//! unlock flags, subscription state, referral progress, and credit balance.

mod feature;
mod policy;

pub use feature::{FeatureUnlock, GatedFeature, UnlockMethod};
pub use policy::{evaluate, AccessDecision, AccessReason, AccessSnapshot};
