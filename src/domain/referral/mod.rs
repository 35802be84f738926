//! Referral domain module.
//!
//! Users earn feature unlocks by referring others. A [`Referral`] record is
//! created lazily per (referrer, feature, target) and its success counter
//! only ever moves up, driven by verified [`ReferralConversion`] events.

mod aggregate;
mod conversion;

pub use aggregate::{Referral, REFERRAL_UNLOCK_THRESHOLD};
pub use conversion::{ConversionOutcome, ReferralConversion};
