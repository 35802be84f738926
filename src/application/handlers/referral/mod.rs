//! Referral handlers.
//!
//! ## Commands
//! - Get-or-create a referral for a gated feature
//! - Record a referral conversion

mod get_or_create_referral;
mod record_conversion;

pub use get_or_create_referral::{
    GetOrCreateReferralCommand, GetOrCreateReferralHandler, GetOrCreateReferralResult,
};
pub use record_conversion::{
    RecordConversionCommand, RecordConversionHandler, RecordConversionResult,
};
