//! Credit-ledger error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InsufficientCredits | 402 |
//! | UserNotFound | 404 |
//! | InvalidAmount | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, UserId};

/// Errors raised by credit ledger operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreditError {
    /// Balance is lower than the requested deduction. Carries the exact
    /// shortfall so callers can surface it.
    InsufficientCredits { required: u32, balance: u32 },

    /// No user row exists for this id.
    UserNotFound(UserId),

    /// Zero or otherwise unusable amount.
    InvalidAmount(i64),

    /// Storage or other infrastructure failure.
    Infrastructure(String),
}

impl CreditError {
    pub fn insufficient(required: u32, balance: u32) -> Self {
        CreditError::InsufficientCredits { required, balance }
    }

    pub fn user_not_found(user_id: UserId) -> Self {
        CreditError::UserNotFound(user_id)
    }

    pub fn invalid_amount(amount: i64) -> Self {
        CreditError::InvalidAmount(amount)
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        CreditError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CreditError::InsufficientCredits { .. } => ErrorCode::InsufficientCredits,
            CreditError::UserNotFound(_) => ErrorCode::UserNotFound,
            CreditError::InvalidAmount(_) => ErrorCode::ValidationFailed,
            CreditError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing message.
    pub fn message(&self) -> String {
        match self {
            CreditError::InsufficientCredits { required, balance } => format!(
                "Insufficient credits: {} required, {} available ({} short)",
                required,
                balance,
                required.saturating_sub(*balance)
            ),
            CreditError::UserNotFound(user_id) => format!("No user found: {}", user_id),
            CreditError::InvalidAmount(amount) => format!("Invalid credit amount: {}", amount),
            CreditError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for CreditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CreditError {}

impl From<DomainError> for CreditError {
    fn from(err: DomainError) -> Self {
        CreditError::Infrastructure(err.to_string())
    }
}

impl From<CreditError> for DomainError {
    fn from(err: CreditError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
