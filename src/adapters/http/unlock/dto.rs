//! HTTP DTOs for unlock endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::unlock::{AccessDecision, AccessReason, UnlockMethod};

/// Optional artifact scope for access checks.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessParams {
    #[serde(default)]
    pub target_id: Option<String>,
}

/// Request body for an unlock.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnlockRequest {
    #[serde(default)]
    pub target_id: Option<String>,
}

/// Result of an access check.
#[derive(Debug, Clone, Serialize)]
pub struct AccessResponse {
    pub allowed: bool,
    pub reason: AccessReason,
}

impl From<AccessDecision> for AccessResponse {
    fn from(decision: AccessDecision) -> Self {
        Self {
            allowed: decision.allowed,
            reason: decision.reason,
        }
    }
}

/// Result of an unlock.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockResponse {
    pub method: UnlockMethod,
    pub credits_spent: u32,
    pub already_unlocked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_response_serializes_reason_as_snake_case() {
        let response = AccessResponse {
            allowed: true,
            reason: AccessReason::AlreadyUnlocked,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["reason"], "already_unlocked");
    }
}
