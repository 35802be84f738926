//! Stripe-specific wire types.
//!
//! Signature header parsing plus the slice of Stripe's checkout session
//! object we actually read.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Signature Parsing
// ════════════════════════════════════════════════════════════════════════════════

/// Error parsing the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureParseError {
    /// Header is empty or missing.
    MissingHeader,
    /// Missing timestamp component (t=...).
    MissingTimestamp,
    /// Missing v1 signature component.
    MissingV1Signature,
    /// Invalid timestamp format.
    InvalidTimestamp,
    /// Invalid signature format (not valid hex).
    InvalidSignatureFormat,
}

impl std::fmt::Display for SignatureParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "Missing Stripe-Signature header"),
            Self::MissingTimestamp => write!(f, "Missing timestamp (t=) in signature"),
            Self::MissingV1Signature => write!(f, "Missing v1 signature in header"),
            Self::InvalidTimestamp => write!(f, "Invalid timestamp format"),
            Self::InvalidSignatureFormat => write!(f, "Invalid signature format (not valid hex)"),
        }
    }
}

impl std::error::Error for SignatureParseError {}

/// Parsed Stripe-Signature header components.
///
/// The header format is: `t=timestamp,v1=signature[,v0=legacy_signature]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when Stripe generated the event.
    pub timestamp: i64,

    /// Primary v1 signature (HMAC-SHA256, hex-encoded).
    pub v1_signature: Vec<u8>,
}

impl SignatureHeader {
    /// Parse a Stripe-Signature header into components.
    ///
    /// # Format
    ///
    /// ```text
    /// t=<timestamp>,v1=<signature>[,v0=<legacy_signature>]
    /// ```
    pub fn parse(header: &str) -> Result<Self, SignatureParseError> {
        if header.is_empty() {
            return Err(SignatureParseError::MissingHeader);
        }

        let mut timestamp: Option<i64> = None;
        let mut v1_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or(SignatureParseError::MissingTimestamp)?;

            match key.trim() {
                "t" => {
                    timestamp = Some(
                        value
                            .trim()
                            .parse()
                            .map_err(|_| SignatureParseError::InvalidTimestamp)?,
                    );
                }
                "v1" => {
                    v1_signature = Some(
                        hex_decode(value.trim())
                            .ok_or(SignatureParseError::InvalidSignatureFormat)?,
                    );
                }
                _ => {
                    // Ignore v0 and unknown fields for forward compatibility
                }
            }
        }

        Ok(Self {
            timestamp: timestamp.ok_or(SignatureParseError::MissingTimestamp)?,
            v1_signature: v1_signature.ok_or(SignatureParseError::MissingV1Signature)?,
        })
    }
}

/// Decode a hex string to bytes.
pub(super) fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return None;
    }

    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        let byte = u8::from_str_radix(&hex[i..i + 2], 16).ok()?;
        bytes.push(byte);
    }
    Some(bytes)
}

/// Encode bytes to hex string.
pub(super) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// Stripe API Objects
// ════════════════════════════════════════════════════════════════════════════════

/// Checkout session object as returned by the Stripe API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub(super) struct StripeCheckoutSession {
    /// Session identifier (cs_...).
    pub id: String,

    /// Hosted checkout URL (present while the session is open).
    #[serde(default)]
    pub url: Option<String>,

    /// Payment intent behind the session (pi_...), once created.
    #[serde(default)]
    pub payment_intent: Option<String>,

    /// "paid", "unpaid", or "no_payment_required".
    #[serde(default)]
    pub payment_status: String,

    /// When the session expires (Unix timestamp).
    #[serde(default)]
    pub expires_at: i64,

    /// Metadata attached at creation.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ══════════════════════════════════════════════════════════════
    // SignatureHeader Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parses_valid_header() {
        let header = SignatureHeader::parse("t=1704067200,v1=deadbeef").unwrap();
        assert_eq!(header.timestamp, 1704067200);
        assert_eq!(header.v1_signature, vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn parses_header_with_legacy_v0() {
        let header = SignatureHeader::parse("t=1704067200,v1=00ff,v0=abcd").unwrap();
        assert_eq!(header.v1_signature, vec![0x00, 0xff]);
    }

    #[test]
    fn empty_header_is_rejected() {
        assert_eq!(
            SignatureHeader::parse(""),
            Err(SignatureParseError::MissingHeader)
        );
    }

    #[test]
    fn missing_timestamp_is_rejected() {
        assert_eq!(
            SignatureHeader::parse("v1=deadbeef"),
            Err(SignatureParseError::MissingTimestamp)
        );
    }

    #[test]
    fn missing_v1_is_rejected() {
        assert_eq!(
            SignatureHeader::parse("t=1704067200"),
            Err(SignatureParseError::MissingV1Signature)
        );
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        assert_eq!(
            SignatureHeader::parse("t=soon,v1=deadbeef"),
            Err(SignatureParseError::InvalidTimestamp)
        );
    }

    #[test]
    fn odd_length_hex_is_rejected() {
        assert_eq!(
            SignatureHeader::parse("t=1704067200,v1=abc"),
            Err(SignatureParseError::InvalidSignatureFormat)
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Hex Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn hex_roundtrip() {
        let bytes = vec![0x00, 0x7f, 0xff, 0x42];
        assert_eq!(hex_decode(&hex_encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn hex_decode_rejects_non_hex() {
        assert!(hex_decode("zzzz").is_none());
    }

    // ══════════════════════════════════════════════════════════════
    // Checkout Session Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn deserialize_checkout_session() {
        let json = r#"{
            "id": "cs_test_abc",
            "url": "https://checkout.stripe.com/pay/cs_test_abc",
            "payment_intent": "pi_123",
            "payment_status": "paid",
            "expires_at": 1704153600,
            "metadata": {"user_id": "user-1", "credits_to_award": "10"}
        }"#;

        let session: StripeCheckoutSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.id, "cs_test_abc");
        assert_eq!(session.payment_intent.as_deref(), Some("pi_123"));
        assert_eq!(session.payment_status, "paid");
        assert_eq!(session.metadata.get("user_id").map(String::as_str), Some("user-1"));
    }

    #[test]
    fn deserialize_minimal_checkout_session() {
        let session: StripeCheckoutSession = serde_json::from_str(r#"{"id": "cs_1"}"#).unwrap();
        assert!(session.payment_intent.is_none());
        assert!(session.metadata.is_empty());
    }
}
