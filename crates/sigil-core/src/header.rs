//! # Token Header
//!
//! The first segment of a token: a small JSON document naming the sealing
//! algorithm, the token type, and optionally a key identifier.
//!
//! Field order is fixed (`alg`, `typ`, `kid`) so the same header always
//! encodes to the same segment.

use crate::segments::{decode_segment, encode_segment};
use crate::types::{Algorithm, SigilError};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEADER
// =============================================================================

/// The header of a compact token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The sealing algorithm.
    pub alg: Algorithm,

    /// The token type. Always `"JWT"` when present; other values are
    /// rejected at decode time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,

    /// Optional key identifier, used by verifiers that hold several keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

/// The only accepted value for the `typ` field.
pub const TOKEN_TYPE: &str = "JWT";

impl Header {
    /// Create a header for the given algorithm with the standard type marker.
    #[must_use]
    pub fn new(alg: Algorithm) -> Self {
        Self {
            alg,
            typ: Some(TOKEN_TYPE.to_string()),
            kid: None,
        }
    }

    /// Attach a key identifier.
    #[must_use]
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Encode the header as a Base64URL segment.
    pub fn encode(&self) -> Result<String, SigilError> {
        let json =
            serde_json::to_vec(self).map_err(|e| SigilError::InvalidJson(e.to_string()))?;
        Ok(encode_segment(&json))
    }

    /// Decode a Base64URL segment into a header.
    ///
    /// Rejection order matters for the `none` check: the raw `alg` string is
    /// inspected before full deserialization, so a forbidden algorithm is
    /// reported as `AlgorithmForbidden` rather than a generic JSON error.
    pub fn decode(segment: &str) -> Result<Self, SigilError> {
        let bytes = decode_segment(segment)?;

        // Surface forbidden and unknown algorithms precisely.
        let raw: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| SigilError::InvalidJson(e.to_string()))?;
        let alg_name = raw
            .get("alg")
            .and_then(|v| v.as_str())
            .ok_or_else(|| SigilError::InvalidJson("header missing 'alg'".to_string()))?;
        let alg = Algorithm::from_name(alg_name)?;

        let typ = raw.get("typ").and_then(|v| v.as_str()).map(str::to_string);
        if let Some(t) = &typ {
            if t != TOKEN_TYPE {
                return Err(SigilError::InvalidJson(format!(
                    "unsupported token type '{}'",
                    t
                )));
            }
        }

        let kid = raw.get("kid").and_then(|v| v.as_str()).map(str::to_string);

        Ok(Self { alg, typ, kid })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hs256_header_encodes_to_canonical_segment() {
        let header = Header::new(Algorithm::Hs256);
        let segment = header.encode().expect("encode");
        assert_eq!(segment, "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9");
    }

    #[test]
    fn header_round_trips() {
        let header = Header::new(Algorithm::Hs512).with_kid("k1");
        let segment = header.encode().expect("encode");
        let decoded = Header::decode(&segment).expect("decode");
        assert_eq!(decoded, header);
    }

    #[test]
    fn decode_rejects_none_algorithm() {
        let segment = crate::segments::encode_segment(br#"{"alg":"none","typ":"JWT"}"#);
        let err = Header::decode(&segment).expect_err("must reject");
        assert!(matches!(err, SigilError::AlgorithmForbidden));
    }

    #[test]
    fn decode_rejects_unknown_algorithm() {
        let segment = crate::segments::encode_segment(br#"{"alg":"ES256","typ":"JWT"}"#);
        let err = Header::decode(&segment).expect_err("must reject");
        assert!(matches!(err, SigilError::UnknownAlgorithm(_)));
    }

    #[test]
    fn decode_rejects_missing_algorithm() {
        let segment = crate::segments::encode_segment(br#"{"typ":"JWT"}"#);
        let err = Header::decode(&segment).expect_err("must reject");
        assert!(matches!(err, SigilError::InvalidJson(_)));
    }

    #[test]
    fn decode_rejects_foreign_token_type() {
        let segment = crate::segments::encode_segment(br#"{"alg":"HS256","typ":"SAML"}"#);
        let err = Header::decode(&segment).expect_err("must reject");
        assert!(matches!(err, SigilError::InvalidJson(_)));
    }

    #[test]
    fn decode_accepts_absent_typ() {
        let segment = crate::segments::encode_segment(br#"{"alg":"HS384"}"#);
        let header = Header::decode(&segment).expect("decode");
        assert_eq!(header.alg, Algorithm::Hs384);
        assert_eq!(header.typ, None);
    }
}
