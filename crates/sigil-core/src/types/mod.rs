//! # Core Type Definitions
//!
//! This module contains all core types for the Sigil token engine:
//! - Sealing algorithm selection (`Algorithm`)
//! - Time representation (`UnixTime`)
//! - Key material (`SigningKey`)
//! - Error types (`SigilError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Use saturating arithmetic for time offsets to prevent overflow
//! - Never read ambient state (clock access goes through the `Clock` trait)

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ALGORITHM
// =============================================================================

/// The sealing algorithm for a token.
///
/// Only the symmetric HMAC-SHA2 family is supported. The `"none"`
/// pseudo-algorithm is rejected outright: a token without a seal carries
/// no integrity protection, and accepting it would let anyone forge claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// HMAC with SHA-256 (32-byte seal).
    #[serde(rename = "HS256")]
    Hs256,
    /// HMAC with SHA-384 (48-byte seal).
    #[serde(rename = "HS384")]
    Hs384,
    /// HMAC with SHA-512 (64-byte seal).
    #[serde(rename = "HS512")]
    Hs512,
}

impl Algorithm {
    /// Wire name of the algorithm as it appears in a token header.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
        }
    }

    /// Length of the seal in bytes for this algorithm.
    #[must_use]
    pub const fn seal_len(self) -> usize {
        match self {
            Self::Hs256 => 32,
            Self::Hs384 => 48,
            Self::Hs512 => 64,
        }
    }

    /// Parse a wire name into an algorithm.
    ///
    /// Returns `SigilError::AlgorithmForbidden` for any case variant of
    /// `"none"` and `SigilError::UnknownAlgorithm` for everything else
    /// that is not in the HS2xx family.
    pub fn from_name(name: &str) -> Result<Self, SigilError> {
        match name {
            "HS256" => Ok(Self::Hs256),
            "HS384" => Ok(Self::Hs384),
            "HS512" => Ok(Self::Hs512),
            other if other.eq_ignore_ascii_case("none") => Err(SigilError::AlgorithmForbidden),
            other => Err(SigilError::UnknownAlgorithm(other.to_string())),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// UNIX TIME
// =============================================================================

/// Seconds since the Unix epoch.
///
/// Temporal claims (`exp`, `nbf`, `iat`) are plain integer seconds on the
/// wire. Uses i64 with saturating arithmetic so offset math cannot overflow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct UnixTime(pub i64);

impl UnixTime {
    /// Create a timestamp from raw seconds.
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// Get the raw seconds value.
    #[must_use]
    pub const fn as_secs(self) -> i64 {
        self.0
    }

    /// Add a number of seconds using saturating arithmetic.
    #[must_use]
    pub const fn saturating_add_secs(self, secs: i64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

// =============================================================================
// SIGNING KEY
// =============================================================================

/// Secret key material for sealing and verifying tokens.
///
/// The `Debug` implementation redacts the bytes so the secret cannot leak
/// through logs or error formatting. Empty keys are rejected at
/// construction: HMAC technically accepts them, but an empty secret makes
/// every seal forgeable.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    material: Vec<u8>,
}

impl SigningKey {
    /// Create a key from raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, SigilError> {
        let material = bytes.into();
        if material.is_empty() {
            return Err(SigilError::EmptyKey);
        }
        Ok(Self { material })
    }

    /// Create a key from a standard Base64 string.
    pub fn from_base64(encoded: &str) -> Result<Self, SigilError> {
        use base64::Engine;
        let material = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| SigilError::InvalidBase64(e.to_string()))?;
        Self::from_bytes(material)
    }

    /// Get the raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.material
    }

    /// Length of the key in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.material.len()
    }

    /// Whether the key is empty. Always false for a constructed key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.material.is_empty()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("material", &"<redacted>")
            .field("len", &self.material.len())
            .finish()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Sigil token engine.
///
/// - No silent failures
/// - Use `Result<T, SigilError>` for fallible operations
/// - The engine never panics; all rejections are recoverable values
#[derive(Debug, Error)]
pub enum SigilError {
    /// The compact form does not have exactly three non-empty segments.
    #[error("Malformed token: expected three dot-separated segments")]
    Malformed,

    /// A segment is not valid unpadded URL-safe Base64.
    #[error("Invalid Base64 data: {0}")]
    InvalidBase64(String),

    /// A decoded segment is not the expected JSON document.
    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),

    /// The header requested the `none` pseudo-algorithm.
    #[error("Unsealed tokens are forbidden (alg \"none\")")]
    AlgorithmForbidden,

    /// The header names an algorithm outside the supported family.
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The header algorithm does not match what the verifier expects.
    #[error("Algorithm mismatch: expected {expected}, token uses {found}")]
    AlgorithmMismatch {
        /// The algorithm the verifier was configured for.
        expected: Algorithm,
        /// The algorithm declared in the token header.
        found: Algorithm,
    },

    /// The seal does not match the header and payload.
    #[error("Seal verification failed")]
    InvalidSignature,

    /// The token expired before the verification instant.
    #[error("Token expired at {expired_at:?} (now {now:?})")]
    Expired {
        /// The `exp` claim of the token.
        expired_at: UnixTime,
        /// The verification instant.
        now: UnixTime,
    },

    /// The token is not valid yet.
    #[error("Token not valid before {not_before:?} (now {now:?})")]
    NotYetValid {
        /// The `nbf` claim of the token.
        not_before: UnixTime,
        /// The verification instant.
        now: UnixTime,
    },

    /// The `iss` claim is absent or does not match the required issuer.
    #[error("Issuer mismatch: required {required}")]
    IssuerMismatch {
        /// The issuer the verifier requires.
        required: String,
    },

    /// The `aud` claim is absent or does not include the required audience.
    #[error("Audience mismatch: required {required}")]
    AudienceMismatch {
        /// The audience the verifier requires.
        required: String,
    },

    /// No key is available for the token (unknown `kid`, or none configured).
    #[error("No key available for token (kid: {kid:?})")]
    KeyUnavailable {
        /// The key identifier from the token header, if any.
        kid: Option<String>,
    },

    /// Key material is empty.
    #[error("Signing key must not be empty")]
    EmptyKey,

    /// A private claim tried to use a registered claim name.
    #[error("Claim name '{0}' is registered; use the typed setter")]
    ReservedClaim(String),

    /// The MAC backend rejected the key.
    #[error("Cryptographic backend error")]
    Crypto,

    /// An I/O error occurred (used by the application layer).
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration is missing or inconsistent (used by the application layer).
    #[error("Configuration error: {0}")]
    Config(String),
}

// =============================================================================
// TESTS
// =============================================================================
