//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// SIGN REQUEST/RESPONSE
// =============================================================================

/// Token signing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignRequest {
    /// The claim set to seal, as a JSON object.
    pub claims: Map<String, Value>,

    /// Lifetime override in seconds; the configured TTL applies otherwise.
    #[serde(default)]
    pub ttl_secs: Option<i64>,
}

/// Token signing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignResponse {
    pub success: bool,
    pub token: Option<String>,
    pub error: Option<String>,
}

impl SignResponse {
    pub fn success(token: String) -> Self {
        Self {
            success: true,
            token: Some(token),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            token: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// VERIFY REQUEST/RESPONSE
// =============================================================================

/// Token verification request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// The compact token to verify.
    pub token: String,
}

/// Token verification response.
///
/// A rejected token is a successful verification request: `success` stays
/// true, `valid` is false, and `reason` names the rejection. Only transport
/// and encoding problems are reported as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub valid: bool,
    pub claims: Option<Value>,
    pub reason: Option<String>,
}

impl VerifyResponse {
    pub fn valid(claims: Value) -> Self {
        Self {
            success: true,
            valid: true,
            claims: Some(claims),
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            success: true,
            valid: false,
            claims: None,
            reason: Some(reason.into()),
        }
    }
}

// =============================================================================
// INSPECT REQUEST/RESPONSE
// =============================================================================

/// Token inspection request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectRequest {
    /// The compact token to decode. No key is involved.
    pub token: String,
}

/// Token inspection response.
///
/// `verified` is always false; the field exists so no consumer can mistake
/// inspection output for an authentication result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectResponse {
    pub success: bool,
    pub verified: bool,
    pub header: Option<Value>,
    pub claims: Option<Value>,
    pub seal_b64: Option<String>,
    pub error: Option<String>,
}

impl InspectResponse {
    pub fn success(header: Value, claims: Value, seal_b64: String) -> Self {
        Self {
            success: true,
            verified: false,
            header: Some(header),
            claims: Some(claims),
            seal_b64: Some(seal_b64),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            verified: false,
            header: None,
            claims: None,
            seal_b64: None,
            error: Some(msg.into()),
        }
    }
}
