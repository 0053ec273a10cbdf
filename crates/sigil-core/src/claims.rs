//! # Claims
//!
//! The second segment of a token: a JSON document of claims about a
//! subject. The registered claim names (`iss`, `sub`, `aud`, `exp`, `nbf`,
//! `iat`, `jti`) have typed fields; everything else is a private claim.
//!
//! ## Determinism
//!
//! Private claims preserve insertion order, so the same claim set always
//! serializes to the same payload segment and therefore the same token.
//!
//! ## Not Confidential
//!
//! Claims are integrity-protected by the seal but readable by anyone who
//! holds the token. Nothing secret belongs in a claim.

use crate::segments::{decode_segment, encode_segment};
use crate::types::{SigilError, UnixTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// AUDIENCE
// =============================================================================

/// The `aud` claim: a single audience or a list of them.
///
/// Both shapes appear on the wire, so both deserialize; a single string
/// stays a single string when re-serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// One audience.
    One(String),
    /// Several audiences.
    Many(Vec<String>),
}

impl Audience {
    /// Whether this audience set includes the given name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::One(aud) => aud == name,
            Self::Many(auds) => auds.iter().any(|a| a == name),
        }
    }
}

// =============================================================================
// CLAIMS
// =============================================================================

/// Registered claim names. Private claims may not shadow these.
pub const REGISTERED_NAMES: [&str; 7] = ["iss", "sub", "aud", "exp", "nbf", "iat", "jti"];

/// The claim set of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Claims {
    /// Issuer: who sealed the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Subject: who the token is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Audience: who the token is intended for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,

    /// Expiry: the token is rejected after this instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<UnixTime>,

    /// Not-before: the token is rejected before this instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<UnixTime>,

    /// Issued-at: when the token was sealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<UnixTime>,

    /// Token identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Private claims, in insertion order.
    #[serde(flatten)]
    pub private: Map<String, Value>,
}

impl Claims {
    /// Create an empty claim set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the issuer.
    #[must_use]
    pub fn with_issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Set the subject.
    #[must_use]
    pub fn with_subject(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Set a single audience.
    #[must_use]
    pub fn with_audience(mut self, aud: impl Into<String>) -> Self {
        self.aud = Some(Audience::One(aud.into()));
        self
    }

    /// Set the expiry instant.
    #[must_use]
    pub fn with_expiry(mut self, exp: UnixTime) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set the not-before instant.
    #[must_use]
    pub fn with_not_before(mut self, nbf: UnixTime) -> Self {
        self.nbf = Some(nbf);
        self
    }

    /// Set the issued-at instant.
    #[must_use]
    pub fn with_issued_at(mut self, iat: UnixTime) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set the token identifier.
    #[must_use]
    pub fn with_token_id(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }

    /// Add a private claim.
    ///
    /// Registered names are rejected so a private claim can never shadow a
    /// typed field and produce a payload with duplicate keys.
    pub fn with_private(
        mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<Self, SigilError> {
        let name = name.into();
        if REGISTERED_NAMES.contains(&name.as_str()) {
            return Err(SigilError::ReservedClaim(name));
        }
        self.private.insert(name, value);
        Ok(self)
    }

    /// Look up a private claim by name.
    #[must_use]
    pub fn private_claim(&self, name: &str) -> Option<&Value> {
        self.private.get(name)
    }

    /// Iterate every claim present as `(name, value)` pairs, registered
    /// claims first in canonical order, then private claims in insertion
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (String, Value)> + '_ {
        let mut pairs: Vec<(String, Value)> = Vec::new();

        if let Some(iss) = &self.iss {
            pairs.push(("iss".to_string(), Value::String(iss.clone())));
        }
        if let Some(sub) = &self.sub {
            pairs.push(("sub".to_string(), Value::String(sub.clone())));
        }
        if let Some(aud) = &self.aud {
            let value = match aud {
                Audience::One(a) => Value::String(a.clone()),
                Audience::Many(auds) => {
                    Value::Array(auds.iter().cloned().map(Value::String).collect())
                }
            };
            pairs.push(("aud".to_string(), value));
        }
        if let Some(exp) = self.exp {
            pairs.push(("exp".to_string(), Value::from(exp.as_secs())));
        }
        if let Some(nbf) = self.nbf {
            pairs.push(("nbf".to_string(), Value::from(nbf.as_secs())));
        }
        if let Some(iat) = self.iat {
            pairs.push(("iat".to_string(), Value::from(iat.as_secs())));
        }
        if let Some(jti) = &self.jti {
            pairs.push(("jti".to_string(), Value::String(jti.clone())));
        }
        for (name, value) in &self.private {
            pairs.push((name.clone(), value.clone()));
        }

        pairs.into_iter()
    }

    /// Encode the claims as a Base64URL segment.
    pub fn encode(&self) -> Result<String, SigilError> {
        let json =
            serde_json::to_vec(self).map_err(|e| SigilError::InvalidJson(e.to_string()))?;
        Ok(encode_segment(&json))
    }

    /// Decode a Base64URL segment into a claim set.
    pub fn decode(segment: &str) -> Result<Self, SigilError> {
        let bytes = decode_segment(segment)?;
        serde_json::from_slice(&bytes).map_err(|e| SigilError::InvalidJson(e.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
