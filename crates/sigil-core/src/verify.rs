//! # Verification
//!
//! Staged verification of a compact token. The stages run in a fixed
//! order and the first failure wins:
//!
//! 1. Structure: exactly three non-empty segments
//! 2. Header: valid JSON, known algorithm, `none` forbidden
//! 3. Algorithm: must match what the verifier expects
//! 4. Seal: constant-time comparison of the recomputed MAC
//! 5. Temporal claims: `exp`, then `nbf`, with configured leeway
//! 6. Issuer, then audience, when required
//!
//! The seal check precedes every claim check: no claim is decoded into a
//! trusted result until the token is known to be authentic.

use crate::claims::Claims;
use crate::clock::Clock;
use crate::header::Header;
use crate::segments::{decode_segment, signing_input, split_compact};
use crate::sign::compute_seal;
use crate::types::{Algorithm, SigilError, SigningKey};
use subtle::ConstantTimeEq;

// =============================================================================
// KEY PROVIDER
// =============================================================================

/// Verification-time key lookup.
///
/// The verifier asks its provider for key material exactly once per token,
/// passing the header's `kid` when present. A provider that returns `None`
/// rejects the token without any seal computation.
pub trait KeyProvider: Send + Sync {
    /// Resolve the key for a token, or `None` if no key applies.
    fn provide(&self, kid: Option<&str>) -> Option<SigningKey>;
}

/// A provider holding a single key, handed out regardless of `kid`.
#[derive(Debug, Clone)]
pub struct SingleKey {
    key: SigningKey,
}

impl SingleKey {
    /// Wrap one key.
    #[must_use]
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }
}

impl KeyProvider for SingleKey {
    fn provide(&self, _kid: Option<&str>) -> Option<SigningKey> {
        Some(self.key.clone())
    }
}

// =============================================================================
// TOKEN DATA
// =============================================================================

/// The authenticated content of a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenData {
    /// The decoded header.
    pub header: Header,
    /// The decoded claim set.
    pub claims: Claims,
}

// =============================================================================
// VERIFIER
// =============================================================================

/// A configured token verifier.
#[derive(Debug, Clone)]
pub struct Verifier {
    algorithm: Algorithm,
    required_issuer: Option<String>,
    required_audience: Option<String>,
    leeway_secs: i64,
}

impl Verifier {
    /// Create a verifier that accepts only the given algorithm.
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            required_issuer: None,
            required_audience: None,
            leeway_secs: 0,
        }
    }

    /// Require the `iss` claim to equal this issuer.
    #[must_use]
    pub fn require_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.required_issuer = Some(issuer.into());
        self
    }

    /// Require the `aud` claim to include this audience.
    #[must_use]
    pub fn require_audience(mut self, audience: impl Into<String>) -> Self {
        self.required_audience = Some(audience.into());
        self
    }

    /// Tolerate this much clock skew when checking `exp` and `nbf`.
    #[must_use]
    pub fn with_leeway_secs(mut self, leeway_secs: i64) -> Self {
        self.leeway_secs = leeway_secs.max(0);
        self
    }

    /// Verify a token against a single key.
    pub fn verify(
        &self,
        token: &str,
        key: &SigningKey,
        clock: &dyn Clock,
    ) -> Result<TokenData, SigilError> {
        self.verify_with_provider(token, &SingleKey::new(key.clone()), clock)
    }

    /// Verify a token, resolving the key through a provider.
    pub fn verify_with_provider(
        &self,
        token: &str,
        provider: &dyn KeyProvider,
        clock: &dyn Clock,
    ) -> Result<TokenData, SigilError> {
        // Stage 1: structure.
        let (header_segment, payload_segment, seal_segment) = split_compact(token)?;

        // Stage 2: header.
        let header = Header::decode(header_segment)?;

        // Stage 3: algorithm pinning. The verifier decides the algorithm;
        // the token only gets to agree.
        if header.alg != self.algorithm {
            return Err(SigilError::AlgorithmMismatch {
                expected: self.algorithm,
                found: header.alg,
            });
        }

        // Stage 4: seal.
        let key = provider
            .provide(header.kid.as_deref())
            .ok_or_else(|| SigilError::KeyUnavailable {
                kid: header.kid.clone(),
            })?;

        let presented = decode_segment(seal_segment)?;
        if presented.len() != header.alg.seal_len() {
            return Err(SigilError::InvalidSignature);
        }

        let input = signing_input(header_segment, payload_segment);
        let computed = compute_seal(header.alg, &key, input.as_bytes())?;

        let seal_matches: bool = computed.as_slice().ct_eq(presented.as_slice()).into();
        if !seal_matches {
            return Err(SigilError::InvalidSignature);
        }

        // The seal holds; only now is the payload worth decoding.
        let claims = Claims::decode(payload_segment)?;

        // Stage 5: temporal claims. One clock read covers both checks.
        let now = clock.now();

        if let Some(exp) = claims.exp {
            // Still valid at exactly exp + leeway; rejected strictly after.
            if now > exp.saturating_add_secs(self.leeway_secs) {
                return Err(SigilError::Expired {
                    expired_at: exp,
                    now,
                });
            }
        }
        if let Some(nbf) = claims.nbf {
            if now.saturating_add_secs(self.leeway_secs) < nbf {
                return Err(SigilError::NotYetValid {
                    not_before: nbf,
                    now,
                });
            }
        }

        // Stage 6: issuer, then audience.
        if let Some(required) = &self.required_issuer {
            if claims.iss.as_deref() != Some(required.as_str()) {
                return Err(SigilError::IssuerMismatch {
                    required: required.clone(),
                });
            }
        }
        if let Some(required) = &self.required_audience {
            let audience_ok = claims
                .aud
                .as_ref()
                .is_some_and(|aud| aud.contains(required));
            if !audience_ok {
                return Err(SigilError::AudienceMismatch {
                    required: required.clone(),
                });
            }
        }

        Ok(TokenData { header, claims })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::sign::sign;
    use crate::types::UnixTime;

    fn test_key() -> SigningKey {
        SigningKey::from_bytes(b"0123456789abcdef0123456789abcdef".to_vec()).expect("key")
    }

    fn sealed(claims: Claims) -> String {
        sign(&Header::new(Algorithm::Hs256), &claims, &test_key()).expect("sign")
    }

    #[test]
    fn valid_token_verifies() {
        let token = sealed(Claims::new().with_subject("alice"));
        let clock = FixedClock::at(UnixTime::from_secs(1000));

        let data = Verifier::new(Algorithm::Hs256)
            .verify(&token, &test_key(), &clock)
            .expect("verify");
        assert_eq!(data.claims.sub.as_deref(), Some("alice"));
        assert_eq!(data.header.alg, Algorithm::Hs256);
    }

    #[test]
    fn wrong_key_is_rejected() {
        let token = sealed(Claims::new().with_subject("alice"));
        let wrong = SigningKey::from_bytes(b"a-completely-different-secret".to_vec()).expect("key");
        let clock = FixedClock::at(UnixTime::from_secs(1000));

        let err = Verifier::new(Algorithm::Hs256)
            .verify(&token, &wrong, &clock)
            .expect_err("must reject");
        assert!(matches!(err, SigilError::InvalidSignature));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = sealed(Claims::new().with_subject("alice"));
        let (header, _, seal) = split_compact(&token).expect("split");

        // Re-encode a different payload without re-sealing.
        let forged_claims = Claims::new().with_subject("mallory");
        let forged_payload = forged_claims.encode().expect("encode");
        let forged = crate::segments::join_compact(header, &forged_payload, seal);

        let clock = FixedClock::at(UnixTime::from_secs(1000));
        let err = Verifier::new(Algorithm::Hs256)
            .verify(&forged, &test_key(), &clock)
            .expect_err("must reject");
        assert!(matches!(err, SigilError::InvalidSignature));
    }

    #[test]
    fn algorithm_mismatch_is_rejected_before_seal_check() {
        let token = sign(
            &Header::new(Algorithm::Hs512),
            &Claims::new(),
            &test_key(),
        )
        .expect("sign");
        let clock = FixedClock::at(UnixTime::from_secs(1000));

        let err = Verifier::new(Algorithm::Hs256)
            .verify(&token, &test_key(), &clock)
            .expect_err("must reject");
        assert!(matches!(
            err,
            SigilError::AlgorithmMismatch {
                expected: Algorithm::Hs256,
                found: Algorithm::Hs512,
            }
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = sealed(Claims::new().with_expiry(UnixTime::from_secs(1000)));
        let clock = FixedClock::at(UnixTime::from_secs(1001));

        let err = Verifier::new(Algorithm::Hs256)
            .verify(&token, &test_key(), &clock)
            .expect_err("must reject");
        assert!(matches!(err, SigilError::Expired { .. }));
    }

    #[test]
    fn expiry_leeway_boundary() {
        let token = sealed(Claims::new().with_expiry(UnixTime::from_secs(1000)));
        let verifier = Verifier::new(Algorithm::Hs256).with_leeway_secs(30);

        // Valid at exactly exp + leeway.
        let at_boundary = FixedClock::at(UnixTime::from_secs(1030));
        assert!(verifier.verify(&token, &test_key(), &at_boundary).is_ok());

        // Rejected one second later.
        let past_boundary = FixedClock::at(UnixTime::from_secs(1031));
        assert!(matches!(
            verifier.verify(&token, &test_key(), &past_boundary),
            Err(SigilError::Expired { .. })
        ));
    }

    #[test]
    fn not_yet_valid_token_is_rejected() {
        let token = sealed(Claims::new().with_not_before(UnixTime::from_secs(2000)));
        let clock = FixedClock::at(UnixTime::from_secs(1000));

        let err = Verifier::new(Algorithm::Hs256)
            .verify(&token, &test_key(), &clock)
            .expect_err("must reject");
        assert!(matches!(err, SigilError::NotYetValid { .. }));
    }

    #[test]
    fn not_before_leeway_boundary() {
        let token = sealed(Claims::new().with_not_before(UnixTime::from_secs(2000)));
        let verifier = Verifier::new(Algorithm::Hs256).with_leeway_secs(30);

        // Valid once now + leeway reaches nbf.
        let at_boundary = FixedClock::at(UnixTime::from_secs(1970));
        assert!(verifier.verify(&token, &test_key(), &at_boundary).is_ok());

        let before_boundary = FixedClock::at(UnixTime::from_secs(1969));
        assert!(matches!(
            verifier.verify(&token, &test_key(), &before_boundary),
            Err(SigilError::NotYetValid { .. })
        ));
    }

    #[test]
    fn required_issuer_enforced() {
        let verifier = Verifier::new(Algorithm::Hs256).require_issuer("sigil");
        let clock = FixedClock::at(UnixTime::from_secs(1000));

        let good = sealed(Claims::new().with_issuer("sigil"));
        assert!(verifier.verify(&good, &test_key(), &clock).is_ok());

        let bad = sealed(Claims::new().with_issuer("impostor"));
        assert!(matches!(
            verifier.verify(&bad, &test_key(), &clock),
            Err(SigilError::IssuerMismatch { .. })
        ));

        let absent = sealed(Claims::new());
        assert!(matches!(
            verifier.verify(&absent, &test_key(), &clock),
            Err(SigilError::IssuerMismatch { .. })
        ));
    }

    #[test]
    fn required_audience_enforced_for_both_shapes() {
        let verifier = Verifier::new(Algorithm::Hs256).require_audience("api");
        let clock = FixedClock::at(UnixTime::from_secs(1000));

        let single = sealed(Claims::new().with_audience("api"));
        assert!(verifier.verify(&single, &test_key(), &clock).is_ok());

        let mut listed = Claims::new();
        listed.aud = Some(crate::claims::Audience::Many(vec![
            "web".to_string(),
            "api".to_string(),
        ]));
        let listed = sealed(listed);
        assert!(verifier.verify(&listed, &test_key(), &clock).is_ok());

        let other = sealed(Claims::new().with_audience("web"));
        assert!(matches!(
            verifier.verify(&other, &test_key(), &clock),
            Err(SigilError::AudienceMismatch { .. })
        ));
    }

    #[test]
    fn provider_returning_none_rejects_without_seal_check() {
        struct NoKeys;
        impl KeyProvider for NoKeys {
            fn provide(&self, _kid: Option<&str>) -> Option<SigningKey> {
                None
            }
        }

        let token = sealed(Claims::new());
        let clock = FixedClock::at(UnixTime::from_secs(1000));
        let err = Verifier::new(Algorithm::Hs256)
            .verify_with_provider(&token, &NoKeys, &clock)
            .expect_err("must reject");
        assert!(matches!(err, SigilError::KeyUnavailable { .. }));
    }

    #[test]
    fn truncated_seal_is_rejected() {
        let token = sealed(Claims::new());
        let (header, payload, seal) = split_compact(&token).expect("split");
        let truncated = crate::segments::join_compact(header, payload, &seal[..seal.len() - 4]);

        let clock = FixedClock::at(UnixTime::from_secs(1000));
        let err = Verifier::new(Algorithm::Hs256)
            .verify(&truncated, &test_key(), &clock)
            .expect_err("must reject");
        // Either the Base64 becomes non-canonical or the length check fires.
        assert!(matches!(
            err,
            SigilError::InvalidSignature | SigilError::InvalidBase64(_)
        ));
    }
}
