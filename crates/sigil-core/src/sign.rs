//! # Sealing
//!
//! Produces the compact form: encode the header and claims as Base64URL
//! segments, MAC the `header.payload` signing input with the header's
//! HMAC-SHA2 algorithm, and append the encoded seal.

use crate::claims::Claims;
use crate::clock::Clock;
use crate::header::Header;
use crate::segments::{encode_segment, join_compact, signing_input};
use crate::types::{Algorithm, SigilError, SigningKey};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

// =============================================================================
// MAC COMPUTATION
// =============================================================================

/// Compute the seal bytes for a signing input under the given algorithm.
///
/// HMAC accepts any key length, so the only failure path is the backend
/// itself; it is still propagated rather than assumed away.
pub(crate) fn compute_seal(
    alg: Algorithm,
    key: &SigningKey,
    input: &[u8],
) -> Result<Vec<u8>, SigilError> {
    match alg {
        Algorithm::Hs256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key.as_bytes())
                .map_err(|_| SigilError::Crypto)?;
            mac.update(input);
            Ok(mac.finalize().into_bytes().to_vec())
        }
        Algorithm::Hs384 => {
            let mut mac = Hmac::<Sha384>::new_from_slice(key.as_bytes())
                .map_err(|_| SigilError::Crypto)?;
            mac.update(input);
            Ok(mac.finalize().into_bytes().to_vec())
        }
        Algorithm::Hs512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key.as_bytes())
                .map_err(|_| SigilError::Crypto)?;
            mac.update(input);
            Ok(mac.finalize().into_bytes().to_vec())
        }
    }
}

// =============================================================================
// SIGN
// =============================================================================

/// Seal a header and claim set into the compact form.
///
/// Deterministic: the same header, claims, and key always produce the
/// identical token string.
pub fn sign(header: &Header, claims: &Claims, key: &SigningKey) -> Result<String, SigilError> {
    let header_segment = header.encode()?;
    let payload_segment = claims.encode()?;

    let input = signing_input(&header_segment, &payload_segment);
    let seal = compute_seal(header.alg, key, input.as_bytes())?;

    Ok(join_compact(
        &header_segment,
        &payload_segment,
        &encode_segment(&seal),
    ))
}

// =============================================================================
// SIGNER
// =============================================================================

/// A configured token issuer.
///
/// Binds an algorithm and key, with an optional standing issuer name and
/// time-to-live. `issue` stamps `iat` (and `exp`, when a TTL is set) from
/// the supplied clock, leaving claims the caller already set untouched.
#[derive(Debug, Clone)]
pub struct Signer {
    algorithm: Algorithm,
    key: SigningKey,
    issuer: Option<String>,
    ttl_secs: Option<i64>,
    kid: Option<String>,
}

impl Signer {
    /// Create a signer for the given algorithm and key.
    #[must_use]
    pub fn new(algorithm: Algorithm, key: SigningKey) -> Self {
        Self {
            algorithm,
            key,
            issuer: None,
            ttl_secs: None,
            kid: None,
        }
    }

    /// Stamp every issued token with this issuer, unless the claims already
    /// carry one.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Give issued tokens this lifetime, unless the claims already carry an
    /// expiry.
    #[must_use]
    pub fn with_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = Some(ttl_secs);
        self
    }

    /// Mark issued tokens with a key identifier.
    #[must_use]
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// The algorithm this signer seals with.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Issue a token: stamp temporal claims from the clock, then seal.
    pub fn issue(&self, mut claims: Claims, clock: &dyn Clock) -> Result<String, SigilError> {
        let now = clock.now();

        if claims.iat.is_none() {
            claims.iat = Some(now);
        }
        if claims.exp.is_none() {
            if let Some(ttl) = self.ttl_secs {
                claims.exp = Some(now.saturating_add_secs(ttl));
            }
        }
        if claims.iss.is_none() {
            claims.iss = self.issuer.clone();
        }

        let mut header = Header::new(self.algorithm);
        if let Some(kid) = &self.kid {
            header = header.with_kid(kid.clone());
        }

        sign(&header, &claims, &self.key)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::types::UnixTime;

    fn test_key() -> SigningKey {
        SigningKey::from_bytes(b"0123456789abcdef0123456789abcdef".to_vec()).expect("key")
    }

    #[test]
    fn sign_is_deterministic() {
        let header = Header::new(Algorithm::Hs256);
        let claims = Claims::new().with_subject("alice");
        let key = test_key();

        let token1 = sign(&header, &claims, &key).expect("sign");
        let token2 = sign(&header, &claims, &key).expect("sign");
        assert_eq!(token1, token2);
    }

    #[test]
    fn sign_starts_with_canonical_hs256_header() {
        let header = Header::new(Algorithm::Hs256);
        let claims = Claims::new().with_subject("alice");
        let token = sign(&header, &claims, &test_key()).expect("sign");

        assert!(token.starts_with("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9."));
    }

    #[test]
    fn seal_length_matches_algorithm() {
        for alg in [Algorithm::Hs256, Algorithm::Hs384, Algorithm::Hs512] {
            let seal = compute_seal(alg, &test_key(), b"input").expect("seal");
            assert_eq!(seal.len(), alg.seal_len());
        }
    }

    #[test]
    fn different_keys_produce_different_seals() {
        let other = SigningKey::from_bytes(b"another-key-entirely".to_vec()).expect("key");
        let a = compute_seal(Algorithm::Hs256, &test_key(), b"input").expect("seal");
        let b = compute_seal(Algorithm::Hs256, &other, b"input").expect("seal");
        assert_ne!(a, b);
    }

    #[test]
    fn issue_stamps_iat_exp_and_issuer() {
        let signer = Signer::new(Algorithm::Hs256, test_key())
            .with_issuer("sigil")
            .with_ttl_secs(600);
        let clock = FixedClock::at(UnixTime::from_secs(1_000_000));

        let token = signer.issue(Claims::new().with_subject("bob"), &clock).expect("issue");

        let (_, payload, _) = crate::segments::split_compact(&token).expect("split");
        let claims = Claims::decode(payload).expect("decode");
        assert_eq!(claims.iat, Some(UnixTime::from_secs(1_000_000)));
        assert_eq!(claims.exp, Some(UnixTime::from_secs(1_000_600)));
        assert_eq!(claims.iss.as_deref(), Some("sigil"));
        assert_eq!(claims.sub.as_deref(), Some("bob"));
    }

    #[test]
    fn issue_never_overrides_caller_claims() {
        let signer = Signer::new(Algorithm::Hs256, test_key())
            .with_issuer("sigil")
            .with_ttl_secs(600);
        let clock = FixedClock::at(UnixTime::from_secs(1_000_000));

        let claims = Claims::new()
            .with_issuer("upstream")
            .with_expiry(UnixTime::from_secs(999));
        let token = signer.issue(claims, &clock).expect("issue");

        let (_, payload, _) = crate::segments::split_compact(&token).expect("split");
        let decoded = Claims::decode(payload).expect("decode");
        assert_eq!(decoded.iss.as_deref(), Some("upstream"));
        assert_eq!(decoded.exp, Some(UnixTime::from_secs(999)));
    }

    #[test]
    fn issue_with_kid_marks_header() {
        let signer = Signer::new(Algorithm::Hs256, test_key()).with_kid("k-2026-08");
        let clock = FixedClock::at(UnixTime::from_secs(1_000_000));

        let token = signer.issue(Claims::new(), &clock).expect("issue");
        let (header_segment, _, _) = crate::segments::split_compact(&token).expect("split");
        let header = Header::decode(header_segment).expect("decode");
        assert_eq!(header.kid.as_deref(), Some("k-2026-08"));
    }
}
