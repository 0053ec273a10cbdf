//! # Inspection
//!
//! Decoding without verification. A compact token is integrity-protected,
//! not confidential: anyone holding one can read the header and claims
//! without the key. This module makes that operation explicit and keeps it
//! away from the verification path, so unverified data can never be
//! mistaken for authenticated data.

use crate::claims::Claims;
use crate::header::Header;
use crate::segments::{decode_segment, split_compact};
use crate::types::SigilError;

// =============================================================================
// INSPECTION
// =============================================================================

/// The decoded-but-unverified content of a token.
///
/// Nothing in here has been authenticated. The seal bytes are returned as
/// raw data; whether they match the content is unknown until `Verifier`
/// says so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    /// The decoded header. UNVERIFIED.
    pub header: Header,
    /// The decoded claim set. UNVERIFIED.
    pub claims: Claims,
    /// The raw seal bytes, decoded from the third segment.
    pub seal: Vec<u8>,
}

/// Decode a token without checking its seal.
///
/// Requires no key material. Structural problems (wrong arity, bad Base64,
/// bad JSON, forbidden algorithm) are still rejected; a wrong-but-well-formed
/// seal is not.
pub fn inspect(token: &str) -> Result<Inspection, SigilError> {
    let (header_segment, payload_segment, seal_segment) = split_compact(token)?;

    let header = Header::decode(header_segment)?;
    let claims = Claims::decode(payload_segment)?;
    let seal = decode_segment(seal_segment)?;

    Ok(Inspection {
        header,
        claims,
        seal,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::{encode_segment, join_compact};
    use crate::sign::sign;
    use crate::types::{Algorithm, SigningKey};

    #[test]
    fn inspect_reads_claims_without_the_key() {
        let key = SigningKey::from_bytes(b"only-the-issuer-knows-this".to_vec()).expect("key");
        let claims = Claims::new().with_subject("alice");
        let token = sign(&Header::new(Algorithm::Hs256), &claims, &key).expect("sign");

        // No key in sight.
        let inspection = inspect(&token).expect("inspect");
        assert_eq!(inspection.claims.sub.as_deref(), Some("alice"));
        assert_eq!(inspection.header.alg, Algorithm::Hs256);
        assert_eq!(inspection.seal.len(), Algorithm::Hs256.seal_len());
    }

    #[test]
    fn inspect_succeeds_on_garbage_seal() {
        let key = SigningKey::from_bytes(b"key".to_vec()).expect("key");
        let token = sign(&Header::new(Algorithm::Hs256), &Claims::new(), &key).expect("sign");
        let (header, payload, _) = crate::segments::split_compact(&token).expect("split");

        // Well-formed Base64, definitely not the right seal.
        let garbage = encode_segment(&[0xAA; 32]);
        let forged = join_compact(header, payload, &garbage);

        let inspection = inspect(&forged).expect("inspect");
        assert_eq!(inspection.seal, vec![0xAA; 32]);
    }

    #[test]
    fn inspect_still_rejects_structural_damage() {
        assert!(matches!(inspect("not-a-token"), Err(SigilError::Malformed)));
        assert!(inspect("a.b").is_err());
    }

    #[test]
    fn inspect_still_rejects_none_algorithm() {
        let header = encode_segment(br#"{"alg":"none"}"#);
        let payload = encode_segment(br#"{"sub":"mallory"}"#);
        let token = join_compact(&header, &payload, &encode_segment(b"x"));

        let err = inspect(&token).expect_err("must reject");
        assert!(matches!(err, SigilError::AlgorithmForbidden));
    }
}
