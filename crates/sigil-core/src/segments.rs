//! # Compact Segment Encoding
//!
//! The compact form of a token is three Base64URL segments joined by dots:
//!
//! ```text
//! <header> . <payload> . <seal>
//! ```
//!
//! The segments are a fixed-arity grouping: splitting always yields exactly
//! a `(header, payload, seal)` tuple, and anything with a different arity is
//! rejected before any decoding happens.
//!
//! ## Encoding Rules
//!
//! - URL-safe alphabet (`-` and `_` instead of `+` and `/`)
//! - No padding; a trailing `=` is a decode error
//! - Non-canonical trailing bits are a decode error

use crate::types::SigilError;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

// =============================================================================
// SEGMENT CODEC
// =============================================================================

/// Encode raw bytes as an unpadded URL-safe Base64 segment.
#[must_use]
pub fn encode_segment(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode an unpadded URL-safe Base64 segment.
///
/// Rejects padding characters and anything outside the URL-safe alphabet.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, SigilError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| SigilError::InvalidBase64(e.to_string()))
}

// =============================================================================
// COMPACT FORM
// =============================================================================

/// Split a compact token into its `(header, payload, seal)` tuple.
///
/// The compact form has a fixed arity of three. A token with any other
/// number of segments, or with an empty segment, is `Malformed`; there is
/// no partial deconstruction.
pub fn split_compact(token: &str) -> Result<(&str, &str, &str), SigilError> {
    let mut parts = token.split('.');

    let (Some(header), Some(payload), Some(seal), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(SigilError::Malformed);
    };

    if header.is_empty() || payload.is_empty() || seal.is_empty() {
        return Err(SigilError::Malformed);
    }

    Ok((header, payload, seal))
}

/// Join three encoded segments into the compact form.
#[must_use]
pub fn join_compact(header: &str, payload: &str, seal: &str) -> String {
    let mut compact = String::with_capacity(header.len() + payload.len() + seal.len() + 2);
    compact.push_str(header);
    compact.push('.');
    compact.push_str(payload);
    compact.push('.');
    compact.push_str(seal);
    compact
}

/// The signing input for a token: everything before the final dot.
///
/// The seal is computed over the already-encoded `header.payload` bytes,
/// not over the decoded JSON.
#[must_use]
pub fn signing_input(header: &str, payload: &str) -> String {
    let mut input = String::with_capacity(header.len() + payload.len() + 1);
    input.push_str(header);
    input.push('.');
    input.push_str(payload);
    input
}

// =============================================================================
// TESTS
// =============================================================================
