//! # Authentication Module
//!
//! Static API key authentication for the Sigil HTTP API.
//!
//! This guards the *service* (who may call the endpoints); it is separate
//! from the tokens the service signs and verifies.
//!
//! ## Configuration
//!
//! Authentication is configured via environment variable:
//! - `SIGIL_API_KEY`: If set, all requests (except /health) require this key
//!
//! ## Usage
//!
//! Send the API key in the Authorization header:
//! ```text
//! Authorization: Bearer <your-api-key>
//! ```

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

// =============================================================================
// API KEY AUTHENTICATION
// =============================================================================

/// Get API key from environment variable.
///
/// Returns `Some(key)` if `SIGIL_API_KEY` is set and non-empty,
/// `None` otherwise (disabling authentication).
pub fn get_api_key_from_env() -> Option<String> {
    std::env::var("SIGIL_API_KEY").ok().filter(|k| !k.is_empty())
}

/// Compare two byte strings in constant time.
///
/// Both sides are padded to a common length before comparison so the
/// running time depends on neither the content nor the length of the
/// provided key.
fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    let max_len = provided.len().max(expected.len());
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided.len()].copy_from_slice(provided);
    padded_expected[..expected.len()].copy_from_slice(expected);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided.len() == expected.len()
}

/// API key authentication middleware.
///
/// If `SIGIL_API_KEY` is set:
/// - `/health` endpoint is always allowed (for load balancer health checks)
/// - All other endpoints require `Authorization: Bearer <key>` header
///
/// If `SIGIL_API_KEY` is not set, all requests are allowed.
pub async fn api_key_auth_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    // If no API key configured, allow all requests
    let Some(expected) = get_api_key_from_env() else {
        return Ok(next.run(request).await);
    };

    // Always allow health endpoint (for load balancer checks)
    if request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    }

    // Extract API key from Authorization header
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(header_value) = auth_header else {
        tracing::warn!(
            event = "auth_failure",
            reason = "missing_authorization_header",
            "Missing Authorization header"
        );
        return Err((StatusCode::UNAUTHORIZED, "Unauthorized"));
    };

    // Support both "Bearer <key>" and raw "<key>" formats
    let provided = header_value.strip_prefix("Bearer ").unwrap_or(header_value);

    if keys_match(provided.as_bytes(), expected.as_bytes()) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(
            event = "auth_failure",
            reason = "invalid_api_key",
            "Authentication failed: invalid API key"
        );
        Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_api_key_empty_returns_none() {
        // Clear the env var if set
        // SAFETY: This is a unit test running in isolation.
        unsafe { std::env::remove_var("SIGIL_API_KEY") };
        assert!(get_api_key_from_env().is_none());
    }

    #[test]
    fn keys_match_accepts_equal() {
        assert!(keys_match(b"secret-key", b"secret-key"));
    }

    #[test]
    fn keys_match_rejects_different_and_prefix() {
        assert!(!keys_match(b"secret-key", b"secret-kez"));
        assert!(!keys_match(b"secret", b"secret-key"));
        assert!(!keys_match(b"", b"secret-key"));
    }
}
