//! # Sigil HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `POST /sign` - Seal a claim set into a compact token
//! - `POST /verify` - Verify a token and return its claims
//! - `POST /inspect` - Decode a token WITHOUT verifying its seal
//! - `GET /health` - Health check
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `SIGIL_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `SIGIL_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `SIGIL_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use auth::get_api_key_from_env;
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
// Re-export handlers and types for integration tests (via `sigil::api::*`)
#[allow(unused_imports)]
pub use handlers::{health_handler, inspect_handler, sign_handler, verify_handler};
#[allow(unused_imports)]
pub use types::{
    HealthResponse, InspectRequest, InspectResponse, SignRequest, SignResponse, VerifyRequest,
    VerifyResponse,
};

use crate::config::SigilConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use sigil_core::{Claims, SigilError, Signer, SigningKey, SystemClock, TokenData, Verifier};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// TOKEN SERVICE
// =============================================================================

/// The signing and verification facilities behind the HTTP endpoints.
///
/// Immutable once built: one key, one algorithm, one policy. Handlers share
/// it read-only, so no locking is involved.
pub struct TokenService {
    signer: Signer,
    verifier: Verifier,
    key: SigningKey,
    clock: SystemClock,
}

impl TokenService {
    /// Build the service from application configuration.
    pub fn from_config(config: &SigilConfig) -> Result<Self, SigilError> {
        Ok(Self::new(
            config.build_signer()?,
            config.build_verifier()?,
            config.resolve_key()?,
        ))
    }

    /// Build the service from explicit parts.
    #[must_use]
    pub fn new(signer: Signer, verifier: Verifier, key: SigningKey) -> Self {
        Self {
            signer,
            verifier,
            key,
            clock: SystemClock,
        }
    }

    /// Seal a claim set, optionally overriding the configured TTL.
    pub fn sign(&self, claims: Claims, ttl_secs: Option<i64>) -> Result<String, SigilError> {
        match ttl_secs {
            Some(ttl) => self.signer.clone().with_ttl_secs(ttl).issue(claims, &self.clock),
            None => self.signer.issue(claims, &self.clock),
        }
    }

    /// Verify a token against the service key and policy.
    pub fn verify(&self, token: &str) -> Result<TokenData, SigilError> {
        self.verifier.verify(token, &self.key, &self.clock)
    }
}

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the token service.
#[derive(Clone)]
pub struct AppState {
    /// The signing/verification service.
    pub service: Arc<TokenService>,
}

impl AppState {
    /// Create new app state from a token service.
    #[must_use]
    pub fn new(service: TokenService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `SIGIL_CORS_ORIGINS` environment variable:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
///
/// # Security Note
///
/// The default is restrictive (localhost only). Set `SIGIL_CORS_ORIGINS=*`
/// explicitly only for development or if you understand the security implications.
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("SIGIL_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            // Explicit wildcard - warn about security implications
            tracing::warn!(
                "CORS: Allowing ALL origins (SIGIL_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            // Parse comma-separated origins
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in SIGIL_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            // No configuration - default to localhost only (restrictive)
            tracing::info!("CORS: No SIGIL_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Rate Limiting - protects against request floods (if enabled)
/// 4. Authentication - validates API key (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    // Check if rate limiting is enabled
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    // Check if authentication is enabled
    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "⚠️  API key authentication DISABLED - all endpoints are publicly accessible! \
             Set SIGIL_API_KEY environment variable to enable authentication."
        );
    }

    // Build base router with routes
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/sign", post(handlers::sign_handler))
        .route("/verify", post(handlers::verify_handler))
        .route("/inspect", post(handlers::inspect_handler));

    // Apply authentication middleware (innermost - runs last on request)
    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply CORS, body limit, and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, service: TokenService) -> Result<(), SigilError> {
    let state = AppState::new(service);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| SigilError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Sigil HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| SigilError::Io(format!("Server error: {}", e)))
}
