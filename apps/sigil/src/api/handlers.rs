//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        HealthResponse, InspectRequest, InspectResponse, SignRequest, SignResponse,
        VerifyRequest, VerifyResponse,
    },
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use base64::Engine;
use sigil_core::{Claims, inspect};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// SIGN HANDLER
// =============================================================================

/// Seal a claim set into a compact token.
pub async fn sign_handler(
    State(state): State<AppState>,
    Json(request): Json<SignRequest>,
) -> impl IntoResponse {
    let claims: Claims =
        match serde_json::from_value(serde_json::Value::Object(request.claims)) {
            Ok(c) => c,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(SignResponse::error(format!("Invalid claims: {}", e))),
                );
            }
        };

    match state.service.sign(claims, request.ttl_secs) {
        Ok(token) => (StatusCode::OK, Json(SignResponse::success(token))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SignResponse::error(format!("Signing failed: {}", e))),
        ),
    }
}

// =============================================================================
// VERIFY HANDLER
// =============================================================================

/// Verify a token.
///
/// A rejected token is a 200 with `valid: false`: rejection is the
/// endpoint doing its job, not a server error.
pub async fn verify_handler(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> impl IntoResponse {
    match state.service.verify(&request.token) {
        Ok(data) => match serde_json::to_value(&data.claims) {
            Ok(claims) => (StatusCode::OK, Json(VerifyResponse::valid(claims))),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(VerifyResponse::invalid(format!("Encoding failed: {}", e))),
            ),
        },
        Err(e) => {
            tracing::info!(event = "token_rejected", reason = %e, "Token rejected");
            (StatusCode::OK, Json(VerifyResponse::invalid(e.to_string())))
        }
    }
}

// =============================================================================
// INSPECT HANDLER
// =============================================================================

/// Decode a token without verifying its seal.
pub async fn inspect_handler(Json(request): Json<InspectRequest>) -> impl IntoResponse {
    match inspect(&request.token) {
        Ok(inspection) => {
            let header = serde_json::to_value(&inspection.header);
            let claims = serde_json::to_value(&inspection.claims);
            match (header, claims) {
                (Ok(header), Ok(claims)) => {
                    let seal_b64 =
                        base64::engine::general_purpose::STANDARD.encode(&inspection.seal);
                    (
                        StatusCode::OK,
                        Json(InspectResponse::success(header, claims, seal_b64)),
                    )
                }
                (Err(e), _) | (_, Err(e)) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(InspectResponse::error(format!("Encoding failed: {}", e))),
                ),
            }
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(InspectResponse::error(format!("Inspect failed: {}", e))),
        ),
    }
}
