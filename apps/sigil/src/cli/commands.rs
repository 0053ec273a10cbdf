//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::SigilConfig;
use base64::Engine;
use sigil_core::{Claims, SigilError, SystemClock, UnixTime, inspect};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for a claims document (1 MiB).
///
/// Claim sets are small JSON documents; anything larger is a mistake.
const MAX_CLAIMS_FILE_SIZE: u64 = 1024 * 1024;

/// Maximum file size for a token (64 KiB).
///
/// A compact token is a few hundred bytes; 64 KiB leaves generous room.
const MAX_TOKEN_FILE_SIZE: u64 = 64 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), SigilError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| SigilError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(SigilError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path (resolving symlinks and "..") and ensures it is
/// a regular file, so a path like "../../../etc/passwd" is resolved and
/// visible for what it is before anything is read.
fn validate_input_path(path: &Path) -> Result<PathBuf, SigilError> {
    let canonical = path
        .canonicalize()
        .map_err(|e| SigilError::Io(format!("Invalid file path '{}': {}", path.display(), e)))?;

    if !canonical.is_file() {
        return Err(SigilError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Read an input document from a file, stdin ("-"), or an inline value.
fn read_input(file: &Path, max_size: u64) -> Result<String, SigilError> {
    if file == Path::new("-") {
        return std::io::read_to_string(std::io::stdin())
            .map_err(|e| SigilError::Io(format!("Cannot read stdin: {}", e)));
    }

    let canonical = validate_input_path(file)?;
    validate_file_size(&canonical, max_size)?;
    std::fs::read_to_string(&canonical)
        .map_err(|e| SigilError::Io(format!("Cannot read '{}': {}", file.display(), e)))
}

/// Resolve a token from a positional argument or a file.
fn read_token(token: Option<String>, file: Option<PathBuf>) -> Result<String, SigilError> {
    match (token, file) {
        (Some(t), _) => Ok(t),
        (None, Some(path)) => Ok(read_input(&path, MAX_TOKEN_FILE_SIZE)?.trim().to_string()),
        (None, None) => Err(SigilError::Config(
            "Provide a token argument or --file".to_string(),
        )),
    }
}

/// Render a temporal claim as RFC 3339 for human output.
fn humanize(t: UnixTime) -> String {
    chrono::DateTime::from_timestamp(t.as_secs(), 0)
        .map_or_else(|| "<out of range>".to_string(), |dt| dt.to_rfc3339())
}

// =============================================================================
// SIGN COMMAND
// =============================================================================

/// Seal a claim set into a compact token.
pub fn cmd_sign(
    config_path: &Path,
    json_mode: bool,
    claims: Option<String>,
    file: Option<PathBuf>,
    subject: Option<String>,
    ttl: Option<i64>,
) -> Result<(), SigilError> {
    let config = SigilConfig::load(config_path)?;

    let raw = match (claims, file) {
        (Some(inline), _) => inline,
        (None, Some(path)) => read_input(&path, MAX_CLAIMS_FILE_SIZE)?,
        (None, None) => "{}".to_string(),
    };

    let mut claims: Claims =
        serde_json::from_str(&raw).map_err(|e| SigilError::InvalidJson(e.to_string()))?;
    if let Some(sub) = subject {
        claims.sub = Some(sub);
    }

    let mut signer = config.build_signer()?;
    if let Some(ttl) = ttl {
        signer = signer.with_ttl_secs(ttl);
    }

    let token = signer.issue(claims, &SystemClock)?;

    if json_mode {
        println!("{}", serde_json::json!({ "token": token }));
    } else {
        println!("{}", token);
    }
    Ok(())
}

// =============================================================================
// VERIFY COMMAND
// =============================================================================

/// Verify a token and print its claims.
///
/// A rejected token is reported with its precise reason and the process
/// exits non-zero.
pub fn cmd_verify(
    config_path: &Path,
    json_mode: bool,
    token: Option<String>,
    file: Option<PathBuf>,
) -> Result<(), SigilError> {
    let config = SigilConfig::load(config_path)?;
    let token = read_token(token, file)?;

    let verifier = config.build_verifier()?;
    let key = config.resolve_key()?;

    match verifier.verify(&token, &key, &SystemClock) {
        Ok(data) => {
            if json_mode {
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": true,
                        "algorithm": data.header.alg.name(),
                        "claims": data.claims,
                    })
                );
            } else {
                println!("Token is valid ({})", data.header.alg);
                println!();
                for (name, value) in data.claims.iter() {
                    println!("  {:>4}: {}", name, value);
                }
            }
            Ok(())
        }
        Err(e) => {
            if json_mode {
                println!(
                    "{}",
                    serde_json::json!({ "valid": false, "reason": e.to_string() })
                );
            } else {
                println!("Token is INVALID: {}", e);
            }
            Err(e)
        }
    }
}

// =============================================================================
// INSPECT COMMAND
// =============================================================================

/// Decode a token WITHOUT verifying its seal.
///
/// Needs no configuration and no key: the payload of a compact token is
/// readable by anyone holding it.
pub fn cmd_inspect(
    json_mode: bool,
    token: Option<String>,
    file: Option<PathBuf>,
) -> Result<(), SigilError> {
    let token = read_token(token, file)?;
    let inspection = inspect(&token)?;

    if json_mode {
        println!(
            "{}",
            serde_json::json!({
                "verified": false,
                "header": inspection.header,
                "claims": inspection.claims,
                "seal_b64": base64::engine::general_purpose::STANDARD.encode(&inspection.seal),
            })
        );
        return Ok(());
    }

    println!("Header:");
    println!("  alg: {}", inspection.header.alg);
    if let Some(typ) = &inspection.header.typ {
        println!("  typ: {}", typ);
    }
    if let Some(kid) = &inspection.header.kid {
        println!("  kid: {}", kid);
    }

    println!();
    println!("Claims:");
    for (name, value) in inspection.claims.iter() {
        match name.as_str() {
            "exp" | "nbf" | "iat" => {
                let secs = value.as_i64().unwrap_or_default();
                println!("  {:>4}: {} ({})", name, secs, humanize(UnixTime::from_secs(secs)));
            }
            _ => println!("  {:>4}: {}", name, value),
        }
    }

    println!();
    println!("Seal: {} bytes", inspection.seal.len());
    println!();
    println!("WARNING: seal NOT verified; claims above are unauthenticated");
    Ok(())
}

// =============================================================================
// KEYGEN COMMAND
// =============================================================================

/// Minimum secret length for generated keys (16 bytes).
///
/// Shorter secrets make the seal brute-forceable offline.
const MIN_KEYGEN_BYTES: usize = 16;

/// Generate a random signing secret and print it Base64-encoded.
pub fn cmd_keygen(json_mode: bool, bytes: usize) -> Result<(), SigilError> {
    if bytes < MIN_KEYGEN_BYTES {
        return Err(SigilError::Config(format!(
            "Secret length {} is below the minimum of {} bytes",
            bytes, MIN_KEYGEN_BYTES
        )));
    }

    use rand::RngCore;
    let mut material = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut material);

    let encoded = base64::engine::general_purpose::STANDARD.encode(&material);
    if json_mode {
        println!("{}", serde_json::json!({ "secret": encoded, "bytes": bytes }));
    } else {
        println!("{}", encoded);
    }
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config_path: &Path, host: &str, port: u16) -> Result<(), SigilError> {
    let config = SigilConfig::load(config_path)?;
    let service = api::TokenService::from_config(&config)?;

    println!("Sigil Token Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:      {}", host);
    println!("  Port:      {}", port);
    println!("  Algorithm: {}", config.token.algorithm);
    println!("  Config:    {:?}", config_path);
    println!();
    println!("Endpoints:");
    println!("  POST /sign    - Seal a claim set");
    println!("  POST /verify  - Verify a token");
    println!("  POST /inspect - Decode without verification");
    println!("  GET  /health  - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, service).await
}

// =============================================================================
// TESTS
// =============================================================================
