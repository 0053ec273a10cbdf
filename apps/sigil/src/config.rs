//! # Configuration Module
//!
//! TOML configuration for the Sigil CLI and server.
//!
//! ## File Layout
//!
//! ```toml
//! [token]
//! issuer = "sigil"
//! audience = "api"
//! algorithm = "HS256"
//! ttl_secs = 3600
//! leeway_secs = 30
//!
//! [keys]
//! secret = "bWFzdGVyLXNlY3JldA=="   # Base64
//! # or: secret_file = "/etc/sigil/secret.b64"
//! ```
//!
//! ## Precedence
//!
//! Secret resolution: `SIGIL_SECRET` environment variable, then
//! `[keys].secret`, then the contents of `[keys].secret_file`.

use serde::{Deserialize, Serialize};
use sigil_core::{Algorithm, SigilError, Signer, SigningKey, Verifier};
use std::path::{Path, PathBuf};

// =============================================================================
// CONFIG STRUCTURES
// =============================================================================

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SigilConfig {
    /// Token issuance and verification settings.
    #[serde(default)]
    pub token: TokenConfig,

    /// Key material sources.
    #[serde(default)]
    pub keys: KeyConfig,
}

/// The `[token]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Issuer stamped into signed tokens and required on verification.
    pub issuer: Option<String>,

    /// Audience required on verification.
    pub audience: Option<String>,

    /// Sealing algorithm wire name.
    pub algorithm: String,

    /// Default token lifetime in seconds.
    pub ttl_secs: i64,

    /// Clock-skew tolerance for `exp`/`nbf` in seconds.
    pub leeway_secs: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            issuer: None,
            audience: None,
            algorithm: "HS256".to_string(),
            ttl_secs: 3600,
            leeway_secs: 0,
        }
    }
}

/// The `[keys]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Base64-encoded secret, inline.
    pub secret: Option<String>,

    /// Path to a file whose contents are the Base64-encoded secret.
    pub secret_file: Option<PathBuf>,
}

// =============================================================================
// LOADING
// =============================================================================

impl SigilConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults: the config file is optional as
    /// long as the secret arrives via `SIGIL_SECRET`.
    pub fn load(path: &Path) -> Result<Self, SigilError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|e| {
            SigilError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;

        toml::from_str(&raw).map_err(|e| {
            SigilError::Config(format!("Invalid config '{}': {}", path.display(), e))
        })
    }

    /// The configured sealing algorithm.
    pub fn algorithm(&self) -> Result<Algorithm, SigilError> {
        Algorithm::from_name(&self.token.algorithm)
    }

    /// Resolve the signing key: `SIGIL_SECRET` env, inline secret, then
    /// secret file.
    pub fn resolve_key(&self) -> Result<SigningKey, SigilError> {
        if let Ok(encoded) = std::env::var("SIGIL_SECRET") {
            if !encoded.is_empty() {
                return SigningKey::from_base64(&encoded);
            }
        }

        if let Some(encoded) = &self.keys.secret {
            return SigningKey::from_base64(encoded);
        }

        if let Some(path) = &self.keys.secret_file {
            let encoded = std::fs::read_to_string(path).map_err(|e| {
                SigilError::Io(format!("Cannot read secret file '{}': {}", path.display(), e))
            })?;
            return SigningKey::from_base64(&encoded);
        }

        Err(SigilError::Config(
            "No secret configured: set SIGIL_SECRET, [keys].secret, or [keys].secret_file"
                .to_string(),
        ))
    }

    /// Build a signer from this configuration.
    pub fn build_signer(&self) -> Result<Signer, SigilError> {
        let mut signer = Signer::new(self.algorithm()?, self.resolve_key()?)
            .with_ttl_secs(self.token.ttl_secs);
        if let Some(issuer) = &self.token.issuer {
            signer = signer.with_issuer(issuer.clone());
        }
        Ok(signer)
    }

    /// Build a verifier from this configuration.
    pub fn build_verifier(&self) -> Result<Verifier, SigilError> {
        let mut verifier =
            Verifier::new(self.algorithm()?).with_leeway_secs(self.token.leeway_secs);
        if let Some(issuer) = &self.token.issuer {
            verifier = verifier.require_issuer(issuer.clone());
        }
        if let Some(audience) = &self.token.audience {
            verifier = verifier.require_audience(audience.clone());
        }
        Ok(verifier)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let config = SigilConfig::load(Path::new("/nonexistent/sigil.toml")).expect("load");
        assert_eq!(config.token.algorithm, "HS256");
        assert_eq!(config.token.ttl_secs, 3600);
        assert_eq!(config.token.leeway_secs, 0);
        assert!(config.keys.secret.is_none());
    }

    #[test]
    fn full_file_parses() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"
[token]
issuer = "sigil-test"
audience = "api"
algorithm = "HS512"
ttl_secs = 600
leeway_secs = 30

[keys]
secret = "c2VjcmV0"
"#
        )
        .expect("write");

        let config = SigilConfig::load(file.path()).expect("load");
        assert_eq!(config.token.issuer.as_deref(), Some("sigil-test"));
        assert_eq!(config.token.audience.as_deref(), Some("api"));
        assert_eq!(config.algorithm().expect("alg"), Algorithm::Hs512);
        assert_eq!(config.token.ttl_secs, 600);
        assert_eq!(config.token.leeway_secs, 30);

        let key = config.resolve_key().expect("key");
        assert_eq!(key.as_bytes(), b"secret");
    }

    #[test]
    fn partial_file_keeps_section_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "[token]\nissuer = \"partial\"\n").expect("write");

        let config = SigilConfig::load(file.path()).expect("load");
        assert_eq!(config.token.issuer.as_deref(), Some("partial"));
        assert_eq!(config.token.algorithm, "HS256");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "[token\nbroken").expect("write");

        let err = SigilConfig::load(file.path()).expect_err("must reject");
        assert!(matches!(err, SigilError::Config(_)));
    }

    #[test]
    fn secret_file_resolves_key() {
        let mut secret = tempfile::NamedTempFile::new().expect("tempfile");
        write!(secret, "c2VjcmV0\n").expect("write");

        let config = SigilConfig {
            keys: KeyConfig {
                secret: None,
                secret_file: Some(secret.path().to_path_buf()),
            },
            ..SigilConfig::default()
        };

        let key = config.resolve_key().expect("key");
        assert_eq!(key.as_bytes(), b"secret");
    }

    #[test]
    fn no_secret_anywhere_is_a_config_error() {
        let config = SigilConfig::default();
        // The suite never sets SIGIL_SECRET globally.
        if std::env::var("SIGIL_SECRET").is_err() {
            let err = config.resolve_key().expect_err("must reject");
            assert!(matches!(err, SigilError::Config(_)));
        }
    }

    #[test]
    fn verifier_reflects_token_section() {
        let config = SigilConfig {
            token: TokenConfig {
                issuer: Some("iss".to_string()),
                audience: Some("aud".to_string()),
                algorithm: "HS256".to_string(),
                ttl_secs: 60,
                leeway_secs: 5,
            },
            ..SigilConfig::default()
        };
        assert!(config.build_verifier().is_ok());
    }
}
