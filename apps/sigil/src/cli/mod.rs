//! # Sigil CLI Module
//!
//! This module implements the CLI interface for Sigil.
//!
//! ## Available Commands
//!
//! - `sign` - Seal a claim set into a compact token
//! - `verify` - Verify a token and print its claims
//! - `inspect` - Decode a token WITHOUT verifying its seal
//! - `keygen` - Generate a random signing secret
//! - `server` - Start the HTTP server

mod commands;

use clap::{Parser, Subcommand};
use sigil_core::SigilError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Sigil - Token Toolkit
///
/// Seal, verify, and inspect compact HMAC tokens. A token is readable by
/// anyone and forgeable by no one without the key.
#[derive(Parser, Debug)]
#[command(name = "sigil")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the configuration file
    #[arg(short = 'C', long, global = true, default_value = "sigil.toml")]
    pub config: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Seal a claim set into a compact token
    Sign {
        /// Claims as inline JSON
        #[arg(short = 'c', long)]
        claims: Option<String>,

        /// Read claims JSON from a file ("-" for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Subject claim shortcut (overrides any `sub` in the claims)
        #[arg(short, long)]
        subject: Option<String>,

        /// Token lifetime in seconds (overrides the configured TTL)
        #[arg(short, long)]
        ttl: Option<i64>,
    },

    /// Verify a token and print its claims
    Verify {
        /// The compact token
        token: Option<String>,

        /// Read the token from a file ("-" for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Decode a token WITHOUT verifying its seal
    Inspect {
        /// The compact token
        token: Option<String>,

        /// Read the token from a file ("-" for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Generate a random signing secret (Base64)
    Keygen {
        /// Secret length in bytes
        #[arg(short, long, default_value = "32")]
        bytes: usize,
    },

    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), SigilError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Sign {
            claims,
            file,
            subject,
            ttl,
        } => cmd_sign(&cli.config, json_mode, claims, file, subject, ttl),
        Commands::Verify { token, file } => cmd_verify(&cli.config, json_mode, token, file),
        Commands::Inspect { token, file } => cmd_inspect(json_mode, token, file),
        Commands::Keygen { bytes } => cmd_keygen(json_mode, bytes),
        Commands::Server { host, port } => cmd_server(&cli.config, &host, port).await,
    }
}
