//! # Sigil - Token Toolkit
//!
//! The main binary for the Sigil sealed-token toolkit.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for signing, verifying, and inspecting tokens
//! - TOML configuration with environment overrides
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  apps/sigil (THE BINARY)                 │
//! │                                                          │
//! │  ┌─────────────┐   ┌─────────────┐   ┌───────────────┐  │
//! │  │    CLI      │   │  HTTP API   │   │    Config     │  │
//! │  │   (clap)    │   │   (axum)    │   │ (toml + env)  │  │
//! │  └──────┬──────┘   └──────┬──────┘   └───────┬───────┘  │
//! │         │                 │                  │          │
//! │         └─────────────────┼──────────────────┘          │
//! │                           ▼                             │
//! │                   ┌───────────────┐                     │
//! │                   │  sigil-core   │                     │
//! │                   │  (THE LOGIC)  │                     │
//! │                   └───────────────┘                     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Generate a key and sign a claim set
//! sigil keygen > secret.b64
//! sigil sign --claims '{"sub":"alice"}' --ttl 3600
//!
//! # Verify and inspect
//! sigil verify <token>
//! sigil inspect <token>
//!
//! # Start the HTTP server
//! sigil server --host 0.0.0.0 --port 8080
//! ```

mod api;
mod cli;
mod config;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — SIGIL_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("SIGIL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sigil=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Sigil startup banner.
fn print_banner() {
    println!(
        r#"
  ███████╗██╗ ██████╗ ██╗██╗
  ██╔════╝██║██╔════╝ ██║██║
  ███████╗██║██║  ███╗██║██║
  ╚════██║██║██║   ██║██║██║
  ███████║██║╚██████╔╝██║███████╗
  ╚══════╝╚═╝ ╚═════╝ ╚═╝╚══════╝

  Token Toolkit v{}

  Sealed • Readable • Verifiable
"#,
        env!("CARGO_PKG_VERSION")
    );
}
