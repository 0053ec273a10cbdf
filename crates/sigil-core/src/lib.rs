//! # sigil-core
//!
//! The deterministic token engine for Sigil - THE LOGIC.
//!
//! This crate implements the compact sealed-token format: three Base64URL
//! segments (`header.payload.seal`) where the seal is an HMAC-SHA2 MAC
//! over the first two. Tokens are integrity-protected but not confidential;
//! anyone can read them, only the key holder can mint or verify them.
//!
//! ## Architectural Constraints
//!
//! The engine:
//! - Is pure: no async, no network, no filesystem access
//! - Is deterministic: the same header, claims, and key always produce the
//!   identical token string
//! - Never trusts an unchecked seal: verification checks the seal before
//!   decoding claims into a trusted result
//! - Reads ambient state only through trait seams (`Clock`, `KeyProvider`)

// =============================================================================
// MODULES
// =============================================================================

pub mod claims;
pub mod clock;
pub mod header;
pub mod inspect;
pub mod segments;
pub mod sign;
pub mod types;
pub mod verify;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Algorithm, SigilError, SigningKey, UnixTime};

// =============================================================================
// RE-EXPORTS: Token Engine
// =============================================================================

pub use claims::{Audience, Claims};
pub use clock::{Clock, FixedClock, SystemClock};
pub use header::Header;
pub use inspect::{Inspection, inspect};
pub use segments::{decode_segment, encode_segment, join_compact, split_compact};
pub use sign::{Signer, sign};
pub use verify::{KeyProvider, SingleKey, TokenData, Verifier};
