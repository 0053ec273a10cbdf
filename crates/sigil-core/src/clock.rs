//! # Clock Seam
//!
//! Temporal claim checks need "now", but the engine never reads ambient
//! time directly. Time enters through the `Clock` trait, so verification is
//! deterministic under test and a verifier's time source can be substituted
//! wholesale.

use crate::types::UnixTime;

// =============================================================================
// CLOCK TRAIT
// =============================================================================

/// A source of the current time.
///
/// Implementations must be `Send + Sync`; the server shares one clock
/// across request handlers.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> UnixTime;
}

// =============================================================================
// SYSTEM CLOCK
// =============================================================================

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UnixTime {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        UnixTime::from_secs(i64::try_from(secs).unwrap_or(i64::MAX))
    }
}

// =============================================================================
// FIXED CLOCK
// =============================================================================

/// A clock pinned to a single instant.
///
/// Used by tests and by offline verification of captured tokens, where the
/// interesting question is "was this valid at time T".
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: UnixTime,
}

impl FixedClock {
    /// Create a clock pinned to the given instant.
    #[must_use]
    pub const fn at(instant: UnixTime) -> Self {
        Self { at: instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> UnixTime {
        self.at
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_returns_pinned_instant() {
        let clock = FixedClock::at(UnixTime::from_secs(12345));
        assert_eq!(clock.now(), UnixTime::from_secs(12345));
        assert_eq!(clock.now(), UnixTime::from_secs(12345));
    }

    #[test]
    fn system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now().as_secs() > 1_577_836_800);
    }
}
