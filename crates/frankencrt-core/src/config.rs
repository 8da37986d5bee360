//! Oracle configuration.
//!
//! NaN-sign enforcement is set via the `FRANKENCRT_NAN_PRESERVATION` environment
//! variable:
//! - `ignore` (default): a NaN-expecting check passes for any NaN regardless of
//!   its sign bit. Many conforming math libraries do not propagate NaN signs.
//! - `enforce`: a NaN-expecting check also requires the observed sign bit to
//!   match the expected NaN's sign bit.
//!
//! The harness CLI can override the environment with `--nan-preservation`.

use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable consulted by [`nan_sign_policy`].
pub const NAN_PRESERVATION_ENV: &str = "FRANKENCRT_NAN_PRESERVATION";

/// Whether NaN-expecting checks also compare sign bits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NanSignPolicy {
    /// Any NaN satisfies a NaN expectation.
    #[default]
    Ignore,
    /// The observed NaN's sign bit must equal the expected NaN's sign bit.
    Enforce,
}

impl NanSignPolicy {
    /// Parse from string (case-insensitive). Unknown values fall back to `Ignore`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "enforce" | "on" | "strict" | "1" | "true" | "yes" => Self::Enforce,
            "ignore" | "off" | "0" | "false" | "no" => Self::Ignore,
            _ => Self::Ignore,
        }
    }

    #[must_use]
    pub const fn enforced(self) -> bool {
        matches!(self, Self::Enforce)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Enforce => "enforce",
        }
    }
}

// Atomic cache: 0=unresolved, 1=Ignore, 2=Enforce.
static CACHED_POLICY: AtomicU8 = AtomicU8::new(0);

const POLICY_UNRESOLVED: u8 = 0;
const POLICY_IGNORE: u8 = 1;
const POLICY_ENFORCE: u8 = 2;

fn policy_to_u8(policy: NanSignPolicy) -> u8 {
    match policy {
        NanSignPolicy::Ignore => POLICY_IGNORE,
        NanSignPolicy::Enforce => POLICY_ENFORCE,
    }
}

fn u8_to_policy(v: u8) -> NanSignPolicy {
    match v {
        POLICY_ENFORCE => NanSignPolicy::Enforce,
        _ => NanSignPolicy::Ignore,
    }
}

/// Get the configured NaN-sign policy (reads the env var on first call, caches
/// thereafter).
#[must_use]
pub fn nan_sign_policy() -> NanSignPolicy {
    let cached = CACHED_POLICY.load(Ordering::Relaxed);
    if cached != POLICY_UNRESOLVED {
        return u8_to_policy(cached);
    }

    let policy = std::env::var(NAN_PRESERVATION_ENV)
        .map(|v| NanSignPolicy::from_str_loose(&v))
        .unwrap_or_default();
    // A concurrent resolver may have won; both read the same environment.
    let _ = CACHED_POLICY.compare_exchange(
        POLICY_UNRESOLVED,
        policy_to_u8(policy),
        Ordering::SeqCst,
        Ordering::Relaxed,
    );
    u8_to_policy(CACHED_POLICY.load(Ordering::Acquire))
}

/// Settings an [`Oracle`](crate::oracle::Oracle) is constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleConfig {
    pub nan_signs: NanSignPolicy,
    /// Write one diagnostic line per failed check to the oracle's sink.
    pub echo_failures: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            nan_signs: NanSignPolicy::Ignore,
            echo_failures: true,
        }
    }
}

impl OracleConfig {
    /// Configuration resolved from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            nan_signs: nan_sign_policy(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_nan_signs(mut self, policy: NanSignPolicy) -> Self {
        self.nan_signs = policy;
        self
    }

    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.echo_failures = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nan_policies() {
        assert_eq!(NanSignPolicy::from_str_loose("enforce"), NanSignPolicy::Enforce);
        assert_eq!(NanSignPolicy::from_str_loose("ENFORCE"), NanSignPolicy::Enforce);
        assert_eq!(NanSignPolicy::from_str_loose("on"), NanSignPolicy::Enforce);
        assert_eq!(NanSignPolicy::from_str_loose("1"), NanSignPolicy::Enforce);
        assert_eq!(NanSignPolicy::from_str_loose("ignore"), NanSignPolicy::Ignore);
        assert_eq!(NanSignPolicy::from_str_loose("off"), NanSignPolicy::Ignore);
        assert_eq!(NanSignPolicy::from_str_loose("bogus"), NanSignPolicy::Ignore);
    }

    #[test]
    fn default_is_opt_out() {
        assert_eq!(NanSignPolicy::default(), NanSignPolicy::Ignore);
        assert!(!OracleConfig::default().nan_signs.enforced());
        assert!(OracleConfig::default().echo_failures);
    }

    #[test]
    fn builder_overrides() {
        let config = OracleConfig::default()
            .with_nan_signs(NanSignPolicy::Enforce)
            .quiet();
        assert!(config.nan_signs.enforced());
        assert!(!config.echo_failures);
    }

    #[test]
    fn cached_policy_is_process_sticky_until_cache_reset() {
        let previous = CACHED_POLICY.swap(POLICY_ENFORCE, Ordering::SeqCst);
        assert_eq!(nan_sign_policy(), NanSignPolicy::Enforce);
        assert_eq!(nan_sign_policy(), NanSignPolicy::Enforce);

        CACHED_POLICY.store(POLICY_IGNORE, Ordering::SeqCst);
        assert_eq!(nan_sign_policy(), NanSignPolicy::Ignore);

        CACHED_POLICY.store(previous, Ordering::SeqCst);
    }
}
