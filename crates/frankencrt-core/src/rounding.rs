//! Rounding-mode control.
//!
//! The floating-point rounding mode is process-global. [`RoundingDriver`] owns
//! every transition: it walks the four IEEE modes, labels the oracle context
//! for each pass, and returns the environment to round-to-nearest on every
//! exit path, including unwinding out of a failing pass.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::oracle::{NoticeKind, Oracle};

/// The four IEEE-754 rounding directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    ToNearest,
    TowardZero,
    Downward,
    Upward,
}

impl RoundingMode {
    pub const ALL: [Self; 4] = [Self::ToNearest, Self::TowardZero, Self::Downward, Self::Upward];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ToNearest => "FE_TONEAREST",
            Self::TowardZero => "FE_TOWARDZERO",
            Self::Downward => "FE_DOWNWARD",
            Self::Upward => "FE_UPWARD",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundingError {
    #[error("host rejected rounding mode {}", .0.label())]
    Rejected(RoundingMode),
    #[error("rounding mode control is not available on this target")]
    Unavailable,
}

/// Access to the host's floating-point environment.
pub trait FloatEnvironment {
    fn set_rounding_mode(&self, mode: RoundingMode) -> Result<(), RoundingError>;

    /// Current mode, or `None` if the host reports something unrecognised.
    fn rounding_mode(&self) -> Option<RoundingMode>;
}

/// One sweep of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPass {
    /// Whatever the process started with; judged against round-to-nearest.
    DefaultEnvironment,
    Explicit(RoundingMode),
}

impl RoundingPass {
    /// Mode whose expectations apply during this pass.
    #[must_use]
    pub const fn mode(self) -> RoundingMode {
        match self {
            Self::DefaultEnvironment => RoundingMode::ToNearest,
            Self::Explicit(mode) => mode,
        }
    }

    /// Context label prefixed to diagnostics during this pass.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DefaultEnvironment => "FE_DFL_ENV ",
            Self::Explicit(RoundingMode::ToNearest) => "FE_TONEAREST ",
            Self::Explicit(RoundingMode::TowardZero) => "FE_TOWARDZERO ",
            Self::Explicit(RoundingMode::Downward) => "FE_DOWNWARD ",
            Self::Explicit(RoundingMode::Upward) => "FE_UPWARD ",
        }
    }
}

/// Restores round-to-nearest when dropped.
pub struct RoundingScope<'e, E: FloatEnvironment + ?Sized> {
    env: &'e E,
}

impl<'e, E: FloatEnvironment + ?Sized> RoundingScope<'e, E> {
    #[must_use]
    pub fn enter(env: &'e E) -> Self {
        Self { env }
    }

    pub fn set(&self, mode: RoundingMode) -> Result<(), RoundingError> {
        self.env.set_rounding_mode(mode)
    }
}

impl<E: FloatEnvironment + ?Sized> Drop for RoundingScope<'_, E> {
    fn drop(&mut self) {
        let _ = self.env.set_rounding_mode(RoundingMode::ToNearest);
    }
}

/// What a driver run did. A rejected mode is not a checked condition; its
/// pass still runs and its checks fail on their own merits.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoundingReport {
    pub passes: Vec<RoundingPass>,
    pub rejected: Vec<(RoundingMode, RoundingError)>,
}

/// Runs a mode-dependent vector once per rounding mode.
pub struct RoundingDriver<'e, E: FloatEnvironment + ?Sized> {
    env: &'e E,
    default_pass: bool,
}

impl<'e, E: FloatEnvironment + ?Sized> RoundingDriver<'e, E> {
    #[must_use]
    pub fn new(env: &'e E) -> Self {
        Self {
            env,
            default_pass: false,
        }
    }

    /// Precede the four explicit modes with a pass in the untouched default
    /// environment.
    #[must_use]
    pub fn with_default_pass(mut self) -> Self {
        self.default_pass = true;
        self
    }

    #[must_use]
    pub fn passes(&self) -> Vec<RoundingPass> {
        let default = self
            .default_pass
            .then_some(RoundingPass::DefaultEnvironment);
        default
            .into_iter()
            .chain(RoundingMode::ALL.into_iter().map(RoundingPass::Explicit))
            .collect()
    }

    /// Run `body` once per pass with the context labelled and the mode set.
    /// A rejected mode is also recorded on the oracle as a notice. On return
    /// the context is empty and the mode is round-to-nearest.
    #[track_caller]
    pub fn run(
        &self,
        oracle: &mut Oracle,
        mut body: impl FnMut(&mut Oracle, RoundingMode),
    ) -> RoundingReport {
        let scope = RoundingScope::enter(self.env);
        let mut report = RoundingReport::default();
        for pass in self.passes() {
            let rejected = match pass {
                RoundingPass::Explicit(mode) => scope.set(mode).err().map(|err| (mode, err)),
                RoundingPass::DefaultEnvironment => None,
            };
            let mut labelled = oracle.scoped_context(pass.label());
            if let Some((mode, err)) = rejected {
                labelled.notice(NoticeKind::RoundingModeRejected, err.to_string());
                report.rejected.push((mode, err));
            }
            body(&mut labelled, pass.mode());
            report.passes.push(pass);
        }
        drop(scope);
        oracle.clear_context();
        report
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;
    use crate::config::OracleConfig;

    /// Records every transition; optionally refuses one mode.
    struct RecordingEnv {
        mode: Cell<RoundingMode>,
        history: RefCell<Vec<RoundingMode>>,
        refuse: Option<RoundingMode>,
    }

    impl RecordingEnv {
        fn new(refuse: Option<RoundingMode>) -> Self {
            Self {
                mode: Cell::new(RoundingMode::ToNearest),
                history: RefCell::new(Vec::new()),
                refuse,
            }
        }
    }

    impl FloatEnvironment for RecordingEnv {
        fn set_rounding_mode(&self, mode: RoundingMode) -> Result<(), RoundingError> {
            if self.refuse == Some(mode) {
                return Err(RoundingError::Rejected(mode));
            }
            self.history.borrow_mut().push(mode);
            self.mode.set(mode);
            Ok(())
        }

        fn rounding_mode(&self) -> Option<RoundingMode> {
            Some(self.mode.get())
        }
    }

    #[test]
    fn walks_all_modes_and_restores_nearest() {
        let env = RecordingEnv::new(None);
        let mut oracle = Oracle::silent(OracleConfig::default());
        let mut seen = Vec::new();
        let report = RoundingDriver::new(&env).with_default_pass().run(&mut oracle, |o, mode| {
            seen.push((o.context().to_string(), mode, env.rounding_mode()));
        });

        assert_eq!(report.passes.len(), 5);
        assert!(report.rejected.is_empty());
        assert_eq!(seen[0], ("FE_DFL_ENV ".into(), RoundingMode::ToNearest, Some(RoundingMode::ToNearest)));
        assert_eq!(seen[2], ("FE_TOWARDZERO ".into(), RoundingMode::TowardZero, Some(RoundingMode::TowardZero)));
        assert_eq!(seen[4], ("FE_UPWARD ".into(), RoundingMode::Upward, Some(RoundingMode::Upward)));
        assert_eq!(env.rounding_mode(), Some(RoundingMode::ToNearest));
        assert_eq!(env.history.borrow().last(), Some(&RoundingMode::ToNearest));
        assert_eq!(oracle.context(), "");
    }

    #[test]
    fn rejected_mode_is_reported_not_counted() {
        let env = RecordingEnv::new(Some(RoundingMode::Upward));
        let mut oracle = Oracle::silent(OracleConfig::default());
        let report = RoundingDriver::new(&env).run(&mut oracle, |_, _| {});
        assert_eq!(report.passes.len(), 4);
        assert_eq!(report.rejected, vec![(RoundingMode::Upward, RoundingError::Rejected(RoundingMode::Upward))]);
        assert_eq!(oracle.counter().attempted, 0);
        assert_eq!(env.rounding_mode(), Some(RoundingMode::ToNearest));

        let notices = oracle.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::RoundingModeRejected);
        assert_eq!(notices[0].context, "FE_UPWARD ");
        assert_eq!(notices[0].message, "host rejected rounding mode FE_UPWARD");
    }

    #[test]
    fn nearest_restored_when_pass_unwinds() {
        let env = RecordingEnv::new(None);
        let mut oracle = Oracle::silent(OracleConfig::default());
        let result = catch_unwind(AssertUnwindSafe(|| {
            RoundingDriver::new(&env).run(&mut oracle, |_, mode| {
                assert_ne!(mode, RoundingMode::Downward, "boom");
            });
        }));
        assert!(result.is_err());
        assert_eq!(env.rounding_mode(), Some(RoundingMode::ToNearest));
    }

    #[test]
    fn labels_match_fenv_macro_names() {
        let labels: Vec<_> = RoundingMode::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(labels, ["FE_TONEAREST", "FE_TOWARDZERO", "FE_DOWNWARD", "FE_UPWARD"]);
        assert_eq!(RoundingPass::Explicit(RoundingMode::Downward).label(), "FE_DOWNWARD ");
        assert_eq!(RoundingPass::DefaultEnvironment.mode(), RoundingMode::ToNearest);
    }
}
