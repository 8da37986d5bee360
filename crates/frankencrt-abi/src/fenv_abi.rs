//! Bindings to the host `<fenv.h>` rounding controls.
//!
//! The `FE_*` rounding constants are architecture-specific (they are the
//! control-word bit patterns of the FPU), so they are spelled out per target.
//! Targets without a known layout report [`RoundingError::Unavailable`].

use std::ffi::c_int;

use frankencrt_core::rounding::{FloatEnvironment, RoundingError, RoundingMode};

#[cfg_attr(target_os = "linux", link(name = "m"))]
unsafe extern "C" {
    #[link_name = "fesetround"]
    safe fn native_fesetround_sym(mode: c_int) -> c_int;
    #[link_name = "fegetround"]
    safe fn native_fegetround_sym() -> c_int;
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod consts {
    use std::ffi::c_int;
    pub const FE_TONEAREST: c_int = 0;
    pub const FE_DOWNWARD: c_int = 0x400;
    pub const FE_UPWARD: c_int = 0x800;
    pub const FE_TOWARDZERO: c_int = 0xc00;
}

#[cfg(any(target_arch = "aarch64", target_arch = "arm"))]
mod consts {
    use std::ffi::c_int;
    pub const FE_TONEAREST: c_int = 0;
    pub const FE_UPWARD: c_int = 0x40_0000;
    pub const FE_DOWNWARD: c_int = 0x80_0000;
    pub const FE_TOWARDZERO: c_int = 0xc0_0000;
}

#[cfg(any(target_arch = "riscv64", target_arch = "riscv32"))]
mod consts {
    use std::ffi::c_int;
    pub const FE_TONEAREST: c_int = 0;
    pub const FE_TOWARDZERO: c_int = 1;
    pub const FE_DOWNWARD: c_int = 2;
    pub const FE_UPWARD: c_int = 3;
}

#[cfg(any(target_arch = "powerpc", target_arch = "powerpc64"))]
mod consts {
    use std::ffi::c_int;
    pub const FE_TONEAREST: c_int = 0;
    pub const FE_TOWARDZERO: c_int = 1;
    pub const FE_UPWARD: c_int = 2;
    pub const FE_DOWNWARD: c_int = 3;
}

#[cfg(any(
    target_arch = "x86",
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "arm",
    target_arch = "riscv64",
    target_arch = "riscv32",
    target_arch = "powerpc",
    target_arch = "powerpc64"
))]
mod table {
    use std::ffi::c_int;

    use frankencrt_core::rounding::RoundingMode;

    use super::consts::*;

    pub fn to_raw(mode: RoundingMode) -> Option<c_int> {
        Some(match mode {
            RoundingMode::ToNearest => FE_TONEAREST,
            RoundingMode::TowardZero => FE_TOWARDZERO,
            RoundingMode::Downward => FE_DOWNWARD,
            RoundingMode::Upward => FE_UPWARD,
        })
    }

    pub fn from_raw(raw: c_int) -> Option<RoundingMode> {
        RoundingMode::ALL
            .into_iter()
            .find(|&mode| to_raw(mode) == Some(raw))
    }
}

#[cfg(not(any(
    target_arch = "x86",
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "arm",
    target_arch = "riscv64",
    target_arch = "riscv32",
    target_arch = "powerpc",
    target_arch = "powerpc64"
)))]
mod table {
    use std::ffi::c_int;

    use frankencrt_core::rounding::RoundingMode;

    pub fn to_raw(_mode: RoundingMode) -> Option<c_int> {
        None
    }

    pub fn from_raw(_raw: c_int) -> Option<RoundingMode> {
        None
    }
}

/// Host `<fenv.h>` rounding control.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostFloatEnv;

impl FloatEnvironment for HostFloatEnv {
    fn set_rounding_mode(&self, mode: RoundingMode) -> Result<(), RoundingError> {
        let raw = table::to_raw(mode).ok_or(RoundingError::Unavailable)?;
        if native_fesetround_sym(raw) == 0 {
            Ok(())
        } else {
            Err(RoundingError::Rejected(mode))
        }
    }

    fn rounding_mode(&self) -> Option<RoundingMode> {
        table::from_raw(native_fegetround_sym())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_round_trips_and_nearest_is_restored() {
        let env = HostFloatEnv;
        for mode in RoundingMode::ALL {
            env.set_rounding_mode(mode).unwrap();
            assert_eq!(env.rounding_mode(), Some(mode));
        }
        env.set_rounding_mode(RoundingMode::ToNearest).unwrap();
        assert_eq!(env.rounding_mode(), Some(RoundingMode::ToNearest));
    }
}
