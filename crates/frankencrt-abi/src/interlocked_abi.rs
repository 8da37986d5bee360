//! Host read-modify-write primitives.
//!
//! The Win32 interlocked family maps onto the std atomics: `fetch_*` for the
//! prior-value primitives, `fetch_*` plus the operand for the
//! resulting-value ones, and `fetch_or`/`fetch_and`/`fetch_xor` with a
//! single-bit mask for bit test-and-modify. Non-interlocked bit tests are a
//! relaxed load followed by a store. Bit scans use the hardware count
//! instructions behind `trailing_zeros`/`leading_zeros`.

use std::sync::atomic::Ordering::{Relaxed, SeqCst};
use std::sync::atomic::{AtomicI32, AtomicPtr};

use frankencrt_core::atomic::{
    Access, BitScan, Interlocked, Primitive, ScanDirection, ScanResult, Unsupported, Width,
};

#[cfg(target_has_atomic = "64")]
use std::sync::atomic::AtomicI64;

/// The host's atomic primitives.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostInterlocked;

macro_rules! integer_interlocked {
    ($atomic:ty, $int:ty, $width:expr) => {
        impl Interlocked<$atomic> for HostInterlocked {
            fn apply(
                &self,
                cell: &$atomic,
                access: Access,
                primitive: Primitive<$int>,
            ) -> Result<$int, Unsupported> {
                let unsupported = Unsupported {
                    primitive: primitive.name(),
                    width: $width,
                };
                let mask = |bit: u32| (1 as $int).checked_shl(bit).ok_or(unsupported);
                let prior_bit = |prior: $int, m: $int| <$int>::from(prior & m != 0);

                Ok(match (access, primitive) {
                    (Access::Interlocked, Primitive::BitTestAndSet(bit)) => {
                        let m = mask(bit)?;
                        prior_bit(cell.fetch_or(m, SeqCst), m)
                    }
                    (Access::Interlocked, Primitive::BitTestAndReset(bit)) => {
                        let m = mask(bit)?;
                        prior_bit(cell.fetch_and(!m, SeqCst), m)
                    }
                    (Access::Interlocked, Primitive::BitTestAndComplement(bit)) => {
                        let m = mask(bit)?;
                        prior_bit(cell.fetch_xor(m, SeqCst), m)
                    }
                    (_, Primitive::BitTest(bit)) => {
                        let m = mask(bit)?;
                        prior_bit(cell.load(SeqCst), m)
                    }
                    (Access::Plain, Primitive::BitTestAndSet(bit)) => {
                        let m = mask(bit)?;
                        let prior = cell.load(Relaxed);
                        cell.store(prior | m, Relaxed);
                        prior_bit(prior, m)
                    }
                    (Access::Plain, Primitive::BitTestAndReset(bit)) => {
                        let m = mask(bit)?;
                        let prior = cell.load(Relaxed);
                        cell.store(prior & !m, Relaxed);
                        prior_bit(prior, m)
                    }
                    (Access::Plain, Primitive::BitTestAndComplement(bit)) => {
                        let m = mask(bit)?;
                        let prior = cell.load(Relaxed);
                        cell.store(prior ^ m, Relaxed);
                        prior_bit(prior, m)
                    }
                    (Access::Interlocked, Primitive::Increment) => cell.fetch_add(1, SeqCst).wrapping_add(1),
                    (Access::Interlocked, Primitive::Decrement) => cell.fetch_sub(1, SeqCst).wrapping_sub(1),
                    (Access::Interlocked, Primitive::Add(v)) => cell.fetch_add(v, SeqCst).wrapping_add(v),
                    (Access::Interlocked, Primitive::ExchangeAdd(v)) => cell.fetch_add(v, SeqCst),
                    (Access::Interlocked, Primitive::Exchange(v)) => cell.swap(v, SeqCst),
                    (
                        Access::Interlocked,
                        Primitive::CompareExchange {
                            exchange,
                            comparand,
                        },
                    ) => cell
                        .compare_exchange(comparand, exchange, SeqCst, SeqCst)
                        .unwrap_or_else(|prior| prior),
                    (Access::Interlocked, Primitive::Or(v)) => cell.fetch_or(v, SeqCst),
                    (Access::Interlocked, Primitive::And(v)) => cell.fetch_and(v, SeqCst),
                    (Access::Interlocked, Primitive::Xor(v)) => cell.fetch_xor(v, SeqCst),
                    (Access::Plain, _) => return Err(unsupported),
                })
            }
        }
    };
}

integer_interlocked!(AtomicI32, i32, Width::Bits32);
#[cfg(target_has_atomic = "64")]
integer_interlocked!(AtomicI64, i64, Width::Bits64);

impl Interlocked<AtomicPtr<u8>> for HostInterlocked {
    fn apply(
        &self,
        cell: &AtomicPtr<u8>,
        access: Access,
        primitive: Primitive<*mut u8>,
    ) -> Result<*mut u8, Unsupported> {
        match (access, primitive) {
            (Access::Interlocked, Primitive::Exchange(v)) => Ok(cell.swap(v, SeqCst)),
            (
                Access::Interlocked,
                Primitive::CompareExchange {
                    exchange,
                    comparand,
                },
            ) => Ok(cell
                .compare_exchange(comparand, exchange, SeqCst, SeqCst)
                .unwrap_or_else(|prior| prior)),
            (_, other) => Err(Unsupported {
                primitive: other.name(),
                width: Width::Pointer,
            }),
        }
    }
}

impl BitScan for HostInterlocked {
    fn bit_scan(&self, direction: ScanDirection, width: Width, mask: u64) -> Result<ScanResult, Unsupported> {
        let (found, index) = match width {
            Width::Bits32 => {
                let m = u32::try_from(mask).map_err(|_| Unsupported {
                    primitive: "BitScan",
                    width,
                })?;
                let index = match direction {
                    ScanDirection::Forward => m.trailing_zeros(),
                    ScanDirection::Reverse => (u32::BITS - 1).saturating_sub(m.leading_zeros()),
                };
                (m != 0, index)
            }
            Width::Bits64 => {
                let index = match direction {
                    ScanDirection::Forward => mask.trailing_zeros(),
                    ScanDirection::Reverse => (u64::BITS - 1).saturating_sub(mask.leading_zeros()),
                };
                (mask != 0, index)
            }
            Width::Pointer => {
                return Err(Unsupported {
                    primitive: "BitScan",
                    width,
                });
            }
        };
        Ok(ScanResult {
            found: u8::from(found),
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_test_and_set_returns_prior_bit() {
        let cell = AtomicI32::new(0);
        let host = HostInterlocked;
        assert_eq!(host.apply(&cell, Access::Interlocked, Primitive::BitTestAndSet(2)), Ok(0));
        assert_eq!(host.apply(&cell, Access::Interlocked, Primitive::BitTestAndSet(2)), Ok(1));
        assert_eq!(cell.load(SeqCst), 4);
        assert_eq!(host.apply(&cell, Access::Plain, Primitive::BitTestAndComplement(2)), Ok(1));
        assert_eq!(cell.load(SeqCst), 0);
    }

    #[test]
    fn bit_index_past_width_is_unsupported() {
        let cell = AtomicI32::new(0);
        let err = HostInterlocked
            .apply(&cell, Access::Interlocked, Primitive::BitTestAndSet(40))
            .unwrap_err();
        assert_eq!(err.width, Width::Bits32);
    }

    #[test]
    fn plain_arithmetic_is_not_offered() {
        let cell = AtomicI32::new(0);
        assert!(HostInterlocked.apply(&cell, Access::Plain, Primitive::Increment).is_err());
        assert_eq!(cell.load(SeqCst), 0);
    }

    #[test]
    fn scans_find_extreme_bits() {
        let host = HostInterlocked;
        let r = host.bit_scan(ScanDirection::Reverse, Width::Bits64, 0x8000_0000_0000_0000).unwrap();
        assert_eq!(r, ScanResult { found: 1, index: 63 });
        let r = host.bit_scan(ScanDirection::Forward, Width::Bits32, 0).unwrap();
        assert_eq!(r.found, 0);
        assert!(host.bit_scan(ScanDirection::Forward, Width::Bits32, 1 << 40).is_err());
    }
}
