//! Atomic primitive contract verifier.
//!
//! A [`Script`] is a chain of read-modify-write steps against one shared cell.
//! Each step states the value the primitive must return and the value the cell
//! must hold afterwards. The verifier checks both, then re-anchors the cell to
//! the scripted value so one divergence does not cascade into every later step.
//!
//! Return conventions differ per primitive and are part of the contract:
//! increment/decrement/add return the resulting value; exchange-add, exchange,
//! compare-exchange, or, and, xor return the prior value; bit tests return the
//! prior state of the addressed bit.

use std::fmt;
use std::sync::atomic::{AtomicI32, AtomicPtr, Ordering};

use thiserror::Error;

use crate::oracle::{FailureKind, NoticeKind, Oracle};

#[cfg(target_has_atomic = "64")]
use std::sync::atomic::AtomicI64;

/// Cell width a primitive operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    Bits32,
    Bits64,
    Pointer,
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bits32 => "32-bit",
            Self::Bits64 => "64-bit",
            Self::Pointer => "pointer",
        })
    }
}

/// Whether a primitive is required to be atomic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Interlocked,
    /// Non-interlocked variant (`_bittest*`); may be a plain read-modify-write.
    Plain,
}

/// What a primitive hands back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnConvention {
    PriorValue,
    ResultingValue,
    /// 0 or 1: the addressed bit before the operation.
    PriorBit,
}

/// Values a fixture cell can hold.
pub trait CellValue: Copy + PartialEq + fmt::Debug {
    const BITS: u32;

    /// Zero-extended bit pattern.
    fn to_bits(self) -> u64;

    /// Diagnostic rendering: decimal for integers, address for pointers.
    fn render(self) -> String;
}

impl CellValue for i32 {
    const BITS: u32 = 32;

    fn to_bits(self) -> u64 {
        u64::from(self as u32)
    }

    fn render(self) -> String {
        self.to_string()
    }
}

impl CellValue for i64 {
    const BITS: u32 = 64;

    fn to_bits(self) -> u64 {
        self as u64
    }

    fn render(self) -> String {
        self.to_string()
    }
}

impl CellValue for *mut u8 {
    const BITS: u32 = usize::BITS;

    fn to_bits(self) -> u64 {
        self.addr() as u64
    }

    fn render(self) -> String {
        format!("{self:p}")
    }
}

/// A single shared memory cell used as a fixture.
pub trait AtomicCell {
    type Value: CellValue;
    const WIDTH: Width;

    fn with_value(value: Self::Value) -> Self;
    fn read(&self) -> Self::Value;
    fn write(&self, value: Self::Value);
}

impl AtomicCell for AtomicI32 {
    type Value = i32;
    const WIDTH: Width = Width::Bits32;

    fn with_value(value: i32) -> Self {
        AtomicI32::new(value)
    }

    fn read(&self) -> i32 {
        self.load(Ordering::SeqCst)
    }

    fn write(&self, value: i32) {
        self.store(value, Ordering::SeqCst);
    }
}

#[cfg(target_has_atomic = "64")]
impl AtomicCell for AtomicI64 {
    type Value = i64;
    const WIDTH: Width = Width::Bits64;

    fn with_value(value: i64) -> Self {
        AtomicI64::new(value)
    }

    fn read(&self) -> i64 {
        self.load(Ordering::SeqCst)
    }

    fn write(&self, value: i64) {
        self.store(value, Ordering::SeqCst);
    }
}

impl AtomicCell for AtomicPtr<u8> {
    type Value = *mut u8;
    const WIDTH: Width = Width::Pointer;

    fn with_value(value: *mut u8) -> Self {
        AtomicPtr::new(value)
    }

    fn read(&self) -> *mut u8 {
        self.load(Ordering::SeqCst)
    }

    fn write(&self, value: *mut u8) {
        self.store(value, Ordering::SeqCst);
    }
}

/// A read-modify-write primitive and its operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive<V> {
    BitTestAndSet(u32),
    BitTestAndReset(u32),
    BitTestAndComplement(u32),
    /// Reads the bit without modifying the cell.
    BitTest(u32),
    Increment,
    Decrement,
    Add(V),
    ExchangeAdd(V),
    Exchange(V),
    CompareExchange { exchange: V, comparand: V },
    Or(V),
    And(V),
    Xor(V),
}

impl<V: CellValue> Primitive<V> {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BitTestAndSet(_) => "BitTestAndSet",
            Self::BitTestAndReset(_) => "BitTestAndReset",
            Self::BitTestAndComplement(_) => "BitTestAndComplement",
            Self::BitTest(_) => "BitTest",
            Self::Increment => "Increment",
            Self::Decrement => "Decrement",
            Self::Add(_) => "Add",
            Self::ExchangeAdd(_) => "ExchangeAdd",
            Self::Exchange(_) => "Exchange",
            Self::CompareExchange { .. } => "CompareExchange",
            Self::Or(_) => "Or",
            Self::And(_) => "And",
            Self::Xor(_) => "Xor",
        }
    }

    #[must_use]
    pub const fn returns(&self) -> ReturnConvention {
        match self {
            Self::BitTestAndSet(_)
            | Self::BitTestAndReset(_)
            | Self::BitTestAndComplement(_)
            | Self::BitTest(_) => ReturnConvention::PriorBit,
            Self::Increment | Self::Decrement | Self::Add(_) => ReturnConvention::ResultingValue,
            Self::ExchangeAdd(_)
            | Self::Exchange(_)
            | Self::CompareExchange { .. }
            | Self::Or(_)
            | Self::And(_)
            | Self::Xor(_) => ReturnConvention::PriorValue,
        }
    }

    #[must_use]
    pub const fn bit(&self) -> Option<u32> {
        match self {
            Self::BitTestAndSet(bit)
            | Self::BitTestAndReset(bit)
            | Self::BitTestAndComplement(bit)
            | Self::BitTest(bit) => Some(*bit),
            _ => None,
        }
    }

    /// Call-site rendering for diagnostics, e.g. `InterlockedAdd64(&cell, 7)`.
    #[must_use]
    pub fn describe(&self, width: Width, access: Access) -> String {
        let prefix = match access {
            Access::Interlocked => "Interlocked",
            Access::Plain => "_",
        };
        let suffix = match width {
            Width::Bits32 => "",
            Width::Bits64 => "64",
            Width::Pointer => "Pointer",
        };
        let operands = match self {
            Self::BitTestAndSet(bit)
            | Self::BitTestAndReset(bit)
            | Self::BitTestAndComplement(bit)
            | Self::BitTest(bit) => format!(", {bit}"),
            Self::Increment | Self::Decrement => String::new(),
            Self::Add(v) | Self::ExchangeAdd(v) | Self::Exchange(v) | Self::Or(v) | Self::And(v) | Self::Xor(v) => {
                format!(", {}", v.render())
            }
            Self::CompareExchange {
                exchange,
                comparand,
            } => format!(", {}, {}", exchange.render(), comparand.render()),
        };
        format!("{prefix}{}{suffix}(&cell{operands})", self.name())
    }
}

/// One scripted step: the primitive, the cell value afterwards, and the value
/// the primitive returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step<V> {
    pub access: Access,
    pub primitive: Primitive<V>,
    pub cell_after: V,
    pub returns: V,
}

/// A primitive that the library under test does not provide at this width.
/// Verification of the containing script is skipped, not failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{primitive} is not provided for {width} cells")]
pub struct Unsupported {
    pub primitive: &'static str,
    pub width: Width,
}

/// A script whose hand-tracked expectations contradict themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("{label} step {step}: bit {bit} out of range for a {bits}-bit cell")]
    BitOutOfRange {
        label: &'static str,
        step: usize,
        bit: u32,
        bits: u32,
    },
    #[error("{label} step {step}: {primitive} must return {expected}, script says {scripted}")]
    Return {
        label: &'static str,
        step: usize,
        primitive: &'static str,
        expected: String,
        scripted: String,
    },
    #[error("{label} step {step}: {primitive} leaves {expected}, script says {scripted}")]
    CellAfter {
        label: &'static str,
        step: usize,
        primitive: &'static str,
        expected: String,
        scripted: String,
    },
}

/// Ordered steps over one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Script<V> {
    pub label: &'static str,
    pub initial: V,
    pub steps: Vec<Step<V>>,
}

impl<V: CellValue> Script<V> {
    #[must_use]
    pub fn new(label: &'static str, initial: V) -> Self {
        Self {
            label,
            initial,
            steps: Vec::new(),
        }
    }

    /// Append an interlocked step.
    #[must_use]
    pub fn then(self, primitive: Primitive<V>, cell_after: V, returns: V) -> Self {
        self.push(Access::Interlocked, primitive, cell_after, returns)
    }

    /// Append a non-interlocked step.
    #[must_use]
    pub fn then_plain(self, primitive: Primitive<V>, cell_after: V, returns: V) -> Self {
        self.push(Access::Plain, primitive, cell_after, returns)
    }

    fn push(mut self, access: Access, primitive: Primitive<V>, cell_after: V, returns: V) -> Self {
        self.steps.push(Step {
            access,
            primitive,
            cell_after,
            returns,
        });
        self
    }

    /// Scripted value of the cell after the last step.
    #[must_use]
    pub fn final_value(&self) -> V {
        self.steps.last().map_or(self.initial, |s| s.cell_after)
    }

    /// Check the script against the return conventions and bit arithmetic of
    /// each primitive. Operates on bit patterns only; the primitive under test
    /// is never consulted.
    pub fn validate(&self) -> Result<(), ScriptError> {
        let mask = if V::BITS >= 64 {
            u64::MAX
        } else {
            (1_u64 << V::BITS) - 1
        };
        let mut prior = self.initial;
        for (index, step) in self.steps.iter().enumerate() {
            let p = prior.to_bits();
            let after = step.cell_after.to_bits();
            let ret = step.returns.to_bits();
            let name = step.primitive.name();

            let expected_after = match step.primitive {
                Primitive::BitTestAndSet(bit)
                | Primitive::BitTestAndReset(bit)
                | Primitive::BitTestAndComplement(bit)
                | Primitive::BitTest(bit) => {
                    if bit >= V::BITS {
                        return Err(ScriptError::BitOutOfRange {
                            label: self.label,
                            step: index,
                            bit,
                            bits: V::BITS,
                        });
                    }
                    let m = 1_u64 << bit;
                    match step.primitive {
                        Primitive::BitTestAndSet(_) => p | m,
                        Primitive::BitTestAndReset(_) => p & !m,
                        Primitive::BitTestAndComplement(_) => p ^ m,
                        _ => p,
                    }
                }
                Primitive::Increment => p.wrapping_add(1) & mask,
                Primitive::Decrement => p.wrapping_add(mask) & mask,
                Primitive::Add(v) | Primitive::ExchangeAdd(v) => p.wrapping_add(v.to_bits()) & mask,
                Primitive::Exchange(v) => v.to_bits(),
                Primitive::CompareExchange {
                    exchange,
                    comparand,
                } => {
                    if p == comparand.to_bits() {
                        exchange.to_bits()
                    } else {
                        p
                    }
                }
                Primitive::Or(v) => p | v.to_bits(),
                Primitive::And(v) => p & v.to_bits(),
                Primitive::Xor(v) => p ^ v.to_bits(),
            };
            if after != expected_after {
                return Err(ScriptError::CellAfter {
                    label: self.label,
                    step: index,
                    primitive: name,
                    expected: format!("{expected_after:#x}"),
                    scripted: format!("{after:#x}"),
                });
            }

            let expected_ret = match (step.primitive.returns(), step.primitive.bit()) {
                (ReturnConvention::PriorBit, Some(bit)) => (p >> bit) & 1,
                (ReturnConvention::ResultingValue, _) => after,
                _ => p,
            };
            if ret != expected_ret {
                return Err(ScriptError::Return {
                    label: self.label,
                    step: index,
                    primitive: name,
                    expected: format!("{expected_ret:#x}"),
                    scripted: format!("{ret:#x}"),
                });
            }
            prior = step.cell_after;
        }
        Ok(())
    }
}

/// The library under test's read-modify-write primitives for cell type `C`.
pub trait Interlocked<C: AtomicCell> {
    fn apply(
        &self,
        cell: &C,
        access: Access,
        primitive: Primitive<C::Value>,
    ) -> Result<C::Value, Unsupported>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanDirection {
    /// Lowest set bit.
    Forward,
    /// Highest set bit.
    Reverse,
}

/// Raw bit-scan result: `found` is the returned flag, `index` the
/// out-parameter (unspecified when nothing is found).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanResult {
    pub found: u8,
    pub index: u32,
}

/// The library under test's bit-scan primitives.
pub trait BitScan {
    fn bit_scan(&self, direction: ScanDirection, width: Width, mask: u64) -> Result<ScanResult, Unsupported>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStep {
    pub direction: ScanDirection,
    pub mask: u64,
    /// Expected index; `None` when no bit is set.
    pub index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanScript {
    pub label: &'static str,
    pub width: Width,
    pub steps: Vec<ScanStep>,
}

impl ScanScript {
    #[must_use]
    pub fn new(label: &'static str, width: Width) -> Self {
        Self {
            label,
            width,
            steps: Vec::new(),
        }
    }

    #[must_use]
    pub fn forward(self, mask: u64, index: Option<u32>) -> Self {
        self.push(ScanDirection::Forward, mask, index)
    }

    #[must_use]
    pub fn reverse(self, mask: u64, index: Option<u32>) -> Self {
        self.push(ScanDirection::Reverse, mask, index)
    }

    fn push(mut self, direction: ScanDirection, mask: u64, index: Option<u32>) -> Self {
        self.steps.push(ScanStep {
            direction,
            mask,
            index,
        });
        self
    }
}

/// How far a script got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOutcome {
    Completed { steps: usize },
    Skipped { completed: usize, reason: Unsupported },
}

impl ScriptOutcome {
    #[must_use]
    pub const fn skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

fn skip_message(label: &str, completed: usize, total: usize, reason: Unsupported) -> String {
    format!("{label}: {reason}; skipped {} of {total} steps", total - completed)
}

/// Run `script` against `library` on a fresh cell, checking every step's
/// returned value and cell-after value.
#[track_caller]
pub fn verify_script<C, L>(oracle: &mut Oracle, library: &L, script: &Script<C::Value>) -> ScriptOutcome
where
    C: AtomicCell,
    L: Interlocked<C> + ?Sized,
{
    let cell = C::with_value(script.initial);
    for (index, step) in script.steps.iter().enumerate() {
        let call = step.primitive.describe(C::WIDTH, step.access);
        let returned = match library.apply(&cell, step.access, step.primitive) {
            Ok(value) => value,
            Err(reason) => {
                let message = skip_message(script.label, index, script.steps.len(), reason);
                oracle.notice(NoticeKind::ScriptSkipped, message);
                return ScriptOutcome::Skipped {
                    completed: index,
                    reason,
                };
            }
        };
        let observed = cell.read();
        oracle.check_with(observed == step.cell_after, FailureKind::AtomicPostcondition, || {
            format!(
                "{}: cell after {call} failed, expected {}, got {}",
                script.label,
                step.cell_after.render(),
                observed.render()
            )
        });
        oracle.check_with(returned == step.returns, FailureKind::AtomicPostcondition, || {
            format!(
                "{}: {call} failed, expected {}, got {}",
                script.label,
                step.returns.render(),
                returned.render()
            )
        });
        cell.write(step.cell_after);
    }
    ScriptOutcome::Completed {
        steps: script.steps.len(),
    }
}

/// Run a bit-scan script. The index is only checked when a bit is expected.
#[track_caller]
pub fn verify_bit_scans<L: BitScan + ?Sized>(oracle: &mut Oracle, library: &L, script: &ScanScript) -> ScriptOutcome {
    for (index, step) in script.steps.iter().enumerate() {
        let name = match (step.direction, script.width) {
            (ScanDirection::Forward, Width::Bits64) => "BitScanForward64",
            (ScanDirection::Forward, _) => "BitScanForward",
            (ScanDirection::Reverse, Width::Bits64) => "BitScanReverse64",
            (ScanDirection::Reverse, _) => "BitScanReverse",
        };
        let result = match library.bit_scan(step.direction, script.width, step.mask) {
            Ok(result) => result,
            Err(reason) => {
                let message = skip_message(script.label, index, script.steps.len(), reason);
                oracle.notice(NoticeKind::ScriptSkipped, message);
                return ScriptOutcome::Skipped {
                    completed: index,
                    reason,
                };
            }
        };
        let found = u8::from(step.index.is_some());
        oracle.check_with(result.found == found, FailureKind::AtomicPostcondition, || {
            format!(
                "{}: {name}(&idx, {:#x}) failed, expected {found}, got {}",
                script.label, step.mask, result.found
            )
        });
        if let Some(expected) = step.index {
            oracle.check_with(result.index == expected, FailureKind::AtomicPostcondition, || {
                format!(
                    "{}: idx after {name}(&idx, {:#x}) failed, expected {expected}, got {}",
                    script.label, step.mask, result.index
                )
            });
        }
    }
    ScriptOutcome::Completed {
        steps: script.steps.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OracleConfig;

    /// Bit test-and-set/reset only; everything else is unsupported.
    struct BitsOnly {
        /// Report the new bit instead of the prior one.
        report_new_bit: bool,
    }

    impl Interlocked<AtomicI32> for BitsOnly {
        fn apply(&self, cell: &AtomicI32, _: Access, primitive: Primitive<i32>) -> Result<i32, Unsupported> {
            let (prior, mask) = match primitive {
                Primitive::BitTestAndSet(bit) => {
                    let m = 1 << bit;
                    (cell.fetch_or(m, Ordering::SeqCst), m)
                }
                Primitive::BitTestAndReset(bit) => {
                    let m = 1 << bit;
                    (cell.fetch_and(!m, Ordering::SeqCst), m)
                }
                other => {
                    return Err(Unsupported {
                        primitive: other.name(),
                        width: Width::Bits32,
                    });
                }
            };
            let source = if self.report_new_bit { cell.load(Ordering::SeqCst) } else { prior };
            Ok(i32::from(source & mask != 0))
        }
    }

    fn bit_sequence() -> Script<i32> {
        Script::new("bit test", 0)
            .then(Primitive::BitTestAndSet(0), 1, 0)
            .then(Primitive::BitTestAndSet(2), 5, 0)
            .then(Primitive::BitTestAndSet(2), 5, 1)
            .then(Primitive::BitTestAndReset(2), 1, 1)
            .then(Primitive::BitTestAndReset(2), 1, 0)
            .then(Primitive::BitTestAndReset(0), 0, 1)
    }

    #[test]
    fn bit_sequence_returns_prior_bits_and_ends_at_zero() {
        let script = bit_sequence();
        assert_eq!(script.validate(), Ok(()));
        let returns: Vec<i32> = script.steps.iter().map(|s| s.returns).collect();
        assert_eq!(returns, [0, 0, 1, 1, 0, 1]);
        assert_eq!(script.final_value(), 0);

        let mut oracle = Oracle::silent(OracleConfig::default());
        let outcome = verify_script::<AtomicI32, _>(&mut oracle, &BitsOnly { report_new_bit: false }, &script);
        assert_eq!(outcome, ScriptOutcome::Completed { steps: 6 });
        assert_eq!(oracle.counter().attempted, 12);
        assert_eq!(oracle.counter().failed, 0);
    }

    #[test]
    fn wrong_return_convention_is_caught() {
        let mut oracle = Oracle::silent(OracleConfig::default());
        verify_script::<AtomicI32, _>(&mut oracle, &BitsOnly { report_new_bit: true }, &bit_sequence());
        // Every step mis-reports except the ones where prior and new bit agree.
        assert_eq!(oracle.counter().failed, 4);
        assert!(oracle
            .failures()
            .iter()
            .all(|f| f.kind == FailureKind::AtomicPostcondition));
    }

    #[test]
    fn missing_primitive_skips_rest_of_script() {
        let script = Script::new("arith", 0)
            .then(Primitive::BitTestAndSet(0), 1, 0)
            .then(Primitive::Increment, 2, 2)
            .then(Primitive::Decrement, 1, 1);
        let mut oracle = Oracle::silent(OracleConfig::default());
        let outcome = verify_script::<AtomicI32, _>(&mut oracle, &BitsOnly { report_new_bit: false }, &script);
        assert!(outcome.skipped());
        assert!(matches!(outcome, ScriptOutcome::Skipped { completed: 1, .. }));
        assert_eq!(oracle.counter().failed, 0);
        let notices = oracle.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::ScriptSkipped);
        assert_eq!(
            notices[0].message,
            "arith: Increment is not provided for 32-bit cells; skipped 2 of 3 steps"
        );
    }

    #[test]
    fn validator_rejects_inconsistent_scripts() {
        let wrong_return = Script::new("inc", 0).then(Primitive::Increment, 1, 0);
        assert!(matches!(wrong_return.validate(), Err(ScriptError::Return { step: 0, .. })));

        let wrong_cell = Script::new("xor", 2).then(Primitive::Xor(2), 2, 2);
        assert!(matches!(wrong_cell.validate(), Err(ScriptError::CellAfter { step: 0, .. })));

        let out_of_range = Script::new("bit", 0).then(Primitive::BitTestAndSet(32), 0, 0);
        assert!(matches!(out_of_range.validate(), Err(ScriptError::BitOutOfRange { bits: 32, .. })));
    }

    #[test]
    fn validator_accepts_prior_value_conventions() {
        let script = Script::new("exchange", 5)
            .then(Primitive::ExchangeAdd(1), 6, 5)
            .then(Primitive::Exchange(2), 2, 6)
            .then(Primitive::CompareExchange { exchange: 7, comparand: 1 }, 2, 2)
            .then(Primitive::CompareExchange { exchange: 5, comparand: 2 }, 5, 2)
            .then(Primitive::Add(-2), 3, 3)
            .then(Primitive::Decrement, 2, 2)
            .then_plain(Primitive::BitTest(1), 2, 1)
            .then_plain(Primitive::BitTestAndComplement(1), 0, 1);
        assert_eq!(script.validate(), Ok(()));
    }

    #[test]
    fn describe_renders_call_site() {
        let p: Primitive<i64> = Primitive::CompareExchange { exchange: 7, comparand: 1 };
        assert_eq!(p.describe(Width::Bits64, Access::Interlocked), "InterlockedCompareExchange64(&cell, 7, 1)");
        let b: Primitive<i32> = Primitive::BitTest(3);
        assert_eq!(b.describe(Width::Bits32, Access::Plain), "_BitTest(&cell, 3)");
    }

    struct TrailingZeros;

    impl BitScan for TrailingZeros {
        fn bit_scan(&self, direction: ScanDirection, width: Width, mask: u64) -> Result<ScanResult, Unsupported> {
            if width != Width::Bits32 {
                return Err(Unsupported {
                    primitive: "BitScan",
                    width,
                });
            }
            let found = u8::from(mask != 0);
            let index = match direction {
                ScanDirection::Forward => mask.trailing_zeros(),
                ScanDirection::Reverse => 63 - mask.leading_zeros().min(63),
            };
            Ok(ScanResult { found, index })
        }
    }

    #[test]
    fn bit_scan_checks_flag_and_index() {
        let script = ScanScript::new("scan", Width::Bits32)
            .forward(0, None)
            .forward(0x8000_0001, Some(0))
            .reverse(0x8000_0001, Some(31));
        let mut oracle = Oracle::silent(OracleConfig::default());
        assert_eq!(
            verify_bit_scans(&mut oracle, &TrailingZeros, &script),
            ScriptOutcome::Completed { steps: 3 }
        );
        assert_eq!(oracle.counter().attempted, 5);
        assert_eq!(oracle.counter().failed, 0);

        let wide = ScanScript::new("scan64", Width::Bits64).forward(1, Some(0));
        assert!(verify_bit_scans(&mut oracle, &TrailingZeros, &wide).skipped());
        assert_eq!(oracle.counter().attempted, 5);
        assert_eq!(oracle.take_notices()[0].message, "scan64: BitScan is not provided for 64-bit cells; skipped 1 of 1 steps");
    }
}
