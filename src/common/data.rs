//! Shared data classifications for the harness.
//!
//! Defines the access width encoding used on both the normal data port and
//! the debug memory channel, the two-phase clock, and the outcome reported
//! at the end of a run.

use serde::Serialize;

/// Width of a memory access on the data port or debug memory channel.
///
/// The on-wire encoding matches the model's `reqWidth` field: 0 for byte,
/// 1 for half-word, 2 for word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemWidth {
    /// 8-bit access.
    Byte,
    /// 16-bit access.
    Half,
    /// 32-bit access.
    Word,
}

impl MemWidth {
    /// Returns the wire encoding of this width.
    pub fn to_bits(self) -> u8 {
        match self {
            MemWidth::Byte => 0,
            MemWidth::Half => 1,
            MemWidth::Word => 2,
        }
    }

    /// Decodes a wire width field. Unknown encodings fall back to `Word`.
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            0 => MemWidth::Byte,
            1 => MemWidth::Half,
            _ => MemWidth::Word,
        }
    }

    /// Number of bytes moved by an access of this width.
    pub fn bytes(self) -> u32 {
        match self {
            MemWidth::Byte => 1,
            MemWidth::Half => 2,
            MemWidth::Word => 4,
        }
    }
}

/// The two phases of the simulation clock.
///
/// Phases strictly alternate; one stepper iteration is exactly one phase
/// transition and no phase is ever skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockPhase {
    /// Clock line low. The next transition is a rising edge.
    Low,
    /// Clock line high. The next transition is a falling edge.
    High,
}

impl ClockPhase {
    /// Returns the opposite phase.
    pub fn toggled(self) -> Self {
        match self {
            ClockPhase::Low => ClockPhase::High,
            ClockPhase::High => ClockPhase::Low,
        }
    }
}

/// Why a run failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FailReason {
    /// The maximum-cycle watchdog expired before the success predicate held.
    Timeout,
    /// The model halted itself (breakpoint or watchpoint) with the success
    /// predicate still false.
    AssertionUnmet,
}

/// Final outcome of a simulation run, produced exactly once per run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The success predicate became true before the cycle limit.
    Pass,
    /// The run ended without the predicate becoming true.
    Fail(FailReason),
}

impl Outcome {
    /// Returns `true` for `Pass`.
    pub fn is_pass(self) -> bool {
        matches!(self, Outcome::Pass)
    }
}
