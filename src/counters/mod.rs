//! Hardware performance counter sampling.
//!
//! The model exposes each 64-bit counter as two memory-mapped 32-bit words
//! (low word at the counter's offset, high word four bytes above). This
//! module provides the tear-free read primitive over that register file,
//! the width strategies selectable at configuration time, a tick source for
//! wall-clock-style measurements, and the five-counter bank sampled at the
//! start and stop boundaries of a measured run.

/// Tear-free 64-bit read primitive and width strategies.
pub mod reader;

/// Start/stop snapshot bank over the five hardware counters.
pub mod bank;

pub use bank::{CounterDeltas, CounterSample, PerfCounterBank};
pub use reader::{Counter64Reader, CounterRegs, SplitReader, TimeSource, WideReader};

/// Byte offset of the cycle counter's low word.
pub const OFF_CYCLE: u32 = 0x00;
/// Byte offset of the instructions-retired counter's low word.
pub const OFF_INSTRET: u32 = 0x08;
/// Byte offset of the branches-retired counter's low word.
pub const OFF_BRANCHES: u32 = 0x10;
/// Byte offset of the branch-misprediction counter's low word.
pub const OFF_BRANCH_MISS: u32 = 0x18;
/// Byte offset of the hazard-stall counter's low word.
pub const OFF_HAZARD_STALL: u32 = 0x20;

/// Distance from a counter's low word to its high word.
pub const HI_WORD_OFFSET: u32 = 4;
