//! Tear-free 64-bit counter reads over split 32-bit registers.
//!
//! A counter that lives in two 32-bit words can roll its low word over
//! between the two reads, producing a value that never existed (a torn
//! read). The split strategy reads high, low, high and retries until both
//! high reads agree; the loop terminates because rollovers are rare
//! relative to the read latency.

use crate::counters::HI_WORD_OFFSET;

/// Read access to the model's counter register file.
///
/// Each counter occupies two consecutive 32-bit words: low at the counter's
/// base offset, high one word above. Registers are read-only from the
/// harness's perspective.
pub trait CounterRegs {
    /// Reads the 32-bit counter register at `addr`.
    fn read_reg(&self, addr: u32) -> u32;
}

/// Strategy for assembling a 64-bit counter value from its register pair.
///
/// Two implementations exist and are chosen at configuration time rather
/// than baked into call sites: [`SplitReader`] for targets whose counters
/// update concurrently with sampling, and [`WideReader`] for targets whose
/// counter state is frozen while the harness reads it.
pub trait Counter64Reader {
    /// Reads the 64-bit counter whose low word is at `lo_addr`.
    fn read64(&self, regs: &dyn CounterRegs, lo_addr: u32) -> u64;
}

/// hi/lo/hi sampling with retry on high-word disagreement.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitReader;

impl Counter64Reader for SplitReader {
    fn read64(&self, regs: &dyn CounterRegs, lo_addr: u32) -> u64 {
        let hi_addr = lo_addr + HI_WORD_OFFSET;
        loop {
            let hi1 = regs.read_reg(hi_addr);
            let lo = regs.read_reg(lo_addr);
            let hi2 = regs.read_reg(hi_addr);
            if hi1 == hi2 {
                return (u64::from(hi2) << 32) | u64::from(lo);
            }
        }
    }
}

/// Single paired read, no retry.
///
/// Valid when the counter cannot advance between the two word reads, e.g.
/// a software model that only mutates state inside `eval()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WideReader;

impl Counter64Reader for WideReader {
    fn read64(&self, regs: &dyn CounterRegs, lo_addr: u32) -> u64 {
        let lo = regs.read_reg(lo_addr);
        let hi = regs.read_reg(lo_addr + HI_WORD_OFFSET);
        (u64::from(hi) << 32) | u64::from(lo)
    }
}

/// Abstract tick source built on the cycle counter register pair.
///
/// Ticks are only meaningful relative to the configured ticks-per-second
/// constant; conversion to seconds uses integer arithmetic so the path
/// works on targets without floating point.
pub struct TimeSource {
    reader: Box<dyn Counter64Reader>,
    cycle_lo_addr: u32,
    ticks_per_sec: u64,
}

impl TimeSource {
    /// Creates a tick source sampling the cycle counter at `cycle_lo_addr`.
    pub fn new(reader: Box<dyn Counter64Reader>, cycle_lo_addr: u32, ticks_per_sec: u64) -> Self {
        Self {
            reader,
            cycle_lo_addr,
            ticks_per_sec,
        }
    }

    /// Samples the current tick count.
    pub fn get_time(&self, regs: &dyn CounterRegs) -> u64 {
        self.reader.read64(regs, self.cycle_lo_addr)
    }

    /// Converts a tick delta to whole seconds (integer division).
    pub fn time_in_secs(&self, ticks: u64) -> u64 {
        if self.ticks_per_sec == 0 {
            return 0;
        }
        ticks / self.ticks_per_sec
    }
}
