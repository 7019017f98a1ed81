//! Performance counter bank.
//!
//! Samples the five hardware counters at the start and stop boundaries of a
//! measured region and reports the deltas. Each counter is read through the
//! configured [`Counter64Reader`] strategy, so every individual counter is
//! tear-free, but the five counters are not mutually atomic: they are read
//! in a fixed order and the model may advance between reads. The bank is a
//! plain value owned by the caller; there is no process-wide state.

use serde::Serialize;

use crate::counters::reader::{Counter64Reader, CounterRegs};
use crate::counters::{OFF_BRANCHES, OFF_BRANCH_MISS, OFF_CYCLE, OFF_HAZARD_STALL, OFF_INSTRET};

/// One snapshot of the five counters, taken in declaration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterSample {
    pub cycle: u64,
    pub instret: u64,
    pub branches: u64,
    pub branch_misses: u64,
    pub hazard_stalls: u64,
}

/// Deltas between the stop and start snapshots of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CounterDeltas {
    pub cycle: u64,
    pub instret: u64,
    pub branches: u64,
    pub branch_misses: u64,
    pub hazard_stalls: u64,
}

/// Start/stop sampler over the five counter register pairs.
pub struct PerfCounterBank {
    reader: Box<dyn Counter64Reader>,
    base: u32,
    start: CounterSample,
    stop: CounterSample,
}

impl PerfCounterBank {
    /// Creates a bank reading counters at `base` plus the fixed offsets.
    pub fn new(reader: Box<dyn Counter64Reader>, base: u32) -> Self {
        Self {
            reader,
            base,
            start: CounterSample::default(),
            stop: CounterSample::default(),
        }
    }

    fn sample(&self, regs: &dyn CounterRegs) -> CounterSample {
        // Fixed sample order: cycle, instret, branches, misses, stalls.
        CounterSample {
            cycle: self.reader.read64(regs, self.base + OFF_CYCLE),
            instret: self.reader.read64(regs, self.base + OFF_INSTRET),
            branches: self.reader.read64(regs, self.base + OFF_BRANCHES),
            branch_misses: self.reader.read64(regs, self.base + OFF_BRANCH_MISS),
            hazard_stalls: self.reader.read64(regs, self.base + OFF_HAZARD_STALL),
        }
    }

    /// Takes the start-of-run snapshot.
    pub fn start(&mut self, regs: &dyn CounterRegs) {
        self.start = self.sample(regs);
    }

    /// Takes the end-of-run snapshot.
    pub fn stop(&mut self, regs: &dyn CounterRegs) {
        self.stop = self.sample(regs);
    }

    /// Reports the five stop-minus-start deltas.
    ///
    /// Counters never decrease within a run, so saturating subtraction only
    /// guards against a bank that was never started.
    pub fn report(&self) -> CounterDeltas {
        CounterDeltas {
            cycle: self.stop.cycle.saturating_sub(self.start.cycle),
            instret: self.stop.instret.saturating_sub(self.start.instret),
            branches: self.stop.branches.saturating_sub(self.start.branches),
            branch_misses: self.stop.branch_misses.saturating_sub(self.start.branch_misses),
            hazard_stalls: self.stop.hazard_stalls.saturating_sub(self.start.hazard_stalls),
        }
    }
}
