//! Run report formatting.
//!
//! Collects the outcome and counter deltas of a run into a single report,
//! printed as a human-readable table or emitted as JSON for downstream
//! tooling.

use serde::Serialize;

use crate::common::{FailReason, Outcome};
use crate::counters::CounterDeltas;

/// Everything reported once per run: outcome plus the five counter deltas
/// and the tick-derived wall estimate.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct RunReport {
    pub outcome: Outcome,
    pub deltas: CounterDeltas,
    /// Whole seconds of simulated time, from the cycle delta and the
    /// configured ticks-per-second (integer arithmetic).
    pub sim_seconds: u64,
}

impl RunReport {
    /// Builds a report from a finished run.
    pub fn new(outcome: Outcome, deltas: CounterDeltas, ticks_per_sec: u64) -> Self {
        let sim_seconds = if ticks_per_sec == 0 {
            0
        } else {
            deltas.cycle / ticks_per_sec
        };
        Self {
            outcome,
            deltas,
            sim_seconds,
        }
    }

    /// Prints a formatted summary of the run.
    pub fn print(&self) {
        let cyc = if self.deltas.cycle == 0 {
            1
        } else {
            self.deltas.cycle
        };
        let instr = if self.deltas.instret == 0 {
            1
        } else {
            self.deltas.instret
        };
        let ipc = self.deltas.instret as f64 / cyc as f64;
        let cpi = cyc as f64 / instr as f64;

        println!("\n==========================================================");
        println!("TESTBENCH RUN STATISTICS");
        println!("==========================================================");
        let outcome = match self.outcome {
            Outcome::Pass => "PASS",
            Outcome::Fail(FailReason::Timeout) => "FAIL (timeout)",
            Outcome::Fail(FailReason::AssertionUnmet) => "FAIL (assertion unmet)",
        };
        println!("outcome                  {}", outcome);
        println!("sim_seconds              {} s", self.sim_seconds);
        println!("----------------------------------------------------------");
        println!("COUNTER DELTAS");
        println!("  cycles                 {}", self.deltas.cycle);
        println!("  instret                {}", self.deltas.instret);
        println!("  branches               {}", self.deltas.branches);
        println!("  branch_misses          {}", self.deltas.branch_misses);
        println!("  hazard_stalls          {}", self.deltas.hazard_stalls);
        println!("----------------------------------------------------------");
        println!("DERIVED");
        println!("  ipc                    {:.4}", ipc);
        println!("  cpi                    {:.4}", cpi);
        let bp_total = self.deltas.branches;
        let bp_acc = if bp_total > 0 {
            100.0 * (1.0 - (self.deltas.branch_misses as f64 / bp_total as f64))
        } else {
            0.0
        };
        println!("  bp.accuracy            {:.2}%", bp_acc);
        println!(
            "  stall_ratio            {:.2}%",
            (self.deltas.hazard_stalls as f64 / cyc as f64) * 100.0
        );
        println!("==========================================================");
    }

    /// Serializes the report as a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
