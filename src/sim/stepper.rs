//! Clock-edge-driven stepping loop.
//!
//! One stepper iteration is one clock phase transition. On the rising edge
//! the stepper applies all pending stimulus — the instruction response for
//! the current fetch address, data port service, the in-flight debug
//! transfer — and evaluates the model. On the falling edge it evaluates
//! again and, when tracing is enabled, forwards a sample to the waveform
//! sink. The sink write is synchronous and in cycle order: every dump
//! corresponds to the state immediately after the preceding evaluation.
//!
//! A run ends when the caller's success predicate over the observed
//! signals becomes true (`Pass`), when the model halts itself with the
//! predicate still false (`Fail(AssertionUnmet)`), or when the
//! maximum-cycle watchdog expires (`Fail(Timeout)`). The watchdog is the
//! only way to bound a run; there is no mid-run cancellation.

use std::path::Path;

use crate::common::{ClockPhase, FailReason, HarnessError, MemWidth, Outcome};
use crate::debug::{DebugDriver, DebugMemRequest, DebugRequest};
use crate::mem::MemoryStub;
use crate::model::CoreModel;
use crate::sim::wave::{SignalFrame, WaveSink};

/// Attempt bound for a single debug transfer or response wait.
const DEBUG_ATTEMPTS: u32 = 32;

/// Extra cycles stepped after a self-halt so the pipeline settles before
/// the predicate gets its final look.
const HALT_SETTLE_CYCLES: u32 = 4;

/// Stepper tuning knobs, stable across a run.
#[derive(Clone, Copy, Debug)]
pub struct StepperOptions {
    /// Maximum-cycle watchdog for `run`.
    pub max_cycles: u64,
    /// Timestamp delta per half cycle.
    pub timestep: u64,
    /// Cycles to hold reset during `reset()`.
    pub reset_cycles: u32,
}

impl Default for StepperOptions {
    fn default() -> Self {
        Self {
            max_cycles: 10_000,
            timestep: 5,
            reset_cycles: 5,
        }
    }
}

/// Drives a [`CoreModel`] through clock edges against the memory stub and
/// debug control plane.
pub struct ModelStepper<M: CoreModel> {
    model: M,
    mem: MemoryStub,
    debug: DebugDriver,
    sink: Option<Box<dyn WaveSink>>,
    phase: ClockPhase,
    timestamp: u64,
    cycle: u64,
    opts: StepperOptions,
}

impl<M: CoreModel> ModelStepper<M> {
    /// Creates a stepper and drives the model's static input pins to safe
    /// defaults.
    pub fn new(mut model: M, mem: MemoryStub, opts: StepperOptions) -> Self {
        model.set_clock(false);
        model.set_reset(false);
        model.set_data_ready(true);
        model.set_debug_mem_resp_ready(true);
        model.set_debug_reg_resp_ready(true);
        Self {
            model,
            mem,
            debug: DebugDriver::new(0),
            sink: None,
            phase: ClockPhase::Low,
            timestamp: 0,
            cycle: 0,
            opts,
        }
    }

    /// Borrows the model, e.g. for counter sampling.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutably borrows the memory stub, e.g. for program loading.
    pub fn mem_mut(&mut self) -> &mut MemoryStub {
        &mut self.mem
    }

    /// Borrows the memory stub.
    pub fn mem(&self) -> &MemoryStub {
        &self.mem
    }

    /// Logical cycles stepped since creation.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Installs and opens a waveform sink, closing any previous one first.
    pub fn open_wave(
        &mut self,
        mut sink: Box<dyn WaveSink>,
        path: &Path,
    ) -> Result<(), HarnessError> {
        if let Some(mut old) = self.sink.take() {
            old.close()?;
        }
        sink.open(path)?;
        self.sink = Some(sink);
        Ok(())
    }

    /// Closes the waveform sink. Safe to call repeatedly.
    pub fn close_wave(&mut self) -> Result<(), HarnessError> {
        if let Some(sink) = self.sink.as_mut() {
            sink.close()?;
        }
        Ok(())
    }

    /// Samples the observable signal set after the latest evaluation.
    pub fn frame(&self) -> SignalFrame {
        SignalFrame {
            cycle: self.cycle,
            clock: matches!(self.phase, ClockPhase::High),
            pc: self.model.fetch_pc(),
            halted: self.model.debug_halted(),
            reg_write: self.model.reg_write(),
        }
    }

    /// Advances the clock by one phase transition.
    ///
    /// Phase transitions are total and unconditional; no phase is ever
    /// skipped.
    pub fn half_step(&mut self) {
        match self.phase {
            ClockPhase::Low => {
                // Rising edge: stimulus first, then evaluate.
                let pc = self.model.fetch_pc();
                let iresp = self.mem.instr_resp(pc);
                self.model.set_instr_resp(iresp);

                let dreq = self.model.data_req();
                let dresp = self.mem.service_data(&dreq);
                self.model.set_data_ready(true);
                self.model.set_data_resp(dresp);

                self.debug.drive(&mut self.model);

                self.model.set_clock(true);
                self.model.eval();
                self.cycle += 1;
            }
            ClockPhase::High => {
                self.model.set_clock(false);
                self.model.eval();
                if let Some(sink) = self.sink.as_mut() {
                    let frame = SignalFrame {
                        cycle: self.cycle,
                        clock: false,
                        pc: self.model.fetch_pc(),
                        halted: self.model.debug_halted(),
                        reg_write: self.model.reg_write(),
                    };
                    // Dump failures end tracing rather than the run.
                    if sink.dump(self.timestamp, &frame).is_err() {
                        let _ = sink.close();
                        self.sink = None;
                    }
                }
            }
        }
        self.phase = self.phase.toggled();
        self.timestamp += self.opts.timestep;
    }

    /// Advances one full logical cycle (two phase transitions).
    pub fn step_cycle(&mut self) {
        self.half_step();
        self.half_step();
    }

    /// Holds reset for the configured number of cycles, then releases it.
    ///
    /// No cycle is stepped after release, so the first post-reset
    /// instruction executes inside the caller's next step (and its
    /// retirement is visible to a `run` predicate).
    pub fn reset(&mut self) {
        self.model.set_reset(true);
        for _ in 0..self.opts.reset_cycles {
            self.step_cycle();
        }
        self.model.set_reset(false);
    }

    /// Runs until the predicate holds, the model halts, or the watchdog
    /// expires.
    pub fn run(&mut self, mut predicate: impl FnMut(&SignalFrame) -> bool) -> Outcome {
        for _ in 0..self.opts.max_cycles {
            self.step_cycle();
            if predicate(&self.frame()) {
                return Outcome::Pass;
            }
            if self.model.debug_halted() {
                // Breakpoint or watchpoint fired; let the pipeline drain
                // before giving the predicate its final look.
                for _ in 0..HALT_SETTLE_CYCLES {
                    self.step_cycle();
                    if predicate(&self.frame()) {
                        return Outcome::Pass;
                    }
                }
                return Outcome::Fail(FailReason::AssertionUnmet);
            }
        }
        Outcome::Fail(FailReason::Timeout)
    }

    /// Completes one hart-channel transfer, holding `valid` until `ready`.
    pub fn debug_transfer(&mut self, req: DebugRequest) -> Result<(), HarnessError> {
        self.debug.issue_hart(req);
        for _ in 0..DEBUG_ATTEMPTS {
            self.step_cycle();
            if !self.debug.busy() {
                return Ok(());
            }
        }
        Err(HarnessError::DebugTimeout("hart request transfer"))
    }

    /// Asserts or releases the hart's halt line.
    pub fn halt(&mut self, on: bool) -> Result<(), HarnessError> {
        self.debug_transfer(DebugRequest::Halt(on))
    }

    /// Redirects fetch to `pc`.
    pub fn set_pc(&mut self, pc: u32) -> Result<(), HarnessError> {
        self.debug_transfer(DebugRequest::SetPc { pc })
    }

    /// Arms a breakpoint at `pc`.
    pub fn set_breakpoint(&mut self, pc: u32) -> Result<(), HarnessError> {
        self.debug_transfer(DebugRequest::Breakpoint { pc })
    }

    /// Arms a watchpoint on stores to `addr`.
    pub fn set_watchpoint(&mut self, addr: u32) -> Result<(), HarnessError> {
        self.debug_transfer(DebugRequest::Watchpoint { addr })
    }

    /// Writes a general-purpose register through the debug channel.
    pub fn debug_write_reg(&mut self, reg: u8, data: u32) -> Result<(), HarnessError> {
        self.debug_transfer(DebugRequest::RegisterAccess {
            reg,
            write: true,
            data,
        })?;
        self.wait_reg_resp().map(|_| ())
    }

    /// Reads a general-purpose register through the debug channel.
    pub fn debug_read_reg(&mut self, reg: u8) -> Result<u32, HarnessError> {
        self.debug_transfer(DebugRequest::RegisterAccess {
            reg,
            write: false,
            data: 0,
        })?;
        self.wait_reg_resp()
    }

    fn wait_reg_resp(&mut self) -> Result<u32, HarnessError> {
        for _ in 0..DEBUG_ATTEMPTS {
            let resp = self.model.debug_reg_resp();
            if resp.valid {
                return Ok(resp.data);
            }
            self.step_cycle();
        }
        Err(HarnessError::DebugTimeout("register response"))
    }

    /// Captures the full architectural register file through the debug
    /// channel. The hart should be halted first.
    pub fn capture_registers(&mut self) -> Result<[u32; 32], HarnessError> {
        let mut regs = [0u32; 32];
        for (idx, slot) in regs.iter_mut().enumerate() {
            *slot = self.debug_read_reg(idx as u8)?;
        }
        Ok(regs)
    }

    /// Writes memory through the debug path (no architectural side
    /// effects beyond the memory image itself).
    pub fn debug_write_mem(
        &mut self,
        addr: u32,
        data: u32,
        width: MemWidth,
    ) -> Result<(), HarnessError> {
        self.debug_mem_transfer(DebugMemRequest {
            addr,
            data,
            write: true,
            width,
        })
        .map(|_| ())
    }

    /// Reads memory through the debug path.
    pub fn debug_read_mem(&mut self, addr: u32, width: MemWidth) -> Result<u32, HarnessError> {
        self.debug_mem_transfer(DebugMemRequest {
            addr,
            data: 0,
            write: false,
            width,
        })
    }

    fn debug_mem_transfer(&mut self, req: DebugMemRequest) -> Result<u32, HarnessError> {
        self.debug.issue_mem(req);
        let mut transferred = false;
        for _ in 0..DEBUG_ATTEMPTS {
            if transferred {
                let resp = self.model.debug_mem_resp();
                if resp.valid {
                    return Ok(resp.data);
                }
            }
            self.step_cycle();
            if !self.debug.busy() {
                transferred = true;
            }
        }
        Err(HarnessError::DebugTimeout("memory response"))
    }

    /// Seeds data memory word by word through the debug memory channel,
    /// byte-wise for a trailing partial word.
    pub fn upload_data(&mut self, start_addr: u32, data: &[u8]) -> Result<(), HarnessError> {
        let mut chunks = data.chunks_exact(4);
        let mut addr = start_addr;
        for chunk in chunks.by_ref() {
            let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            self.debug_write_mem(addr, word, MemWidth::Word)?;
            addr += 4;
        }
        for &byte in chunks.remainder() {
            self.debug_write_mem(addr, u32::from(byte), MemWidth::Byte)?;
            addr += 1;
        }
        Ok(())
    }
}

impl<M: CoreModel> Drop for ModelStepper<M> {
    fn drop(&mut self) {
        // Sink teardown happens regardless of how the run ended.
        if let Some(sink) = self.sink.as_mut() {
            let _ = sink.close();
        }
        self.model.final_eval();
    }
}
