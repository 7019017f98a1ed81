//! Capability interface over the processor model under test.
//!
//! The processor is an opaque black box: the harness sees only a fixed
//! signal set and an `eval()` call that settles the model after stimulus
//! changes. [`CoreModel`] captures exactly that surface, so the stepper is
//! polymorphic over any implementer. A hardware model wraps generated RTL
//! simulation code; [`reference::ReferenceModel`] is a pure-software
//! implementation used by the test suite and the CLI.

use crate::common::MemWidth;
use crate::counters::CounterRegs;
use crate::debug::{DebugMemRequest, DebugRequest};

/// Pure-software reference implementation of [`CoreModel`].
pub mod reference;

pub use reference::ReferenceModel;

/// Instruction port response driven into the model.
///
/// Carries the program counter the response was generated for; the model
/// discards responses whose `pc` no longer matches its fetch address
/// (stale after a redirect).
#[derive(Clone, Copy, Debug, Default)]
pub struct InstrResp {
    pub valid: bool,
    pub pc: u32,
    pub data: u32,
}

/// Data port request sampled from the model.
#[derive(Clone, Copy, Debug, Default)]
pub struct DataPortReq {
    pub valid: bool,
    pub addr: u32,
    pub data: u32,
    pub write: bool,
    pub width: u8,
}

impl DataPortReq {
    /// Decoded access width.
    pub fn mem_width(&self) -> MemWidth {
        MemWidth::from_bits(self.width)
    }
}

/// A valid/data pair on a response channel.
#[derive(Clone, Copy, Debug, Default)]
pub struct PortResp {
    pub valid: bool,
    pub data: u32,
}

/// An architectural register write observed at retirement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegWrite {
    pub reg: u8,
    pub data: u32,
}

/// The fixed signal surface of the processor under test.
///
/// Setters correspond to harness-driven input pins; getters sample model
/// outputs as of the last `eval()`. The counter register file is exposed
/// through the [`CounterRegs`] supertrait.
pub trait CoreModel: CounterRegs {
    /// Settles the model after input changes. Called once per phase
    /// transition; all sequential state updates happen on the rising edge
    /// seen on the clock pin.
    fn eval(&mut self);

    /// Final settle before teardown. Default is a no-op.
    fn final_eval(&mut self) {}

    /// Drives the clock pin.
    fn set_clock(&mut self, high: bool);

    /// Drives the reset pin (active high).
    fn set_reset(&mut self, on: bool);

    // Instruction port.

    /// Current fetch program counter.
    fn fetch_pc(&self) -> u32;

    /// Drives the instruction port response.
    fn set_instr_resp(&mut self, resp: InstrResp);

    // Data port.

    /// Samples the model's data port request.
    fn data_req(&self) -> DataPortReq;

    /// Drives the data port ready line.
    fn set_data_ready(&mut self, ready: bool);

    /// Drives the data port response.
    fn set_data_resp(&mut self, resp: PortResp);

    // Debug control plane.

    /// Drives the hart request channel. `None` deasserts `valid`.
    fn set_debug_hart_req(&mut self, hart: u8, req: Option<DebugRequest>);

    /// Ready line of the hart request channel.
    fn debug_hart_ready(&self) -> bool;

    /// Drives the debug memory request channel. `None` deasserts `valid`.
    fn set_debug_mem_req(&mut self, req: Option<DebugMemRequest>);

    /// Ready line of the debug memory request channel.
    fn debug_mem_ready(&self) -> bool;

    /// Samples the debug memory response channel.
    fn debug_mem_resp(&self) -> PortResp;

    /// Drives the harness-side ready for debug memory responses.
    fn set_debug_mem_resp_ready(&mut self, ready: bool);

    /// Samples the debug register response channel.
    fn debug_reg_resp(&self) -> PortResp;

    /// Drives the harness-side ready for debug register responses.
    fn set_debug_reg_resp_ready(&mut self, ready: bool);

    /// Level status: whether the hart is halted. Readable at any time,
    /// independent of the request/response channels.
    fn debug_halted(&self) -> bool;

    // Retirement observation.

    /// Register write retired in the current cycle, if any.
    fn reg_write(&self) -> Option<RegWrite>;
}
