//! Pure-software reference model.
//!
//! Implements [`CoreModel`] without any generated RTL: a small in-order
//! RV32I core that is cycle-stepped through the same pin interface the
//! hardware model exposes. It exists so the stepper, memory stub, debug
//! driver, and counter bank can be exercised end to end in tests and CLI
//! runs.
//!
//! Microarchitectural fiction, kept deliberately small:
//! * one instruction per cycle, except a single bubble after a
//!   read-after-write dependency on the immediately preceding result
//!   (counted as a hazard stall);
//! * loads wait for the data port response (one request in flight);
//! * branches are statically predicted not-taken, so every taken branch
//!   counts as a misprediction;
//! * all sequential state changes happen on the rising edge of the clock
//!   pin, inside `eval()`.
//!
//! Supported opcodes: ADDI, ADD, SUB, LW, SW, BEQ, BNE. Anything else
//! retires as a no-op.

use crate::common::MemWidth;
use crate::counters::{
    CounterRegs, HI_WORD_OFFSET, OFF_BRANCHES, OFF_BRANCH_MISS, OFF_CYCLE, OFF_HAZARD_STALL,
    OFF_INSTRET,
};
use crate::debug::{DebugMemRequest, DebugRequest};
use crate::model::{CoreModel, DataPortReq, InstrResp, PortResp, RegWrite};

const OPCODE_OP_IMM: u32 = 0x13;
const OPCODE_OP: u32 = 0x33;
const OPCODE_LOAD: u32 = 0x03;
const OPCODE_STORE: u32 = 0x23;
const OPCODE_BRANCH: u32 = 0x63;

#[derive(Clone, Copy, Debug, Default)]
struct Counters {
    cycle: u64,
    instret: u64,
    branches: u64,
    branch_misses: u64,
    hazard_stalls: u64,
}

enum DebugMemState {
    /// Request accepted; drive it onto the data port this edge.
    Issue(DebugMemRequest),
    /// Write is in the stub's hands; respond on the next edge.
    WriteDone(u32),
    /// Read issued; wait for the data port response.
    WaitResp,
}

/// Software stand-in for the processor under test.
pub struct ReferenceModel {
    // Input pins.
    clock: bool,
    prev_clock: bool,
    reset: bool,
    instr_resp: InstrResp,
    data_resp: PortResp,
    hart_req: Option<(u8, DebugRequest)>,
    debug_mem_in: Option<DebugMemRequest>,
    mem_resp_ready: bool,
    reg_resp_ready: bool,

    // Output pins.
    data_req_out: DataPortReq,
    mem_resp_out: PortResp,
    reg_resp_out: PortResp,
    reg_write_out: Option<RegWrite>,

    // Architectural state.
    pc: u32,
    regs: [u32; 32],
    halted: bool,
    breakpoint: Option<u32>,
    watchpoint: Option<u32>,

    // Micro state.
    busy_rd: Option<u8>,
    load_wait: Option<u8>,
    debug_mem: Option<DebugMemState>,
    counters: Counters,
    counter_base: u32,
}

impl ReferenceModel {
    /// Creates a model with its counter register file at `counter_base`.
    pub fn new(counter_base: u32) -> Self {
        Self {
            clock: false,
            prev_clock: false,
            reset: false,
            instr_resp: InstrResp::default(),
            data_resp: PortResp::default(),
            hart_req: None,
            debug_mem_in: None,
            mem_resp_ready: false,
            reg_resp_ready: false,
            data_req_out: DataPortReq::default(),
            mem_resp_out: PortResp::default(),
            reg_resp_out: PortResp::default(),
            reg_write_out: None,
            pc: 0,
            regs: [0; 32],
            halted: false,
            breakpoint: None,
            watchpoint: None,
            busy_rd: None,
            load_wait: None,
            debug_mem: None,
            counters: Counters::default(),
            counter_base,
        }
    }

    fn read_gpr(&self, idx: u8) -> u32 {
        if idx < 32 { self.regs[idx as usize] } else { 0 }
    }

    fn write_gpr(&mut self, idx: u8, val: u32) {
        // x0 is hardwired to zero.
        if idx != 0 && idx < 32 {
            self.regs[idx as usize] = val;
        }
    }

    fn retire_write(&mut self, rd: u8, val: u32) {
        self.write_gpr(rd, val);
        if rd != 0 {
            self.reg_write_out = Some(RegWrite { reg: rd, data: val });
            self.busy_rd = Some(rd);
        }
        self.counters.instret += 1;
    }

    fn apply_reset(&mut self) {
        self.pc = 0;
        self.regs = [0; 32];
        self.halted = false;
        self.breakpoint = None;
        self.watchpoint = None;
        self.busy_rd = None;
        self.load_wait = None;
        self.debug_mem = None;
        self.counters = Counters::default();
        self.data_req_out = DataPortReq::default();
        self.mem_resp_out = PortResp::default();
        self.reg_resp_out = PortResp::default();
        self.reg_write_out = None;
    }

    fn apply_debug_request(&mut self, req: DebugRequest) {
        match req {
            DebugRequest::Halt(on) => {
                self.halted = on;
            }
            DebugRequest::Breakpoint { pc } => {
                self.breakpoint = Some(pc);
            }
            DebugRequest::Watchpoint { addr } => {
                self.watchpoint = Some(addr);
            }
            DebugRequest::SetPc { pc } => {
                self.pc = pc;
                self.busy_rd = None;
            }
            DebugRequest::RegisterAccess { reg, write, data } => {
                let resp_data = if write {
                    self.write_gpr(reg, data);
                    data
                } else {
                    self.read_gpr(reg)
                };
                self.reg_resp_out = PortResp {
                    valid: true,
                    data: resp_data,
                };
            }
        }
    }

    fn step_debug_mem(&mut self) {
        match self.debug_mem.take() {
            Some(DebugMemState::Issue(req)) => {
                self.data_req_out = DataPortReq {
                    valid: true,
                    addr: req.addr,
                    data: req.data,
                    write: req.write,
                    width: req.width.to_bits(),
                };
                self.debug_mem = Some(if req.write {
                    DebugMemState::WriteDone(req.data)
                } else {
                    DebugMemState::WaitResp
                });
            }
            Some(DebugMemState::WriteDone(data)) => {
                self.mem_resp_out = PortResp { valid: true, data };
            }
            Some(DebugMemState::WaitResp) => {
                if self.data_resp.valid {
                    self.mem_resp_out = PortResp {
                        valid: true,
                        data: self.data_resp.data,
                    };
                } else {
                    self.debug_mem = Some(DebugMemState::WaitResp);
                }
            }
            None => {}
        }
    }

    fn execute(&mut self, word: u32, prior_busy: Option<u8>) {
        let opcode = word & 0x7F;
        let rd = ((word >> 7) & 0x1F) as u8;
        let funct3 = (word >> 12) & 0x7;
        let rs1 = ((word >> 15) & 0x1F) as u8;
        let rs2 = ((word >> 20) & 0x1F) as u8;
        let i_imm = (word as i32) >> 20;

        let reads_rs1 = matches!(
            opcode,
            OPCODE_OP_IMM | OPCODE_OP | OPCODE_LOAD | OPCODE_STORE | OPCODE_BRANCH
        );
        let reads_rs2 = matches!(opcode, OPCODE_OP | OPCODE_STORE | OPCODE_BRANCH);

        // One bubble after a read-after-write dependency on the previous
        // result. `prior_busy` was already cleared, so the retry succeeds.
        if let Some(busy) = prior_busy {
            let conflict =
                (reads_rs1 && rs1 == busy) || (reads_rs2 && rs2 == busy);
            if conflict {
                self.counters.hazard_stalls += 1;
                return;
            }
        }

        match opcode {
            OPCODE_OP_IMM => {
                let val = self.read_gpr(rs1).wrapping_add(i_imm as u32);
                self.retire_write(rd, val);
                self.pc = self.pc.wrapping_add(4);
            }
            OPCODE_OP => {
                let a = self.read_gpr(rs1);
                let b = self.read_gpr(rs2);
                let funct7 = word >> 25;
                let val = if funct7 == 0x20 {
                    a.wrapping_sub(b)
                } else {
                    a.wrapping_add(b)
                };
                self.retire_write(rd, val);
                self.pc = self.pc.wrapping_add(4);
            }
            OPCODE_LOAD => {
                let addr = self.read_gpr(rs1).wrapping_add(i_imm as u32);
                self.data_req_out = DataPortReq {
                    valid: true,
                    addr,
                    data: 0,
                    write: false,
                    width: MemWidth::Word.to_bits(),
                };
                self.load_wait = Some(rd);
            }
            OPCODE_STORE => {
                let s_imm = (((word >> 25) << 5) | ((word >> 7) & 0x1F)) as i32;
                let s_imm = (s_imm << 20) >> 20;
                let addr = self.read_gpr(rs1).wrapping_add(s_imm as u32);
                self.data_req_out = DataPortReq {
                    valid: true,
                    addr,
                    data: self.read_gpr(rs2),
                    write: true,
                    width: MemWidth::Word.to_bits(),
                };
                self.counters.instret += 1;
                self.pc = self.pc.wrapping_add(4);
                if self.watchpoint == Some(addr) {
                    self.halted = true;
                }
            }
            OPCODE_BRANCH => {
                let b_imm = (((word >> 31) & 1) << 12)
                    | (((word >> 7) & 1) << 11)
                    | (((word >> 25) & 0x3F) << 5)
                    | (((word >> 8) & 0xF) << 1);
                let b_imm = ((b_imm as i32) << 19) >> 19;
                let taken = match funct3 {
                    0 => self.read_gpr(rs1) == self.read_gpr(rs2),
                    1 => self.read_gpr(rs1) != self.read_gpr(rs2),
                    _ => false,
                };
                self.counters.branches += 1;
                self.counters.instret += 1;
                if taken {
                    // Static not-taken prediction: every taken branch is
                    // a misprediction.
                    self.counters.branch_misses += 1;
                    self.pc = self.pc.wrapping_add(b_imm as u32);
                } else {
                    self.pc = self.pc.wrapping_add(4);
                }
            }
            _ => {
                // Unknown encodings retire as no-ops.
                self.counters.instret += 1;
                self.pc = self.pc.wrapping_add(4);
            }
        }
    }

    fn rising_edge(&mut self) {
        if self.reset {
            self.apply_reset();
            return;
        }

        self.counters.cycle += 1;

        // Halt gating uses the level as of this edge's entry: a release
        // arriving on this edge takes effect from the next cycle.
        let was_halted = self.halted;

        // Responses are held until the consumer signals ready.
        if self.reg_resp_out.valid && self.reg_resp_ready {
            self.reg_resp_out = PortResp::default();
        }
        if self.mem_resp_out.valid && self.mem_resp_ready {
            self.mem_resp_out = PortResp::default();
        }
        self.reg_write_out = None;
        self.data_req_out = DataPortReq::default();

        // Hart channel: always ready, so an asserted request transfers on
        // this edge.
        if let Some((hart, req)) = self.hart_req {
            if hart == 0 {
                self.apply_debug_request(req);
            }
        }

        // Debug memory channel: accept when idle.
        if self.debug_mem.is_none() {
            if let Some(req) = self.debug_mem_in {
                self.debug_mem = Some(DebugMemState::Issue(req));
            }
        }
        let debug_mem_active = self.debug_mem.is_some();
        self.step_debug_mem();

        // An outstanding load completes regardless of halt state.
        if let Some(rd) = self.load_wait {
            if self.data_resp.valid {
                self.load_wait = None;
                self.retire_write(rd, self.data_resp.data);
                self.pc = self.pc.wrapping_add(4);
            }
            return;
        }

        if was_halted || self.halted || debug_mem_active {
            return;
        }

        if self.breakpoint == Some(self.pc) {
            self.halted = true;
            return;
        }

        let prior_busy = self.busy_rd.take();
        if self.instr_resp.valid && self.instr_resp.pc == self.pc {
            let word = self.instr_resp.data;
            self.execute(word, prior_busy);
        }
    }
}

impl CounterRegs for ReferenceModel {
    fn read_reg(&self, addr: u32) -> u32 {
        let off = addr.wrapping_sub(self.counter_base);
        let (counter, hi) = match off & !HI_WORD_OFFSET {
            OFF_CYCLE => (self.counters.cycle, off & HI_WORD_OFFSET != 0),
            OFF_INSTRET => (self.counters.instret, off & HI_WORD_OFFSET != 0),
            OFF_BRANCHES => (self.counters.branches, off & HI_WORD_OFFSET != 0),
            OFF_BRANCH_MISS => (self.counters.branch_misses, off & HI_WORD_OFFSET != 0),
            OFF_HAZARD_STALL => (self.counters.hazard_stalls, off & HI_WORD_OFFSET != 0),
            _ => return 0,
        };
        if hi {
            (counter >> 32) as u32
        } else {
            counter as u32
        }
    }
}

impl CoreModel for ReferenceModel {
    fn eval(&mut self) {
        if self.clock && !self.prev_clock {
            self.rising_edge();
        }
        self.prev_clock = self.clock;
    }

    fn set_clock(&mut self, high: bool) {
        self.clock = high;
    }

    fn set_reset(&mut self, on: bool) {
        self.reset = on;
    }

    fn fetch_pc(&self) -> u32 {
        self.pc
    }

    fn set_instr_resp(&mut self, resp: InstrResp) {
        self.instr_resp = resp;
    }

    fn data_req(&self) -> DataPortReq {
        self.data_req_out
    }

    fn set_data_ready(&mut self, _ready: bool) {
        // The stub never backpressures; the pin exists for interface parity.
    }

    fn set_data_resp(&mut self, resp: PortResp) {
        self.data_resp = resp;
    }

    fn set_debug_hart_req(&mut self, hart: u8, req: Option<DebugRequest>) {
        self.hart_req = req.map(|r| (hart, r));
    }

    fn debug_hart_ready(&self) -> bool {
        true
    }

    fn set_debug_mem_req(&mut self, req: Option<DebugMemRequest>) {
        self.debug_mem_in = req;
    }

    fn debug_mem_ready(&self) -> bool {
        self.debug_mem.is_none()
    }

    fn debug_mem_resp(&self) -> PortResp {
        self.mem_resp_out
    }

    fn set_debug_mem_resp_ready(&mut self, ready: bool) {
        self.mem_resp_ready = ready;
    }

    fn debug_reg_resp(&self) -> PortResp {
        self.reg_resp_out
    }

    fn set_debug_reg_resp_ready(&mut self, ready: bool) {
        self.reg_resp_ready = ready;
    }

    fn debug_halted(&self) -> bool {
        self.halted
    }

    fn reg_write(&self) -> Option<RegWrite> {
        self.reg_write_out
    }
}
