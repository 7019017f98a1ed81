//! Instruction/data memory stub.
//!
//! Stands in for the memory system behind the model's two ports. The
//! instruction port is combinational: a fetch address inside the loaded
//! program is answered in the same cycle. The data port follows a
//! one-cycle-latency handshake: `ready` is always asserted, a request is
//! accepted exactly when `valid && ready`, writes commit into the image in
//! the accepting cycle, and read data comes back valid one cycle later.
//! Only one data request is ever in flight.
//!
//! The backing image is sparse; addresses never written read as zero.

use std::collections::HashMap;

use crate::common::MemWidth;
use crate::model::{DataPortReq, InstrResp, PortResp};

/// Sparse instruction/data memory responder.
#[derive(Default)]
pub struct MemoryStub {
    program: Vec<u32>,
    image: HashMap<u32, u32>,
    pending_read: Option<u32>,
}

impl MemoryStub {
    /// Creates an empty stub with no program loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the program image: address-aligned 32-bit words, indexed by
    /// `pc / 4`. Immutable for the duration of a run.
    pub fn load_program(&mut self, words: Vec<u32>) {
        self.program = words;
    }

    /// Number of instruction words loaded.
    pub fn program_len(&self) -> usize {
        self.program.len()
    }

    /// Answers the instruction port for the given fetch address.
    ///
    /// Valid exactly when `pc / 4` lies within the program bound.
    pub fn instr_resp(&self, pc: u32) -> InstrResp {
        let idx = (pc / 4) as usize;
        match self.program.get(idx) {
            Some(&word) => InstrResp {
                valid: true,
                pc,
                data: word,
            },
            None => InstrResp {
                valid: false,
                pc,
                data: 0,
            },
        }
    }

    /// Services the data port for one cycle.
    ///
    /// Returns the response to drive this cycle (the read accepted one
    /// cycle earlier, if any), then processes `req`: an accepted write
    /// commits immediately, an accepted read schedules its response for the
    /// next cycle.
    pub fn service_data(&mut self, req: &DataPortReq) -> PortResp {
        let resp = match self.pending_read.take() {
            Some(data) => PortResp { valid: true, data },
            None => PortResp::default(),
        };

        // ready is always high, so valid alone accepts the request.
        if req.valid {
            let width = req.mem_width();
            if req.write {
                self.write(req.addr, req.data, width);
            } else {
                self.pending_read = Some(self.read(req.addr, width));
            }
        }

        resp
    }

    /// Commits a write into the image. Sub-word writes merge into the
    /// containing word; word writes ignore the low address bits.
    pub fn write(&mut self, addr: u32, data: u32, width: MemWidth) {
        let word_addr = addr & !3;
        match width {
            MemWidth::Word => {
                self.image.insert(word_addr, data);
            }
            MemWidth::Half | MemWidth::Byte => {
                let shift = (addr & 3) * 8;
                let mask = match width {
                    MemWidth::Byte => 0xFFu32,
                    _ => 0xFFFF,
                } << shift;
                let old = self.image.get(&word_addr).copied().unwrap_or(0);
                let merged = (old & !mask) | ((data << shift) & mask);
                self.image.insert(word_addr, merged);
            }
        }
    }

    /// Reads from the image, zero-extending sub-word accesses.
    pub fn read(&self, addr: u32, width: MemWidth) -> u32 {
        let word = self.read_word(addr);
        match width {
            MemWidth::Word => word,
            MemWidth::Half => (word >> ((addr & 2) * 8)) & 0xFFFF,
            MemWidth::Byte => (word >> ((addr & 3) * 8)) & 0xFF,
        }
    }

    /// Reads the word containing `addr`. Unmapped words read as zero.
    pub fn read_word(&self, addr: u32) -> u32 {
        self.image.get(&(addr & !3)).copied().unwrap_or(0)
    }
}
