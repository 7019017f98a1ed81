//! Debug control plane.
//!
//! The model exposes a debug interface: an ID-routed hart request channel
//! carrying one of five request variants, a debug memory channel mirroring
//! the data port's handshake shape but bypassing architectural execution,
//! and two response channels (memory, register). Every channel follows the
//! valid/ready discipline: the requester holds `valid` asserted across
//! cycles and may deassert it only after observing a cycle where both
//! `valid` and `ready` were high (a transfer).
//!
//! Exactly one request variant may be valid in a given cycle, and at most
//! one request may be in flight. Both rules are protocol obligations; the
//! driver enforces them with `debug_assert!` so violations fail fast in
//! debug builds.

use crate::common::MemWidth;
use crate::model::CoreModel;

/// A hart control request, exactly one variant valid per cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugRequest {
    /// Assert (`true`) or release (`false`) the hart's halt line.
    Halt(bool),
    /// Arm a breakpoint: the hart halts when fetch reaches `pc`.
    Breakpoint { pc: u32 },
    /// Arm a watchpoint: the hart halts after a store to `addr`.
    Watchpoint { addr: u32 },
    /// Redirect fetch to `pc` and flush the pipeline.
    SetPc { pc: u32 },
    /// Read (`write == false`) or write a general-purpose register.
    RegisterAccess { reg: u8, write: bool, data: u32 },
}

/// A request on the debug memory channel.
///
/// Same field shape as the normal data port, routed through the debug path
/// so memory can be inspected or seeded without affecting architectural
/// execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebugMemRequest {
    pub addr: u32,
    pub data: u32,
    pub write: bool,
    pub width: MemWidth,
}

enum Pending {
    Hart(DebugRequest),
    Mem(DebugMemRequest),
}

/// Drives the debug channels of a [`CoreModel`] with correct handshaking.
///
/// The driver owns the in-flight request slot. Callers issue a request and
/// then tick the clock until [`DebugDriver::drive`] reports the transfer
/// complete; response data is sampled from the model afterwards.
pub struct DebugDriver {
    hart: u8,
    pending: Option<Pending>,
}

impl DebugDriver {
    /// Creates a driver targeting `hart`.
    pub fn new(hart: u8) -> Self {
        Self {
            hart,
            pending: None,
        }
    }

    /// Whether a request is still in flight.
    pub fn busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Queues a hart control request.
    pub fn issue_hart(&mut self, req: DebugRequest) {
        debug_assert!(
            self.pending.is_none(),
            "debug request issued before prior transfer completed"
        );
        self.pending = Some(Pending::Hart(req));
    }

    /// Queues a debug memory request.
    pub fn issue_mem(&mut self, req: DebugMemRequest) {
        debug_assert!(
            self.pending.is_none(),
            "debug request issued before prior transfer completed"
        );
        self.pending = Some(Pending::Mem(req));
    }

    /// Drives request signals for the upcoming rising edge.
    ///
    /// Called once per cycle before the model is evaluated. Samples the
    /// channel's `ready` as settled by the previous evaluation; if the
    /// channel was ready, this edge completes the transfer and `valid` is
    /// deasserted on the next call. Returns `true` when the in-flight
    /// request transfers on this edge.
    pub fn drive<M: CoreModel>(&mut self, model: &mut M) -> bool {
        match self.pending {
            Some(Pending::Hart(req)) => {
                let ready = model.debug_hart_ready();
                model.set_debug_hart_req(self.hart, Some(req));
                model.set_debug_mem_req(None);
                if ready {
                    self.pending = None;
                }
                ready
            }
            Some(Pending::Mem(req)) => {
                let ready = model.debug_mem_ready();
                model.set_debug_mem_req(Some(req));
                model.set_debug_hart_req(self.hart, None);
                if ready {
                    self.pending = None;
                }
                ready
            }
            None => {
                model.set_debug_hart_req(self.hart, None);
                model.set_debug_mem_req(None);
                false
            }
        }
    }
}
