//! Memory-side components of the harness.
//!
//! [`MemoryStub`] answers the model's instruction and data ports from a
//! loaded program image and a sparse data image. [`StaticArena`] is the
//! optional fixed-capacity allocation strategy used by workloads that must
//! run without a heap.

/// Instruction/data memory responder with bus handshakes.
pub mod stub;

/// Fixed-capacity bump-pointer arena.
pub mod arena;

pub use arena::{ArenaSlice, StaticArena};
pub use stub::MemoryStub;
