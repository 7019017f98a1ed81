//! Common types shared across the testbench harness.
//!
//! This module provides the small vocabulary used by every other component:
//! bus access widths, clock phases, run outcomes, and error handling.

/// Bus access widths, clock phases, and run outcomes.
pub mod data;

/// Error types for harness-level failures.
pub mod error;

pub use data::{ClockPhase, FailReason, MemWidth, Outcome};
pub use error::HarnessError;
