//! Verification and measurement harness for a pipelined processor model.
//!
//! This crate drives an externally supplied, cycle-accurate processor
//! model through a synchronous clock, feeds it synthetic programs via
//! memory-protocol stubs, controls and inspects it through a debug signal
//! interface, and extracts hardware performance counters for benchmarking.
//! The processor itself is opaque: the harness sees only the fixed signal
//! surface captured by [`model::CoreModel`], so a pure-software reference
//! core can stand in for generated RTL.
//!
//! # Modules
//!
//! * `common`: shared types, outcomes, and error handling.
//! * `config`: TOML configuration loading.
//! * `counters`: tear-free counter sampling and the performance bank.
//! * `debug`: debug control-plane protocol and channel driver.
//! * `mem`: instruction/data memory stub and the static arena.
//! * `model`: the model capability trait and the reference implementation.
//! * `sim`: the clock-edge stepping loop, waveform sink, and loader.
//! * `softmath`: software multiply/divide/modulo fallback routines.
//! * `stats`: run report formatting.

/// Shared types, constants, and error handling.
pub mod common;

/// Configuration system for the simulation, timer, and counter settings.
pub mod config;

/// Performance counter sampling built on tear-free split reads.
pub mod counters;

/// Debug control plane: hart control, register access, debug memory.
pub mod debug;

/// Memory stub and static arena.
pub mod mem;

/// Model capability interface and the software reference model.
pub mod model;

/// Simulation stepping loop, waveform capture, and program loading.
pub mod sim;

/// Software integer arithmetic for targets without hardware division.
pub mod softmath;

/// Run report collection and printing.
pub mod stats;
