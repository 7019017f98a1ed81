//! Simulation orchestration.
//!
//! The stepper drives the model's clock half-cycle by half-cycle, wiring
//! the memory stub, debug driver, and waveform sink together. The loader
//! turns flat binaries into program images.

/// Half-cycle stepping loop over a [`crate::model::CoreModel`].
pub mod stepper;

/// Waveform sink interface and the bundled VCD-style implementation.
pub mod wave;

/// Program image loading.
pub mod loader;

pub use stepper::{ModelStepper, StepperOptions};
pub use wave::{SignalFrame, VcdSink, WaveSink};
