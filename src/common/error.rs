//! Harness error types.
//!
//! Library code never aborts the process: failures surface as `HarnessError`
//! values and the binary decides how to report them. Degenerate arithmetic
//! (division by zero) and arena exhaustion are deliberately *not* errors;
//! they have defined in-band results (see `softmath` and `mem::arena`).

use std::fmt;
use std::io;

/// Errors surfaced by the testbench harness.
#[derive(Debug)]
pub enum HarnessError {
    /// A width or size assumption in the configuration does not hold.
    /// Callers treat this as a diagnostic and continue best-effort.
    Config(String),
    /// A program image could not be read or decoded.
    Load(String),
    /// A debug-channel transfer or response did not complete within the
    /// attempt bound.
    DebugTimeout(&'static str),
    /// The waveform sink failed to open, write, or close.
    Sink(io::Error),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::Config(msg) => write!(f, "configuration error: {}", msg),
            HarnessError::Load(msg) => write!(f, "program load error: {}", msg),
            HarnessError::DebugTimeout(what) => {
                write!(f, "debug channel timeout waiting for {}", what)
            }
            HarnessError::Sink(e) => write!(f, "waveform sink error: {}", e),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarnessError::Sink(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for HarnessError {
    fn from(e: io::Error) -> Self {
        HarnessError::Sink(e)
    }
}
