//! Waveform capture.
//!
//! The stepper forwards a timestamped [`SignalFrame`] to an opaque sink
//! after every falling-edge evaluation. The on-disk format is the sink's
//! own business; [`VcdSink`] writes a VCD-style text trace of the signals
//! the harness observes at its boundary.
//!
//! Sink lifecycle is deliberately forgiving: `open` closes any handle the
//! sink still holds before opening the new path, and `close` on an already
//! closed sink is a no-op.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::model::RegWrite;

/// The observable signal set forwarded to the sink each sample.
#[derive(Clone, Copy, Debug)]
pub struct SignalFrame {
    /// Logical cycle count since the stepper was created.
    pub cycle: u64,
    /// Clock level after the transition that produced this frame.
    pub clock: bool,
    /// Current fetch program counter.
    pub pc: u32,
    /// Hart halt status.
    pub halted: bool,
    /// Register write retired in this cycle, if any.
    pub reg_write: Option<RegWrite>,
}

/// An external recorder of signal values over time.
pub trait WaveSink {
    /// Opens the sink at `path`, closing any previously open handle first.
    fn open(&mut self, path: &Path) -> io::Result<()>;

    /// Records one sample. Samples arrive in cycle order, each one taken
    /// immediately after the preceding model evaluation.
    fn dump(&mut self, timestamp: u64, frame: &SignalFrame) -> io::Result<()>;

    /// Closes the sink. Idempotent.
    fn close(&mut self) -> io::Result<()>;
}

/// VCD-style text trace of the harness-boundary signals.
#[derive(Default)]
pub struct VcdSink {
    writer: Option<BufWriter<File>>,
}

impl VcdSink {
    /// Creates a sink with no open handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a trace file is currently open.
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }
}

impl WaveSink for VcdSink {
    fn open(&mut self, path: &Path) -> io::Result<()> {
        // Re-opening without an intervening close must not leak the first
        // handle.
        self.close()?;

        let mut w = BufWriter::new(File::create(path)?);
        writeln!(w, "$timescale 1ns $end")?;
        writeln!(w, "$scope module harness $end")?;
        writeln!(w, "$var wire 1 ! clock $end")?;
        writeln!(w, "$var wire 32 \" pc $end")?;
        writeln!(w, "$var wire 1 # halted $end")?;
        writeln!(w, "$var wire 1 $ regwr_valid $end")?;
        writeln!(w, "$var wire 5 % regwr_reg $end")?;
        writeln!(w, "$var wire 32 & regwr_data $end")?;
        writeln!(w, "$upscope $end")?;
        writeln!(w, "$enddefinitions $end")?;
        self.writer = Some(w);
        Ok(())
    }

    fn dump(&mut self, timestamp: u64, frame: &SignalFrame) -> io::Result<()> {
        let Some(w) = self.writer.as_mut() else {
            return Ok(());
        };
        writeln!(w, "#{}", timestamp)?;
        writeln!(w, "{}!", if frame.clock { 1 } else { 0 })?;
        writeln!(w, "b{:b} \"", frame.pc)?;
        writeln!(w, "{}#", if frame.halted { 1 } else { 0 })?;
        match frame.reg_write {
            Some(rw) => {
                writeln!(w, "1$")?;
                writeln!(w, "b{:b} %", rw.reg)?;
                writeln!(w, "b{:b} &", rw.data)?;
            }
            None => writeln!(w, "0$")?,
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(mut w) = self.writer.take() {
            w.flush()?;
        }
        Ok(())
    }
}

impl Drop for VcdSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
