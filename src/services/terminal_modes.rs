//! Terminal mode management
//!
//! The editor draws on the main screen in raw mode. `TerminalModes` tracks
//! whether raw mode was enabled and restores the terminal via `undo()`,
//! which also runs on `Drop`. For panics, `emergency_cleanup()` restores
//! the terminal without access to the instance.

use anyhow::Result;
use crossterm::{
    cursor::{MoveDown, MoveToColumn, Show},
    style::{Attribute, SetAttribute},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
    QueueableCommand,
};
use std::io::{stdout, Write};

/// Tracks which terminal modes have been enabled and provides cleanup.
#[derive(Debug, Default)]
pub struct TerminalModes {
    raw_mode: bool,
}

impl TerminalModes {
    /// Create a new TerminalModes with nothing enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable raw mode.
    pub fn enable() -> Result<Self> {
        let mut modes = Self::new();

        if let Err(e) = enable_raw_mode() {
            tracing::error!("Failed to enable raw mode: {}", e);
            return Err(e.into());
        }
        modes.raw_mode = true;
        tracing::debug!("Enabled raw mode");

        Ok(modes)
    }

    /// Restore the terminal to its original state.
    ///
    /// Safe to call multiple times; only what was enabled is disabled.
    pub fn undo(&mut self) {
        let mut out = stdout();
        let _ = out.queue(SetAttribute(Attribute::Reset));
        let _ = out.queue(Show);
        let _ = out.flush();

        if self.raw_mode {
            let _ = disable_raw_mode();
            self.raw_mode = false;
            tracing::debug!("Disabled raw mode");
        }
    }

    /// Returns true if raw mode is enabled.
    pub fn raw_mode_enabled(&self) -> bool {
        self.raw_mode
    }
}

impl Drop for TerminalModes {
    fn drop(&mut self) {
        self.undo();
    }
}

/// Queue the sequence that moves the cursor to the start of the bottom line
/// and clears it, so the shell prompt (or a diagnostic) lands there.
pub fn queue_park_cursor<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(MoveDown(999))?
        .queue(MoveToColumn(0))?
        .queue(Clear(ClearType::CurrentLine))?;
    Ok(())
}

/// Write a fatal diagnostic on the bottom line.
///
/// Call this while still in raw mode; the terminal is restored afterwards
/// by dropping [`TerminalModes`].
pub fn report_fatal(message: &str) {
    let mut out = stdout();
    let _ = queue_park_cursor(&mut out);
    let _ = out.queue(SetAttribute(Attribute::Reset));
    let _ = write!(out, "{message}\r\n");
    let _ = out.flush();
}

/// Unconditionally restore terminal state without tracking.
///
/// Used from the panic hook, where the `TerminalModes` instance is out of
/// reach.
pub fn emergency_cleanup() {
    let mut out = stdout();
    let _ = queue_park_cursor(&mut out);
    let _ = out.queue(SetAttribute(Attribute::Reset));
    let _ = out.queue(Show);
    let _ = out.flush();

    let _ = disable_raw_mode();
}
