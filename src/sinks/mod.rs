//! Output destinations
//!
//! The coordinator is the sole writer of destinations; every formatted line
//! is dispatched once to each configured destination.

pub mod handle;

pub use handle::LineHandle;

use crate::core::error::Result;

/// A terminal for formatted log lines.
///
/// * `Events` emits each line as a `tracing` event.
/// * `Handle` writes newline-terminated lines to stdout, stderr, or a file.
/// * `Memory` appends to the logger's in-memory buffer, drained by
///   [`flush_logs`](crate::core::logger::Logger::flush_logs).
pub enum OutDest {
    Events,
    Handle(LineHandle),
    Memory,
}

impl OutDest {
    pub fn stdout() -> Self {
        OutDest::Handle(LineHandle::Stdout)
    }

    pub fn stderr() -> Self {
        OutDest::Handle(LineHandle::Stderr)
    }

    /// Append-mode file destination, created if missing.
    pub fn file(path: impl Into<std::path::PathBuf>) -> Result<Self> {
        Ok(OutDest::Handle(LineHandle::file(path)?))
    }
}
