//! # schedlog
//!
//! A thread-safe debug logger that doubles as a deterministic-interleaving
//! test harness.
//!
//! Worker threads submit messages at designated program points; a single
//! coordinator thread serializes every destination write and, in a waiting
//! mode, uses each message site as a rendezvous point at which exactly one
//! blocked worker is released per round. Instrumenting every shared-memory
//! read and write with one message lets the coordinator explore concurrent
//! interleavings systematically and reproducibly.
//!
//! ## Features
//!
//! - **Serialized output**: one coordinator owns all destinations
//! - **Schedule fuzz testing**: reproducible random winner choice per round,
//!   seedable for replay
//! - **Multiple destinations**: trace events, stdout/stderr/file handles,
//!   and an in-memory buffer drained by `flush_logs`
//! - **Compile-time elision**: build with `--no-default-features` and the
//!   whole facility collapses to no-ops
//!
//! ```
//! use schedlog::prelude::*;
//!
//! let logger = Logger::builder()
//!     .range(0, 10)
//!     .destination(OutDest::Memory)
//!     .build();
//! logger.log_line(0, "phase one");
//! logger.log_line(11, "filtered out");
//! logger.close();
//! assert_eq!(logger.flush_logs(), vec!["|0| phase one"]);
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        dbg_lvl, silence_otr, IdleProbe, LogMsg, Logger, LoggerBuilder, LoggerError, Result,
        WaitMode, DEFAULT_MEM_DBG_RANGE,
    };
    pub use crate::sinks::{LineHandle, OutDest};
}

pub use crate::core::{
    dbg_lvl, silence_otr, IdleProbe, LogMsg, Logger, LoggerBuilder, LoggerError, Result, WaitMode,
    DEFAULT_MEM_DBG_RANGE,
};
pub use crate::sinks::{LineHandle, OutDest};
