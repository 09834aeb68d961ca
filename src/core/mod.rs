//! Core logger types and the coordinator

pub mod backoff;
pub mod checkin;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod logger;
pub mod message;
pub mod writer;

pub use config::{dbg_lvl, silence_otr, DEFAULT_MEM_DBG_RANGE};
pub use error::{LoggerError, Result};
pub use logger::{IdleProbe, Logger, LoggerBuilder, WaitMode};
pub use message::LogMsg;
