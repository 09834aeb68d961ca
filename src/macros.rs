//! Logging macros for ergonomic message formatting.
//!
//! These macros provide a convenient interface for submitting messages with
//! automatic string formatting, similar to `println!` and `format!`.
//!
//! # Examples
//!
//! ```
//! use schedlog::prelude::*;
//! use schedlog::logln;
//!
//! let logger = Logger::builder().destination(OutDest::Memory).build();
//!
//! let worker = 3;
//! logln!(logger, 0, "worker {} ready", worker);
//! logger.close();
//! ```

/// Submit a standard message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use schedlog::prelude::*;
/// # let logger = Logger::builder().build();
/// use schedlog::logln;
/// logln!(logger, 0, "simple message");
/// logln!(logger, 2, "write to {:#x}", 0xdead_beefu32);
/// # logger.close();
/// ```
#[macro_export]
macro_rules! logln {
    ($logger:expr, $lvl:expr, $($arg:tt)+) => {
        $logger.log_line($lvl, format!($($arg)+))
    };
}

/// Submit an off-the-record message: echoed when received, never scheduled.
///
/// # Examples
///
/// ```
/// # use schedlog::prelude::*;
/// # let logger = Logger::builder().build();
/// use schedlog::otrln;
/// otrln!(logger, 0, "progress: {}%", 40);
/// # logger.close();
/// ```
#[macro_export]
macro_rules! otrln {
    ($logger:expr, $lvl:expr, $($arg:tt)+) => {
        $logger.log_msg($crate::LogMsg::OffTheRecord {
            lvl: $lvl,
            body: format!($($arg)+),
        })
    };
}
