//! Logger façade: construction, submission, flushing, shutdown

use super::checkin::{self, CheckIn};
use super::config;
use super::coordinator::Coordinator;
use super::message::LogMsg;
use super::writer::{current_who, Latch, Writer};
use crate::sinks::OutDest;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Snapshot of workers presently not participating in the schedule. Polled by
/// the coordinator on every quiescence test.
pub type IdleProbe = Arc<dyn Fn() -> usize + Send + Sync>;

/// How producers interact with the coordinator.
#[derive(Clone)]
pub enum WaitMode {
    /// Non-blocking logging; producers never park.
    DontWait,
    /// A round completes when `checked-in + extra_idle() >= target`.
    WaitFixed { target: usize, extra_idle: IdleProbe },
    /// Reserved. Selecting it is a fatal `unimplemented!`.
    WaitDynamic,
}

impl fmt::Debug for WaitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitMode::DontWait => write!(f, "DontWait"),
            WaitMode::WaitFixed { target, .. } => {
                f.debug_struct("WaitFixed").field("target", target).finish_non_exhaustive()
            }
            WaitMode::WaitDynamic => write!(f, "WaitDynamic"),
        }
    }
}

/// Thread-safe debug logger with an optional deterministic-interleaving
/// scheduling coordinator.
///
/// All submission entry points filter by the level range, encode the payload,
/// and publish it to the single coordinator thread, which serializes every
/// destination write. In a waiting mode the submitting thread parks until the
/// coordinator releases it.
///
/// # Example
///
/// ```
/// use schedlog::prelude::*;
///
/// let logger = Logger::builder()
///     .range(0, 10)
///     .destination(OutDest::Memory)
///     .build();
/// logger.log_line(0, "starting up");
/// logger.close();
/// assert_eq!(logger.flush_logs(), vec!["|0| starting up"]);
/// ```
pub struct Logger {
    min_lvl: i32,
    max_lvl: i32,
    mode: WaitMode,
    checkin: CheckIn,
    dummy: Arc<Latch>,
    shutdown: Arc<AtomicBool>,
    mem_buf: Arc<Mutex<Vec<String>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    failed_writes: Arc<AtomicU64>,
}

impl Logger {
    /// Create a logger accepting levels in `range` (inclusive on both ends)
    /// and spawn its coordinator.
    ///
    /// # Panics
    ///
    /// Selecting [`WaitMode::WaitDynamic`] is unimplemented and fatal.
    pub fn new(range: (i32, i32), destinations: Vec<OutDest>, mode: WaitMode) -> Self {
        Self::spawn(range, destinations, mode, None)
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn spawn(
        range: (i32, i32),
        destinations: Vec<OutDest>,
        mode: WaitMode,
        seed: Option<u64>,
    ) -> Self {
        if matches!(mode, WaitMode::WaitDynamic) {
            unimplemented!("WaitDynamic scheduling is reserved and cannot be selected");
        }

        let (checkin, drain) = checkin::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));
        let mem_buf = Arc::new(Mutex::new(Vec::new()));
        let failed_writes = Arc::new(AtomicU64::new(0));

        // With the facility compiled out, the no-op logger keeps the public
        // contract but never spawns a thread.
        let handle = if cfg!(feature = "debug") {
            let coordinator = Coordinator::new(
                drain,
                destinations,
                Arc::clone(&mem_buf),
                Arc::clone(&shutdown),
                Arc::clone(&failed_writes),
                seed,
            );
            let coordinator_mode = mode.clone();
            Some(std::thread::spawn(move || coordinator.run(coordinator_mode)))
        } else {
            None
        };

        Self {
            min_lvl: range.0,
            max_lvl: range.1,
            mode,
            checkin,
            dummy: Arc::new(Latch::new()),
            shutdown,
            mem_buf,
            handle: Mutex::new(handle),
            failed_writes,
        }
    }

    /// Whether a message at `lvl` would be accepted. Rejected levels produce
    /// no queue entry and no side effect.
    pub fn accepts(&self, lvl: i32) -> bool {
        if cfg!(not(feature = "debug")) {
            return false;
        }
        self.min_lvl <= lvl && lvl <= self.max_lvl
    }

    /// Submit a standard message from a string.
    pub fn log_line(&self, lvl: i32, body: impl Into<String>) {
        self.submit(LogMsg::Standard {
            lvl,
            body: body.into(),
        });
    }

    /// Submit a standard message from raw bytes, decoded as UTF-8 with
    /// replacement.
    pub fn log_bytes(&self, lvl: i32, bytes: &[u8]) {
        self.submit(LogMsg::Standard {
            lvl,
            body: String::from_utf8_lossy(bytes).into_owned(),
        });
    }

    /// Submit a standard message from anything printable.
    pub fn log_display(&self, lvl: i32, text: impl fmt::Display) {
        self.submit(LogMsg::Standard {
            lvl,
            body: text.to_string(),
        });
    }

    /// Submit a full message, including off-the-record ones.
    pub fn log_msg(&self, msg: LogMsg) {
        self.submit(msg);
    }

    fn submit(&self, msg: LogMsg) {
        if !self.accepts(msg.lvl()) {
            return;
        }
        // Post-close submissions drop silently.
        if self.shutdown.load(Ordering::Acquire) {
            return;
        }
        match &self.mode {
            WaitMode::DontWait => {
                self.checkin
                    .push(Writer::new(current_who(), Arc::clone(&self.dummy), msg));
            }
            WaitMode::WaitFixed { .. } => {
                let latch = Arc::new(Latch::new());
                let writer = Writer::new(current_who(), Arc::clone(&latch), msg);
                if self.checkin.push(writer) {
                    latch.wait();
                }
            }
            WaitMode::WaitDynamic => unreachable!("rejected at construction"),
        }
    }

    /// Drain the memory buffer atomically, returning its lines in
    /// chronological order.
    pub fn flush_logs(&self) -> Vec<String> {
        std::mem::take(&mut *self.mem_buf.lock())
    }

    /// Number of destination writes that failed so far.
    pub fn failed_write_count(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    /// Cooperative shutdown: raise the shutdown flag and join the
    /// coordinator, which drains the queue synchronously before exiting.
    /// Idempotent.
    ///
    /// If the coordinator died of a panic (for instance an ambiguous
    /// schedule), the cause is reported on stderr and re-raised here.
    pub fn close(&self) {
        self.shutdown.store(true, Ordering::Release);
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if let Err(cause) = handle.join() {
                eprintln!("schedlog: coordinator died: {}", panic_message(&cause));
                std::panic::resume_unwind(cause);
            }
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.handle.lock().take() {
            // Report but never panic out of a drop.
            if let Err(cause) = handle.join() {
                eprintln!("schedlog: coordinator died: {}", panic_message(&cause));
            }
        }
    }
}

fn panic_message(cause: &(dyn std::any::Any + Send)) -> &str {
    if let Some(text) = cause.downcast_ref::<&str>() {
        text
    } else if let Some(text) = cause.downcast_ref::<String>() {
        text
    } else {
        "unknown panic"
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```no_run
/// use schedlog::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .range(0, 10)
///     .destination(OutDest::stdout())
///     .wait_mode(WaitMode::WaitFixed { target: 2, extra_idle: Arc::new(|| 0) })
///     .seed(42)
///     .build();
/// ```
pub struct LoggerBuilder {
    range: (i32, i32),
    destinations: Vec<OutDest>,
    mode: WaitMode,
    seed: Option<u64>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            range: config::DEFAULT_MEM_DBG_RANGE,
            destinations: Vec::new(),
            mode: WaitMode::DontWait,
            seed: None,
        }
    }

    /// Accepted level range, inclusive on both ends.
    #[must_use = "builder methods return a new value"]
    pub fn range(mut self, min_lvl: i32, max_lvl: i32) -> Self {
        self.range = (min_lvl, max_lvl);
        self
    }

    /// Add a destination.
    #[must_use = "builder methods return a new value"]
    pub fn destination(mut self, dest: OutDest) -> Self {
        self.destinations.push(dest);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn wait_mode(mut self, mode: WaitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Seed the coordinator's pick RNG. Fixing the seed makes the schedule
    /// reproducible for the same set of concurrent messages.
    #[must_use = "builder methods return a new value"]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Logger {
        Logger::spawn(self.range, self.destinations, self.mode, self.seed)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_is_inclusive_on_both_ends() {
        let logger = Logger::builder().range(2, 4).build();
        assert!(!logger.accepts(1));
        assert!(logger.accepts(2));
        assert!(logger.accepts(3));
        assert!(logger.accepts(4));
        assert!(!logger.accepts(5));
        logger.close();
    }

    #[test]
    #[should_panic(expected = "WaitDynamic scheduling is reserved")]
    fn wait_dynamic_is_rejected_at_construction() {
        let _ = Logger::new((0, 10), Vec::new(), WaitMode::WaitDynamic);
    }

    #[test]
    fn submission_after_close_is_dropped() {
        let logger = Logger::builder().destination(OutDest::Memory).build();
        logger.log_line(0, "before");
        logger.close();
        logger.log_line(0, "after");
        assert_eq!(logger.flush_logs(), vec!["|0| before"]);
    }

    #[test]
    fn wait_mode_debug_names_variants() {
        assert_eq!(format!("{:?}", WaitMode::DontWait), "DontWait");
        let fixed = WaitMode::WaitFixed {
            target: 3,
            extra_idle: Arc::new(|| 0),
        };
        assert!(format!("{fixed:?}").contains("target: 3"));
    }
}
