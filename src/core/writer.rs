//! Per-check-in Writer record and its single-shot release latch

use super::message::LogMsg;
use parking_lot::{Condvar, Mutex};
use std::cell::RefCell;

// Cached per-thread identity to avoid re-formatting on every check-in.
thread_local! {
    static WHO_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Identity string for the calling thread: its name when set, otherwise the
/// debug form of its id.
pub(crate) fn current_who() -> String {
    WHO_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if cache.is_none() {
            let current = std::thread::current();
            let who = match current.name() {
                Some(name) => name.to_string(),
                None => format!("{:?}", current.id()),
            };
            *cache = Some(who);
        }
        cache.as_ref().expect("who cache initialized in previous line").clone()
    })
}

/// Single-shot latch. `wait` returns exactly once, after `signal`; there are
/// no spurious returns. The coordinator signals each latch at most once.
pub(crate) struct Latch {
    done: Mutex<bool>,
    woken: Condvar,
}

impl Latch {
    pub fn new() -> Self {
        Self {
            done: Mutex::new(false),
            woken: Condvar::new(),
        }
    }

    pub fn wait(&self) {
        let mut done = self.done.lock();
        while !*done {
            self.woken.wait(&mut done);
        }
    }

    pub fn signal(&self) {
        let mut done = self.done.lock();
        *done = true;
        self.woken.notify_one();
    }
}

/// What a producer publishes on the check-in queue. Lives from publication
/// until the coordinator releases the latch; exactly one release per Writer.
pub(crate) struct Writer {
    pub who: String,
    pub release: std::sync::Arc<Latch>,
    pub msg: LogMsg,
}

impl Writer {
    pub fn new(who: String, release: std::sync::Arc<Latch>, msg: LogMsg) -> Self {
        Self { who, release, msg }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn wait_returns_after_signal() {
        let latch = Arc::new(Latch::new());
        let waiter = {
            let latch = Arc::clone(&latch);
            thread::spawn(move || latch.wait())
        };
        thread::sleep(Duration::from_millis(20));
        latch.signal();
        waiter.join().expect("waiter must return after signal");
    }

    #[test]
    fn wait_after_signal_does_not_block() {
        let latch = Latch::new();
        latch.signal();
        latch.wait();
    }

    #[test]
    fn current_who_is_stable_per_thread() {
        assert_eq!(current_who(), current_who());
    }
}
