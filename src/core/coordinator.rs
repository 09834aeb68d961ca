//! The coordinator loop
//!
//! A single long-running thread drains the check-in queue, formats messages,
//! and dispatches them to every destination. In `WaitFixed` mode it also runs
//! the quiescence/pick/release protocol: once every participating worker is
//! either checked in or idle, exactly one checked-in writer is released per
//! round, chosen by a reproducible random pick over the body-sorted set.

use super::backoff::Backoff;
use super::checkin::Drain;
use super::config;
use super::logger::{IdleProbe, WaitMode};
use super::message::LogMsg;
use super::writer::Writer;
use crate::sinks::OutDest;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{self, Write as _};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

/// How many idle scheduling iterations between spin diagnostics.
const SPIN_REPORT_EVERY: u64 = 500;

/// Format a message per the stable wire format: `{lead}{lvl}| {extra}{body}`.
/// Standard messages lead with `|`, off-the-record with `\`. The trailing
/// newline is the handle sinks' concern.
pub(crate) fn format_line(msg: &LogMsg, extra: &str) -> String {
    let lead = if msg.is_off_the_record() { '\\' } else { '|' };
    format!("{lead}{}| {extra}{}", msg.lvl(), msg.body())
}

pub(crate) struct Coordinator {
    drain: Drain,
    dests: Vec<OutDest>,
    mem_buf: Arc<Mutex<Vec<String>>>,
    shutdown: Arc<AtomicBool>,
    failed_writes: Arc<AtomicU64>,
    rng: StdRng,
}

impl Coordinator {
    pub fn new(
        drain: Drain,
        dests: Vec<OutDest>,
        mem_buf: Arc<Mutex<Vec<String>>>,
        shutdown: Arc<AtomicBool>,
        failed_writes: Arc<AtomicU64>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            drain,
            dests,
            mem_buf,
            shutdown,
            failed_writes,
            rng,
        }
    }

    pub fn run(mut self, mode: WaitMode) {
        match mode {
            WaitMode::DontWait => self.print_loop(),
            WaitMode::WaitFixed { target, extra_idle } => self.schedule_loop(target, extra_idle),
            // Rejected at logger construction.
            WaitMode::WaitDynamic => unreachable!("WaitDynamic never reaches the coordinator"),
        }
    }

    /// Non-blocking print loop: no producer parks, so nothing is released.
    fn print_loop(&mut self) {
        let mut backoff = Backoff::new(config::BACKOFF_CAP);
        loop {
            if self.shutdown.load(Ordering::Acquire) {
                self.flush_drain();
                return;
            }
            match self.drain.try_pop() {
                None => backoff.step(),
                Some(writer) => {
                    let line = format_line(&writer.msg, "");
                    self.dispatch(&line);
                    backoff.reset();
                }
            }
        }
    }

    /// Scheduling loop: gather checked-in writers, wait for quiescence, and
    /// release exactly one writer per round.
    fn schedule_loop(&mut self, target: usize, extra_idle: IdleProbe) {
        let mut iters: u64 = 0;
        let mut waiting: Vec<Writer> = Vec::new();
        let mut backoff = Backoff::new(config::BACKOFF_CAP);
        loop {
            // Interleave cleanly with prints done outside the coordinator.
            let _ = io::stdout().flush();

            if self.shutdown.load(Ordering::Acquire) {
                self.flush_drain();
                return;
            }

            // Drain with sideline: off-the-record messages are echoed (unless
            // silenced) and their producers released at once; they never gate
            // the schedule.
            while let Some(writer) = self.drain.try_pop() {
                if writer.msg.is_off_the_record() {
                    if !config::silence_otr() {
                        let line = format_line(&writer.msg, "");
                        self.dispatch(&line);
                    }
                    writer.release.signal();
                } else {
                    waiting.push(writer);
                }
            }

            let parked = waiting.len();
            let idle = extra_idle();
            if parked + idle >= target && parked > 0 {
                self.pick_and_proceed(&mut waiting);
                backoff.reset();
                iters = 0;
            } else {
                // Either workers are still running, or everyone is idle and
                // shutdown is presumably in flight. Keep waiting.
                backoff.step();
                iters += 1;
                if iters % SPIN_REPORT_EVERY == 0 {
                    println!(
                        "logger has spun for {iters} iterations, {parked} checked-in, {idle} idling."
                    );
                }
            }
        }
    }

    /// Release one writer. Sorting by body imposes a permutation independent
    /// of arrival order, so a fixed seed and the same set of concurrent
    /// messages always pick the same winner.
    fn pick_and_proceed(&mut self, waiting: &mut Vec<Writer>) {
        waiting.sort_by(|a, b| a.msg.body().cmp(b.msg.body()));
        if let Some(pair) = waiting
            .windows(2)
            .find(|pair| pair[0].msg.body() == pair[1].msg.body())
        {
            panic!(
                "cannot schedule: equal message bodies {:?} checked in by {} and {}",
                pair[0].msg.body(),
                pair[0].who,
                pair[1].who
            );
        }

        let total = waiting.len();
        let pos = self.rng.random_range(0..total);
        let picked = waiting.remove(pos);

        let line = format_line(&picked.msg, &format!("#{} of {}: ", pos + 1, total));
        self.dispatch(&line);
        picked.release.signal();

        // Help single-core schedules hand control to the released worker.
        thread::yield_now();
    }

    /// Shutdown path: print whatever is still queued, release nobody.
    fn flush_drain(&mut self) {
        while let Some(writer) = self.drain.try_pop() {
            let line = format_line(&writer.msg, "");
            self.dispatch(&line);
        }
        for dest in &mut self.dests {
            if let OutDest::Handle(handle) = dest {
                if let Err(err) = handle.flush() {
                    eprintln!("schedlog: destination flush failed: {err}");
                }
            }
        }
    }

    /// Write one formatted line to every destination. A failing handle is
    /// reported and counted; the coordinator keeps going.
    fn dispatch(&mut self, line: &str) {
        for dest in &mut self.dests {
            match dest {
                OutDest::Events => {
                    tracing::debug!(target: "schedlog::events", "{}", line);
                }
                OutDest::Handle(handle) => {
                    if let Err(err) = handle.write_line(line) {
                        eprintln!("schedlog: destination write failed: {err}");
                        self.failed_writes.fetch_add(1, Ordering::Relaxed);
                    }
                }
                OutDest::Memory => {
                    self.mem_buf.lock().push(line.to_owned());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_line_format() {
        let msg = LogMsg::Standard {
            lvl: 3,
            body: "write x".to_string(),
        };
        assert_eq!(format_line(&msg, ""), "|3| write x");
    }

    #[test]
    fn scheduled_pick_carries_contextual_prefix() {
        let msg = LogMsg::Standard {
            lvl: 1,
            body: "read y".to_string(),
        };
        assert_eq!(format_line(&msg, "#2 of 5: "), "|1| #2 of 5: read y");
    }

    #[test]
    fn off_the_record_leads_with_backslash() {
        let msg = LogMsg::OffTheRecord {
            lvl: 0,
            body: "chat".to_string(),
        };
        assert_eq!(format_line(&msg, ""), "\\0| chat");
    }
}
