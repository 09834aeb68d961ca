//! Multi-producer check-in queue
//!
//! Unbounded FIFO between producer threads and the single coordinator.
//! `push` never blocks; `try_pop` is non-blocking and returns `None` iff the
//! queue was empty at the instant of the call.

use super::writer::Writer;
use crossbeam_channel::{unbounded as channel_unbounded, Receiver, Sender};

pub(crate) struct CheckIn {
    tx: Sender<Writer>,
}

impl CheckIn {
    /// Publish a Writer. Returns false once the coordinator side is gone,
    /// which callers treat as a silent drop.
    pub fn push(&self, writer: Writer) -> bool {
        self.tx.send(writer).is_ok()
    }
}

pub(crate) struct Drain {
    rx: Receiver<Writer>,
}

impl Drain {
    pub fn try_pop(&self) -> Option<Writer> {
        self.rx.try_recv().ok()
    }
}

pub(crate) fn unbounded() -> (CheckIn, Drain) {
    let (tx, rx) = channel_unbounded();
    (CheckIn { tx }, Drain { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::LogMsg;
    use crate::core::writer::Latch;
    use std::sync::Arc;

    fn writer(body: &str) -> Writer {
        Writer::new(
            "test".to_string(),
            Arc::new(Latch::new()),
            LogMsg::Standard {
                lvl: 0,
                body: body.to_string(),
            },
        )
    }

    #[test]
    fn pops_in_fifo_order() {
        let (checkin, drain) = unbounded();
        assert!(checkin.push(writer("first")));
        assert!(checkin.push(writer("second")));
        assert_eq!(drain.try_pop().expect("non-empty").msg.body(), "first");
        assert_eq!(drain.try_pop().expect("non-empty").msg.body(), "second");
    }

    #[test]
    fn empty_pop_returns_none() {
        let (_checkin, drain) = unbounded();
        assert!(drain.try_pop().is_none());
    }

    #[test]
    fn push_reports_closed_drain() {
        let (checkin, drain) = unbounded();
        drop(drain);
        assert!(!checkin.push(writer("late")));
    }
}
