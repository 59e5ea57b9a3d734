//! Delivery of synchronization outcomes onto the host's own thread.
//!
//! Workers never run a completion callback themselves. They post it together
//! with the outcome, and the host runs whatever is queued when it drains.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tracing::warn;

pub type CompletionCallback = Box<dyn FnOnce(bool) + Send + 'static>;

struct Delivery {
    callback: CompletionCallback,
    success:  bool,
}

pub fn completion_queue() -> (CompletionSender, CompletionQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CompletionSender { tx }, CompletionQueue { rx })
}

#[derive(Clone)]
pub struct CompletionSender {
    tx: UnboundedSender<Delivery>,
}

impl CompletionSender {
    fn deliver(&self, callback: CompletionCallback, success: bool) {
        if self.tx.send(Delivery { callback, success }).is_err() {
            warn!(success, "completion queue is gone, dropping synchronization outcome");
        }
    }
}

/// Host side of the completion channel.
///
/// Running callbacks needs `&mut self`, so only one thread can be running them at
/// any time.
pub struct CompletionQueue {
    rx: UnboundedReceiver<Delivery>,
}

impl CompletionQueue {
    /// Run every completion queued so far, in arrival order. Returns how many ran.
    pub fn drain(&mut self) -> usize {
        let mut ran = 0;
        while let Some(delivery) = self.try_next() {
            (delivery.callback)(delivery.success);
            ran += 1;
        }
        ran
    }

    /// Wait for the next completion and run it.
    ///
    /// Returns `None` once every sender is gone and the queue is empty.
    pub async fn run_next(&mut self) -> Option<bool> {
        let delivery = self.rx.recv().await?;
        (delivery.callback)(delivery.success);
        Some(delivery.success)
    }

    fn try_next(&mut self) -> Option<Delivery> {
        match self.rx.try_recv() {
            Ok(delivery) => Some(delivery),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

/// A callback owed exactly one outcome.
///
/// Dropping it unreported, as happens when its task is aborted, reports failure.
pub(crate) struct PendingCompletion {
    callback: Option<CompletionCallback>,
    sender:   CompletionSender,
}

impl PendingCompletion {
    pub(crate) fn new(callback: CompletionCallback, sender: CompletionSender) -> Self {
        Self {
            callback: Some(callback),
            sender,
        }
    }

    pub(crate) fn report(mut self, success: bool) {
        if let Some(callback) = self.callback.take() {
            self.sender.deliver(callback, success);
        }
    }
}

impl Drop for PendingCompletion {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            self.sender.deliver(callback, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recording(log: &Arc<Mutex<Vec<(u32, bool)>>>, id: u32) -> CompletionCallback {
        let log = Arc::clone(log);
        Box::new(move |ok: bool| log.lock().unwrap().push((id, ok)))
    }

    #[test]
    fn callbacks_run_only_when_drained() {
        let (sender, mut queue) = completion_queue();
        let log = Arc::new(Mutex::new(Vec::new()));

        PendingCompletion::new(recording(&log, 1), sender.clone()).report(true);
        PendingCompletion::new(recording(&log, 2), sender).report(false);
        assert!(log.lock().unwrap().is_empty());

        assert_eq!(queue.drain(), 2);
        assert_eq!(*log.lock().unwrap(), vec![(1, true), (2, false)]);
        assert_eq!(queue.drain(), 0);
    }

    #[test]
    fn dropped_pending_reports_failure_once() {
        let (sender, mut queue) = completion_queue();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(None));

        let pending = {
            let calls = Arc::clone(&calls);
            let seen = Arc::clone(&seen);
            PendingCompletion::new(
                Box::new(move |ok: bool| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    *seen.lock().unwrap() = Some(ok);
                }),
                sender,
            )
        };
        drop(pending);

        assert_eq!(queue.drain(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*seen.lock().unwrap(), Some(false));
    }

    #[test]
    fn reporting_after_queue_is_gone_does_not_panic() {
        let (sender, queue) = completion_queue();
        drop(queue);
        PendingCompletion::new(Box::new(|_: bool| {}), sender).report(true);
    }

    #[tokio::test]
    async fn run_next_waits_for_a_delivery() {
        let (sender, mut queue) = completion_queue();
        let task = tokio::spawn(async move {
            PendingCompletion::new(Box::new(|_: bool| {}), sender).report(true);
        });
        assert_eq!(queue.run_next().await, Some(true));
        task.await.unwrap();
        assert_eq!(queue.run_next().await, None);
    }

    #[test]
    fn completions_posted_while_draining_run_in_the_same_drain() {
        let (sender, mut queue) = completion_queue();
        let log = Arc::new(Mutex::new(Vec::new()));

        let chained = {
            let log = Arc::clone(&log);
            let sender = sender.clone();
            Box::new(move |ok: bool| {
                log.lock().unwrap().push((1, ok));
                PendingCompletion::new(recording(&log, 2), sender).report(true);
            })
        };
        PendingCompletion::new(chained, sender).report(false);

        assert_eq!(queue.drain(), 2);
        assert_eq!(*log.lock().unwrap(), vec![(1, false), (2, true)]);
    }
}
