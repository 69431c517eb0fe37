use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Calls a closure every `period` on a background thread until dropped.
#[derive(Debug)]
#[must_use = "the interval is cancelled as soon as it is dropped"]
pub(crate) struct Interval {
    cancelled: Arc<AtomicBool>,
}

impl Interval {
    pub(crate) fn new<F>(period: Duration, mut callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        thread::spawn(move || {
            let mut next = Instant::now() + period;
            loop {
                thread::sleep(next.saturating_duration_since(Instant::now()));
                if flag.load(Ordering::Acquire) {
                    break;
                }
                callback();
                next += period;
            }
        });
        Self { cancelled }
    }

    pub(crate) fn cancel(self) {
        drop(self);
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
