//! Sleep-then-resync scheduler
//!
//! One cycle runs to completion, then the loop sleeps for the configured
//! interval and goes again. Exactly one cycle is ever in flight. The loop
//! accepts a cancellation token checked between cycles (and during the
//! sleep), so tests and embedders can shut it down without killing the
//! process.

use crate::sync::Synchronizer;
use crate::types::{EventSink, SyncEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Sleep is sliced so cancellation is observed promptly even with long
/// intervals.
const POLL_SLICE: Duration = Duration::from_millis(50);

/// Cloneable cancellation handle shared between the loop and its owner
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop after the current cycle (or sleep)
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Run synchronization cycles until the token is cancelled.
///
/// Per-cycle failures are reported through the sink and never break the
/// loop: a missing source skips the cycle, anything else is logged as a
/// failed cycle, and the scheduler sleeps and retries.
pub fn run_loop(
    sync: &Synchronizer,
    sink: &dyn EventSink,
    interval: Duration,
    token: &CancelToken,
) {
    sink.emit(&SyncEvent::MirrorStarted {
        source: sync.source().to_path_buf(),
        replica: sync.replica().to_path_buf(),
    });

    while !token.is_cancelled() {
        sink.emit(&SyncEvent::CycleStarted);

        match sync.synchronize(sink) {
            Ok(stats) => sink.emit(&SyncEvent::CycleCompleted { stats }),
            // A missing source was already reported through the sink.
            Err(e) if e.is_source_missing() => {}
            Err(e) => sink.emit(&SyncEvent::CycleFailed {
                message: e.to_string(),
            }),
        }

        if !sleep_with_cancel(interval, token) {
            break;
        }
    }
}

/// Sleep for `interval` in short slices. Returns false when cancelled.
fn sleep_with_cancel(interval: Duration, token: &CancelToken) -> bool {
    let deadline = Instant::now() + interval;

    loop {
        if token.is_cancelled() {
            return false;
        }

        let now = Instant::now();
        if now >= deadline {
            return true;
        }

        thread::sleep(POLL_SLICE.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use std::fs;

    #[test]
    fn test_cancelled_token_runs_no_cycle() {
        let src = tempfile::tempdir().expect("create src tempdir");
        let dst = tempfile::tempdir().expect("create dst tempdir");
        let sync = Synchronizer::with_roots(src.path(), dst.path());
        let sink = MemorySink::new();

        let token = CancelToken::new();
        token.cancel();

        run_loop(&sync, &sink, Duration::from_secs(1), &token);

        assert!(!sink
            .events()
            .iter()
            .any(|e| matches!(e, SyncEvent::CycleStarted)));
    }

    #[test]
    fn test_loop_stops_on_cancellation() {
        let src = tempfile::tempdir().expect("create src tempdir");
        let dst = tempfile::tempdir().expect("create dst tempdir");
        fs::write(src.path().join("a.txt"), b"a").expect("write source file");

        let sync = Synchronizer::with_roots(src.path(), dst.path());
        let sink = MemorySink::new();
        let token = CancelToken::new();

        let handle = {
            let sync = sync.clone();
            let sink = sink.clone();
            let token = token.clone();
            thread::spawn(move || run_loop(&sync, &sink, Duration::from_millis(10), &token))
        };

        // Give the loop time for at least one full cycle, then stop it.
        thread::sleep(Duration::from_millis(200));
        token.cancel();
        handle.join().expect("scheduler thread should exit");

        let events = sink.events();
        assert!(events
            .iter()
            .any(|e| matches!(e, SyncEvent::MirrorStarted { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, SyncEvent::CycleCompleted { .. })));
        assert!(dst.path().join("a.txt").exists());
    }

    #[test]
    fn test_missing_source_does_not_break_the_loop() {
        let dst = tempfile::tempdir().expect("create dst tempdir");
        let sync = Synchronizer::with_roots(std::path::Path::new("/nonexistent/source"), dst.path());
        let sink = MemorySink::new();
        let token = CancelToken::new();

        let handle = {
            let sync = sync.clone();
            let sink = sink.clone();
            let token = token.clone();
            thread::spawn(move || run_loop(&sync, &sink, Duration::from_millis(10), &token))
        };

        thread::sleep(Duration::from_millis(150));
        token.cancel();
        handle.join().expect("scheduler thread should exit");

        let missing = sink
            .events()
            .iter()
            .filter(|e| matches!(e, SyncEvent::SourceMissing { .. }))
            .count();
        assert!(missing >= 2, "loop should keep retrying, got {missing}");
    }
}
