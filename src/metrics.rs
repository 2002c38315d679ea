// Runtime counters for UI thread marshalling and prompt traffic

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters shared by the executor and every prompt it creates
///
/// Uses atomic operations so workers and the UI thread can record without locks.
#[derive(Debug)]
pub struct Metrics {
    /// Calls executed in place because the caller was already the UI thread
    pub calls_inline: AtomicU64,

    /// Calls marshalled through the dispatch queue
    pub calls_queued: AtomicU64,

    /// Calls whose caller gave up waiting
    pub calls_timed_out: AtomicU64,

    /// Errors or panics captured on the UI thread and handed back to a caller
    pub failures_propagated: AtomicU64,

    pub submissions_accepted: AtomicU64,

    /// Submissions refused because a widget was disabled
    pub submissions_gated: AtomicU64,

    pub prompts_created: AtomicU64,
    pub prompts_destroyed: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            calls_inline: AtomicU64::new(0),
            calls_queued: AtomicU64::new(0),
            calls_timed_out: AtomicU64::new(0),
            failures_propagated: AtomicU64::new(0),
            submissions_accepted: AtomicU64::new(0),
            submissions_gated: AtomicU64::new(0),
            prompts_created: AtomicU64::new(0),
            prompts_destroyed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_inline_call(&self) {
        self.calls_inline.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_queued_call(&self) {
        self.calls_queued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.calls_timed_out.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures_propagated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_submission(&self, accepted: bool) {
        if accepted {
            self.submissions_accepted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.submissions_gated.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_prompt_created(&self) {
        self.prompts_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_prompt_destroyed(&self) {
        self.prompts_destroyed.fetch_add(1, Ordering::Relaxed);
    }

    /// Prompts created and not yet destroyed
    pub fn live_prompts(&self) -> u64 {
        self.prompts_created
            .load(Ordering::Relaxed)
            .saturating_sub(self.prompts_destroyed.load(Ordering::Relaxed))
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== UI Thread Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "UI calls: {} inline, {} queued, {} timed out, {} failed",
            self.calls_inline.load(Ordering::Relaxed),
            self.calls_queued.load(Ordering::Relaxed),
            self.calls_timed_out.load(Ordering::Relaxed),
            self.failures_propagated.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Submissions: {} accepted, {} gated",
            self.submissions_accepted.load(Ordering::Relaxed),
            self.submissions_gated.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Prompts: {} created, {} destroyed",
            self.prompts_created.load(Ordering::Relaxed),
            self.prompts_destroyed.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
