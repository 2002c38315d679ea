// UiThreadExecutor - Synchronous marshalling of work onto the UI thread
//
// Toolkits only allow widget mutation from the thread running their event loop. The
// executor remembers which thread that is and offers:
// - `run()`: execute a closure on the UI thread and block until its result is back
// - `try_run()`: the same for fallible closures, propagating their error
// - `post()`: fire-and-forget queueing
//
// Calls made from the UI thread itself run inline, so nested calls never deadlock.

use crate::error::{GuiError, Result};
use crate::metrics::Metrics;
use crate::ui::event_loop::Dispatcher;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, ThreadId};
use std::time::Duration;

/// Executes closures on the UI thread on behalf of any thread
///
/// Cloning is cheap: clones share the dispatcher, the thread identity, and the metrics.
///
/// # Example
/// ```ignore
/// let (event_loop, dispatcher) = EventLoop::new();
/// let executor = UiThreadExecutor::new(Arc::new(dispatcher));
///
/// let worker = executor.clone();
/// std::thread::spawn(move || {
///     let answer = worker.run(|| 21 * 2).unwrap();
///     assert_eq!(answer, 42);
///     worker.quit().unwrap();
/// });
///
/// event_loop.run_blocking();
/// ```
#[derive(Clone)]
pub struct UiThreadExecutor {
    ui_thread: ThreadId,
    dispatcher: Arc<dyn Dispatcher>,
    default_timeout: Option<Duration>,
    metrics: Arc<Metrics>,
}

impl UiThreadExecutor {
    /// Create an executor whose UI thread is the current thread
    pub fn new(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self::for_thread(thread::current().id(), dispatcher)
    }

    /// Create an executor for a loop running on another, already known thread
    pub fn for_thread(ui_thread: ThreadId, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            ui_thread,
            dispatcher,
            default_timeout: None,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Bound applied by [`run`](Self::run) and [`try_run`](Self::try_run)
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn ui_thread(&self) -> ThreadId {
        self.ui_thread
    }

    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Execute `f` on the UI thread and return its result.
    ///
    /// Uses the executor's default timeout. A panic inside `f` is caught on the UI thread
    /// and returned as [`GuiError::Panicked`].
    pub fn run<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.run_with_timeout(f, self.default_timeout)
    }

    /// Execute `f` on the UI thread, giving up the wait after `timeout`.
    ///
    /// On [`GuiError::Timeout`] the queued call is not cancelled: it still runs and its
    /// result is dropped.
    pub fn run_with_timeout<F, R>(&self, f: F, timeout: Option<Duration>) -> Result<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.is_ui_thread() {
            self.metrics.record_inline_call();
            let outcome = capture(f);
            if outcome.is_err() {
                self.metrics.record_failure();
            }
            return outcome;
        }

        // Capacity 1: the UI side sends exactly once and never blocks, even if the
        // caller has already stopped listening.
        let (done_tx, done_rx) = mpsc::sync_channel::<Result<R>>(1);
        let metrics = self.metrics.clone();

        self.dispatcher.dispatch(Box::new(move || {
            let outcome = capture(f);
            if outcome.is_err() {
                metrics.record_failure();
            }
            if done_tx.send(outcome).is_err() {
                tracing::debug!("Caller stopped waiting; discarding UI call result");
            }
        }))?;
        self.metrics.record_queued_call();

        match timeout {
            Some(limit) => match done_rx.recv_timeout(limit) {
                Ok(outcome) => outcome,
                Err(RecvTimeoutError::Timeout) => {
                    self.metrics.record_timeout();
                    tracing::warn!("UI thread call timed out after {:?}", limit);
                    Err(GuiError::Timeout(limit))
                }
                Err(RecvTimeoutError::Disconnected) => Err(GuiError::EventLoopClosed),
            },
            None => done_rx.recv().map_err(|_| GuiError::EventLoopClosed)?,
        }
    }

    /// Execute `f` on the UI thread with a snapshot of `args`.
    ///
    /// The snapshot is taken with `Clone` before the call is queued: plain data is copied,
    /// shared handles such as `Arc` widgets are passed through as the same reference.
    pub fn run_with<A, F, R>(&self, f: F, args: &A) -> Result<R>
    where
        A: Clone + Send + 'static,
        F: FnOnce(A) -> R + Send + 'static,
        R: Send + 'static,
    {
        let snapshot = args.clone();
        self.run(move || f(snapshot))
    }

    /// Execute a fallible closure on the UI thread.
    ///
    /// An `Err` from `f` comes back as [`GuiError::Propagated`]; use
    /// [`GuiError::downcast_ref`] to recover the original error.
    pub fn try_run<F, T, E>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> std::result::Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.run(f)?.map_err(|e| {
            self.metrics.record_failure();
            GuiError::propagated(e)
        })
    }

    /// Queue `f` on the UI thread without waiting for it.
    ///
    /// From the UI thread itself the closure is still queued, so it runs after the
    /// current callback returns.
    pub fn post<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.dispatcher.dispatch(Box::new(move || {
            if let Err(e) = capture(f) {
                tracing::warn!("Posted UI job failed: {}", e);
            }
        }))
    }

    /// Stop the event loop
    pub fn quit(&self) -> Result<()> {
        tracing::info!("Requesting UI event loop shutdown");
        self.dispatcher.quit()
    }
}

fn capture<F, R>(f: F) -> Result<R>
where
    F: FnOnce() -> R,
{
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| GuiError::Panicked(panic_message(&*payload)))
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
