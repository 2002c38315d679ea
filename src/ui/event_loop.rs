// Event loop seam between the executor and a GUI toolkit
//
// The executor only needs two things from a toolkit: a way to queue a closure onto the
// loop thread, and a way to stop the loop. `Dispatcher` is that seam. `EventLoop` is the
// portable single-threaded loop shipped with the crate; the Slint backend implements the
// same trait over `slint::invoke_from_event_loop`.

use crate::error::GuiError;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tokio::sync::mpsc;

/// A unit of work queued onto the UI thread
pub type UiJob = Box<dyn FnOnce() + Send + 'static>;

/// Queues work onto a toolkit's event loop
pub trait Dispatcher: Send + Sync {
    /// Enqueue `job` to run on the loop thread. Jobs from one thread run in FIFO order.
    fn dispatch(&self, job: UiJob) -> Result<(), GuiError>;

    /// Ask the loop to stop after the job currently running
    fn quit(&self) -> Result<(), GuiError>;
}

/// Owns the blocking run of an event loop on the current thread
pub trait LoopDriver: Send {
    fn run(self: Box<Self>) -> Result<(), GuiError>;
}

enum LoopMessage {
    Job(UiJob),
    Quit,
}

/// Portable single-threaded event loop
///
/// Runs on the thread that calls [`EventLoop::run`] and executes queued jobs one at a time
/// until [`Dispatcher::quit`] is received. Jobs still queued at quit are dropped, which
/// releases any caller waiting on them with [`GuiError::EventLoopClosed`].
pub struct EventLoop {
    rx: mpsc::UnboundedReceiver<LoopMessage>,
}

/// Cloneable sending side of an [`EventLoop`]
#[derive(Clone)]
pub struct LoopDispatcher {
    tx: mpsc::UnboundedSender<LoopMessage>,
}

impl EventLoop {
    pub fn new() -> (Self, LoopDispatcher) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, LoopDispatcher { tx })
    }

    /// Run until quit or until every dispatcher is dropped.
    ///
    /// # Returns
    /// The number of jobs executed
    pub fn run_blocking(mut self) -> usize {
        tracing::debug!("Event loop started");
        let mut executed = 0;

        while let Some(message) = self.rx.blocking_recv() {
            match message {
                LoopMessage::Job(job) => {
                    if catch_unwind(AssertUnwindSafe(job)).is_err() {
                        tracing::warn!("UI job panicked; event loop continues");
                    }
                    executed += 1;
                }
                LoopMessage::Quit => break,
            }
        }

        self.rx.close();
        tracing::debug!("Event loop stopped after {} jobs", executed);
        executed
    }
}

impl LoopDriver for EventLoop {
    fn run(self: Box<Self>) -> Result<(), GuiError> {
        self.run_blocking();
        Ok(())
    }
}

impl Dispatcher for LoopDispatcher {
    fn dispatch(&self, job: UiJob) -> Result<(), GuiError> {
        self.tx
            .send(LoopMessage::Job(job))
            .map_err(|_| GuiError::EventLoopClosed)
    }

    fn quit(&self) -> Result<(), GuiError> {
        self.tx
            .send(LoopMessage::Quit)
            .map_err(|_| GuiError::EventLoopClosed)
    }
}
