use crate::models::ValueKind;
use crate::ui::prompt::PromptId;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by the executor, prompts, and the prompt registry.
#[derive(Error, Debug)]
pub enum GuiError {
    /// The requested response type is not one of bool, integer, float, or string
    #[error("Response values of type {0} are not supported")]
    UnsupportedValueType(&'static str),

    #[error("Prompt {0} has been destroyed")]
    PromptDestroyed(PromptId),

    /// The caller stopped waiting; the queued work still runs later
    #[error("UI thread call timed out after {0:?}")]
    Timeout(Duration),

    /// An error returned by a closure executed on the UI thread
    #[error("UI thread call failed: {0}")]
    Propagated(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("UI thread call panicked: {0}")]
    Panicked(String),

    #[error("The UI event loop has stopped")]
    EventLoopClosed,

    #[error("Waiting for a response on the UI thread would deadlock")]
    WaitOnUiThread,

    #[error("Prompt return type must be set before widgets are attached")]
    MissingReturnType,

    #[error("Prompt return type is already fixed")]
    ReturnTypeLocked,

    #[error("Expected a {expected} response, got {found}")]
    ValueTypeMismatch { expected: ValueKind, found: ValueKind },

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("The event loop must run on the thread that created the GUI")]
    NotOnUiThread,

    #[error("Failed to spawn worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("GUI backend error: {0}")]
    Backend(String),
}

impl GuiError {
    /// Wrap an error returned by UI-thread work so it can be downcast by the caller.
    pub fn propagated<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        GuiError::Propagated(Box::new(error))
    }

    /// Borrow the original error of a [`GuiError::Propagated`] failure.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            GuiError::Propagated(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self, GuiError::PromptDestroyed(_))
    }
}

pub type Result<T, E = GuiError> = std::result::Result<T, E>;
