// Widget seams consumed by prompts
//
// Prompts never know about concrete widgets. They track handles through these traits:
// - `Widget`: anything whose interaction state can be toggled
// - `Region`: a container whose children a prompt tears down on destroy
// - `KeyTarget`: the window-level key handler prompts bind to and unbind from
//
// Handles are `Arc`s so they can move across threads inside a prompt, but they are only
// ever touched from the UI thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static NEXT_WIDGET_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    pub fn next() -> Self {
        WidgetId(NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    #[error("{kind} widgets have no interaction state")]
    Unsupported { kind: &'static str },

    #[error("Widget {0:?} has been destroyed")]
    Destroyed(WidgetId),
}

pub trait Widget: Send + Sync {
    fn widget_id(&self) -> WidgetId;

    fn kind(&self) -> &'static str;

    /// Enable or disable user interaction
    fn set_enabled(&self, enabled: bool) -> Result<(), WidgetError>;

    fn is_enabled(&self) -> bool;

    /// Remove the widget from the screen; later state changes fail
    fn destroy(&self);

    /// Trigger the widget's primary action as if the user had activated it
    ///
    /// # Returns
    /// `true` if an action fired
    fn invoke(&self) -> bool {
        false
    }
}

pub trait Region: Send + Sync {
    fn add_child(&self, child: WidgetHandle);

    /// Destroy and detach every child
    ///
    /// # Returns
    /// The number of children removed
    fn clear_children(&self) -> usize;

    fn child_count(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyBindingId(pub u64);

/// A keypress delivered to window-level bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub ch: char,
}

pub type KeyCallback = Arc<dyn Fn(&KeyEvent) + Send + Sync>;

pub trait KeyTarget: Send + Sync {
    fn bind(&self, callback: KeyCallback) -> KeyBindingId;

    /// # Returns
    /// `false` if the binding was not registered
    fn unbind(&self, id: KeyBindingId) -> bool;
}

pub type WidgetHandle = Arc<dyn Widget>;
pub type RegionHandle = Arc<dyn Region>;
pub type KeyTargetHandle = Arc<dyn KeyTarget>;
