// UI module - Everything that touches the UI thread
//
// This module contains:
// - UiThreadExecutor: marshals closures onto the UI thread and back
// - Prompt / PromptRegistry: typed request/response units and the set of live ones
// - Gui / GuiHandle: owns the event loop and hands workers access to it
// - Widget seams, the headless widget set, and ready-made layouts

pub mod event_loop;
pub mod executor;
pub mod gui;
pub mod headless;
pub mod presets;
pub mod prompt;
pub mod registry;
#[cfg(feature = "slint-backend")]
pub mod slint_backend;
pub mod widget;

pub use event_loop::{Dispatcher, EventLoop, LoopDispatcher, LoopDriver, UiJob};
pub use executor::UiThreadExecutor;
pub use gui::{Backend, Gui, GuiHandle};
pub use prompt::{Prompt, PromptId, WaitOptions, WeakPrompt};
pub use registry::PromptRegistry;
