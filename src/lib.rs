// quickprompt - Worker-thread application logic with timestamped user responses
//
// This is the library crate: the UI-thread executor, prompts, the prompt registry, and
// the clock. The binary crate (main.rs) is a small reaction-time demo.

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod ui;

// Re-export commonly used types for convenience
pub use clock::{Clock, MonotonicClock, SharedClock, WallClock};
pub use config::ConfigManager;
pub use error::{GuiError, Result};
pub use models::{GuiConfig, Response, Value, ValueKind};
pub use ui::{Gui, GuiHandle, Prompt, PromptRegistry, UiThreadExecutor, WaitOptions};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
