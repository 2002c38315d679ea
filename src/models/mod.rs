//! Data models for quickprompt.
//!
//! - [`Value`] / [`ValueKind`]: the typed slot a prompt stores its answer in
//! - [`Response`]: an answer paired with the clock reading at submission
//! - [`GuiConfig`]: window, clock, executor, prompt, and logging settings loaded from `quickprompt.yaml`

pub mod config;
pub mod value;

pub use config::{ClockKind, ExecutorConfig, GuiConfig, LoggingConfig, PromptConfig, WindowConfig};
pub use value::{Response, Value, ValueKind};
