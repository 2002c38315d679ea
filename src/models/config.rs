use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration from quickprompt.yaml
///
/// Every section falls back to its defaults when missing, so an empty file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    pub window: WindowConfig,
    pub clock: ClockKind,
    pub executor: ExecutorConfig,
    pub prompts: PromptConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "quickprompt".to_string(),
            min_width: 700,
            min_height: 400,
        }
    }
}

/// Time source used for response and presentation timestamps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockKind {
    /// Seconds since the Unix epoch
    #[default]
    Wall,
    /// Seconds since the clock was created, never goes backwards
    Monotonic,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Default bound for blocking UI thread calls; unbounded when absent
    pub run_timeout_ms: Option<u64>,
}

impl ExecutorConfig {
    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Enable a prompt's widgets before blocking on its response
    pub enable_on_wait: bool,

    /// Disable a prompt's widgets once a response has been read
    pub disable_on_response: bool,

    pub wait_timeout_ms: Option<u64>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            enable_on_wait: true,
            disable_on_response: true,
            wait_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: String,
    pub prefix: String,
    pub debug: bool,
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: "logs".to_string(),
            prefix: "quickprompt".to_string(),
            debug: false,
            console: true,
        }
    }
}
