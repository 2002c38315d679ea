use crate::models::GuiConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File name of the GUI configuration inside the config directory
pub const CONFIG_FILE_NAME: &str = "quickprompt.yaml";

/// Prefix for environment overrides, e.g. `QUICKPROMPT__EXECUTOR__RUN_TIMEOUT_MS=250`
pub const ENV_PREFIX: &str = "QUICKPROMPT";

/// Configuration manager for loading and saving `quickprompt.yaml`.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            config_path: config_dir.join(CONFIG_FILE_NAME),
            config_dir,
        })
    }

    /// Load the GUI configuration file.
    ///
    /// # Returns
    /// The loaded GuiConfig, or defaults if the file doesn't exist
    pub fn load_config(&self) -> Result<GuiConfig> {
        if !self.config_path.exists() {
            tracing::warn!(
                "Config file not found at {}, using defaults",
                self.config_path
            );
            return Ok(GuiConfig::default());
        }

        let file_contents = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config: {}", self.config_path))?;

        let config: GuiConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse config: {}", self.config_path))?;

        tracing::info!("Loaded config from {}", self.config_path);
        Ok(config)
    }

    /// Load the configuration file with environment overrides layered on top.
    ///
    /// Variables take the form `QUICKPROMPT__<SECTION>__<KEY>`; a missing file is not an error.
    pub fn load_layered(&self) -> Result<GuiConfig> {
        let settings = config::Config::builder()
            .add_source(
                config::File::new(self.config_path.as_str(), config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to layer config sources for {}", self.config_path))?;

        let config: GuiConfig = settings
            .try_deserialize()
            .context("Failed to deserialize layered config")?;

        tracing::debug!("Loaded layered config from {}", self.config_path);
        Ok(config)
    }

    /// Save the GUI configuration file.
    pub fn save_config(&self, config: &GuiConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize config to YAML")?;

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write config: {}", self.config_path))?;

        tracing::info!("Saved config to {}", self.config_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }
}
