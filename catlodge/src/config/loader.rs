//! Engine configuration loading.
//!
//! Precedence, highest first: builder overrides, environment variables
//! (`CATLODGE_DATA_DIR`, `CATLODGE_LOCK_WAIT_SECONDS`), the YAML file,
//! built-in defaults.

use std::env;
use std::path::PathBuf;

use crate::error::Result;

use super::schema::EngineConfig;

/// Builder assembling the engine configuration from its sources.
///
/// # Examples
///
/// ```
/// use catlodge::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new().build().unwrap();
/// assert!(config.data_dir.is_none() || config.data_dir.is_some());
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    file: Option<PathBuf>,
    data_dir: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Creates a builder with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the builder at a YAML configuration file. A missing file is
    /// not an error; the defaults apply.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Overrides the data directory (e.g. from a CLI flag). Wins over both
    /// the file and the environment.
    #[must_use]
    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.data_dir = dir;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn build(self) -> Result<EngineConfig> {
        let mut config = match &self.file {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(path)?;
                serde_yaml::from_str(&text)?
            }
            _ => EngineConfig::default(),
        };

        if let Ok(dir) = env::var("CATLODGE_DATA_DIR") {
            if !dir.is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(secs) = env::var("CATLODGE_LOCK_WAIT_SECONDS") {
            if let Ok(secs) = secs.parse() {
                config.maximum_lock_wait_seconds = Some(secs);
            }
        }

        if let Some(dir) = self.data_dir {
            config.data_dir = Some(dir);
        }

        Ok(config)
    }
}
