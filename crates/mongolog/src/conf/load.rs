//! Load: config loading from file and environment variables.

use std::path::Path;

use super::model::{ConfigError, ParserConfig};
use crate::parser::builder::MAX_DEPTH_CEILING;

pub const DEFAULT_CONFIG_FILE: &str = "mongolog.toml";

impl ParserConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("MONGOLOG_CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::debug!("Config file not found at {}, using environment variables", config_path);
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load an explicitly requested file (must exist), then apply
    /// environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Loading configuration from: {}", path.display());
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Override fields from `MONGOLOG_*` variables. Unparseable values are
    /// logged and ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fn parsed<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
            let raw = raw?;
            match raw.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring {}={:?}: not a valid value", key, raw);
                    None
                }
            }
        }

        if let Some(mode) = parsed("MONGOLOG_MODE", lookup("MONGOLOG_MODE")) {
            self.mode = mode;
        }
        if let Some(size) = parsed("MONGOLOG_MAX_LINE_SIZE", lookup("MONGOLOG_MAX_LINE_SIZE")) {
            self.max_line_size = size;
        }
        if let Some(depth) = parsed("MONGOLOG_MAX_DEPTH", lookup("MONGOLOG_MAX_DEPTH")) {
            self.max_depth = depth;
        }
        if let Some(skip) = parsed("MONGOLOG_SKIP_FAILURES", lookup("MONGOLOG_SKIP_FAILURES")) {
            self.skip_failures = skip;
        }
        if let Some(pretty) = parsed("MONGOLOG_PRETTY", lookup("MONGOLOG_PRETTY")) {
            self.pretty = pretty;
        }
    }

    /// Validate that configuration values are sane
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_line_size == 0 {
            return Err(ConfigError::Invalid("max_line_size must be > 0".to_string()));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be > 0".to_string()));
        }
        if self.max_depth > MAX_DEPTH_CEILING {
            return Err(ConfigError::Invalid(format!(
                "max_depth must be <= {} (got {})",
                MAX_DEPTH_CEILING, self.max_depth
            )));
        }
        Ok(())
    }
}
