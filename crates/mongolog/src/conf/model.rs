//! Model: ParserConfig, ParseMode and ConfigError.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::builder::DEFAULT_MAX_DEPTH;
use crate::parser::{ParserLimits, MAX_LINE_SIZE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unknown parse mode '{0}' (expected auto, log-line or document)")]
    InvalidMode(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which grammar each input line goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseMode {
    /// Decide per line: `{` starts a document, anything else is a log line
    #[default]
    Auto,
    LogLine,
    Document,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Auto => "auto",
            ParseMode::LogLine => "log-line",
            ParseMode::Document => "document",
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParseMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ParseMode::Auto),
            "log-line" | "log_line" | "logline" => Ok(ParseMode::LogLine),
            "document" | "doc" => Ok(ParseMode::Document),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub mode: ParseMode,
    /// Input file; `None` or `-` reads stdin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// Output file; `None` or `-` writes stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub max_line_size: usize,
    pub max_depth: usize,
    /// Log and skip lines that fail to parse instead of aborting the run
    pub skip_failures: bool,
    pub pretty: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            mode: ParseMode::Auto,
            input: None,
            output: None,
            max_line_size: MAX_LINE_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            skip_failures: true,
            pretty: false,
        }
    }
}

impl ParserConfig {
    pub fn limits(&self) -> ParserLimits {
        ParserLimits {
            max_line_size: self.max_line_size,
            max_depth: self.max_depth,
        }
    }
}
