//! Conf module: configuration model and loading.

pub mod model;
pub mod load;

pub use model::{ConfigError, ParseMode, ParserConfig};
pub use load::DEFAULT_CONFIG_FILE;
