//! Configuration file loading for botbatch
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables prefixed with `BOTBATCH_` (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./botbatch.toml` or `./.botbatch.toml`
//! 4. Global: `$XDG_CONFIG_HOME/botbatch/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBatchConfig, FileConfig, FileDirectLineConfig, FileDispatchConfig,
    FileLoggingConfig, FileRoutingConfig,
};
pub use loader::ConfigLoader;
