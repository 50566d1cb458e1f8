//! SurfsUp Core Library
//!
//! Shared utilities for the climate API binary:
//! - Configuration file discovery and loading (XDG-compliant)
//! - File system checks

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigSource};
pub use fs::is_file;

/// Application name used for XDG paths
pub const APP_NAME: &str = "surfsup";

/// Name of the config file searched for in standard locations
pub const CONFIG_FILE_NAME: &str = "surfsup.toml";

/// Environment variable holding an explicit config file path
pub const CONFIG_ENV_VAR: &str = "SURFSUP_CONFIG";

/// Default API port
pub const DEFAULT_API_PORT: u16 = 5000;

/// Default location of the observation snapshot
pub const DEFAULT_DATABASE_PATH: &str = "./Resources/hawaii.sqlite";

/// Default upper bound on a single store query, in seconds
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;
