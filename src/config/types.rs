// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Interface to bind; `0.0.0.0` by default so the demo is reachable
    /// from other devices on the LAN
    pub host: String,
    pub port: u16,
    /// Document root the preview is served from
    pub root: String,
    /// Files tried in order when a directory is requested
    pub index_files: Vec<String>,
    /// Tokio worker threads (defaults to CPU core count)
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// `combined`, `common`, `json`, or a custom pattern
    pub format: String,
    pub access_log_file: Option<String>,
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}
