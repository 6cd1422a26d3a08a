// Configuration module entry point
// Layers defaults, an optional glserve.toml, environment variables,
// and the single positional CLI argument (port)

mod types;

use std::net::SocketAddr;

pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig};

impl Config {
    /// Load configuration from the default `glserve.toml` location
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("glserve")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("GLSERVE"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.root", ".")?
            .set_default(
                "server.index_files",
                vec!["index.html".to_string(), "index.htm".to_string()],
            )?
            .set_default("logging.access_log", true)?
            .set_default("logging.format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Parse the single optional positional argument: an integer TCP port.
///
/// Returns `Ok(None)` when no argument is given, `Err` when the argument
/// is not a valid port number.
pub fn port_from_args(mut args: impl Iterator<Item = String>) -> Result<Option<u16>, String> {
    match args.nth(1) {
        None => Ok(None),
        Some(arg) => arg
            .parse::<u16>()
            .map(Some)
            .map_err(|_| format!("Invalid port argument: '{arg}' (expected an integer)")),
    }
}
