// Configuration module entry point
// Loads the typed configuration from file, environment and defaults

mod types;

use std::net::SocketAddr;

pub use types::{
    AssetsConfig, Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig,
    RoutesConfig, ServerConfig,
};

/// Prefix for environment overrides, e.g. `ASSET_SERVER__ASSETS__MODEL_DIR`
const ENV_PREFIX: &str = "ASSET_SERVER";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// The binary passes "config" (i.e. `config.toml`) when no path is given
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("http.server_name", "asset-server/0.1")?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("assets.resources_dir", "./Resources")?
            .set_default("assets.panorama_dir", "Equiretangular")?
            .set_default("assets.model_dir", "Modelos")?
            .set_default("assets.sort_entries", false)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
