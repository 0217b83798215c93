// Configuration module for the demo binary
// The library core takes a plain (host, port); everything here is wiring.

use serde::Deserialize;

/// Binary-side configuration, loaded from `config.toml` plus `SERVER_*`
/// environment overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Content directories the demo site serves from
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    pub public_dir: String,
    pub template_dir: String,
    pub posts_dir: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Access log file path (optional, stdout if not set)
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    pub error_log_file: Option<String>,
}

impl Config {
    /// Load configuration from the default `config.toml` location.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 4287)?
            .set_default("site.public_dir", "public")?
            .set_default("site.template_dir", "templates")?
            .set_default("site.posts_dir", "posts")?
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let cfg = Config::load_from("does-not-exist").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 4287);
        assert_eq!(cfg.site.template_dir, "templates");
        assert!(cfg.logging.access_log_file.is_none());
    }
}
