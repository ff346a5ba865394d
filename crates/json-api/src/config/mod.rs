//! Server configuration module

use clap::Parser;

use crate::config::{catalog::CatalogConfig, logging::LoggingConfig, server::ServerRuntimeConfig};

pub(crate) mod catalog;
pub(crate) mod logging;
pub(crate) mod server;

/// Carte JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "carte-json", about = "Carte JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Restaurant catalog settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use std::{path::Path, time::Duration};

    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_bind_all_interfaces_and_read_catalog_yml() -> TestResult {
        let config = ServerConfig::try_parse_from(["carte-json"])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698");
        assert_eq!(
            config.server.shutdown_grace_period(),
            Some(Duration::from_secs(10))
        );
        assert_eq!(config.catalog.catalog_path, Path::new("catalog.yml"));
        assert!(!config.catalog.reload);

        Ok(())
    }

    #[test]
    fn flags_override_defaults() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "carte-json",
            "-H",
            "127.0.0.1",
            "--port",
            "9000",
            "--catalog",
            "/srv/catalog.yml",
            "--catalog-reload",
            "--log-format",
            "json",
            "--shutdown-grace-seconds",
            "0",
        ])?;

        assert_eq!(config.socket_addr(), "127.0.0.1:9000");
        assert_eq!(config.catalog.catalog_path, Path::new("/srv/catalog.yml"));
        assert!(config.catalog.reload);
        assert_eq!(config.server.shutdown_grace_period(), None);
        assert!(matches!(
            config.logging.log_format,
            logging::LogFormat::Json
        ));

        Ok(())
    }
}
