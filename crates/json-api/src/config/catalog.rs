//! Catalog Config

use std::path::PathBuf;

use clap::Args;

/// Restaurant catalog settings.
#[derive(Debug, Args)]
pub struct CatalogConfig {
    /// YAML file holding restaurants and their discount rules
    #[arg(long = "catalog", env = "CATALOG_PATH", default_value = "catalog.yml")]
    pub catalog_path: PathBuf,

    /// Re-read the catalog file on every request instead of once at startup
    #[arg(long = "catalog-reload", env = "CATALOG_RELOAD")]
    pub reload: bool,
}
