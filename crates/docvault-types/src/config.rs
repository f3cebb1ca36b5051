//! Configuration loading for docvault.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/docvault/config.toml.

use config::{Config, Environment, File};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::DocvaultError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the RocksDB metadata store
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Path to the Tantivy text index directory
    #[serde(default = "default_search_index_path")]
    pub search_index_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Memory budget for the index writer, in MB
    #[serde(default = "default_index_writer_memory_mb")]
    pub index_writer_memory_mb: usize,

    /// Page size used when a listing request does not carry a limit
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Upper bound applied to any requested page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "docvault")
}

fn default_db_path() -> String {
    project_dirs()
        .map(|p| p.data_local_dir().join("db"))
        .unwrap_or_else(|| PathBuf::from("./data"))
        .to_string_lossy()
        .to_string()
}

fn default_search_index_path() -> String {
    project_dirs()
        .map(|p| p.data_local_dir().join("search-index"))
        .unwrap_or_else(|| PathBuf::from("./search-index"))
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_index_writer_memory_mb() -> usize {
    50
}

fn default_page_size() -> usize {
    10
}

fn default_max_page_size() -> usize {
    100
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            search_index_path: default_search_index_path(),
            log_level: default_log_level(),
            index_writer_memory_mb: default_index_writer_memory_mb(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/docvault/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (DOCVAULT_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, DocvaultError> {
        let config_dir = project_dirs()
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("db_path", default_db_path())
            .map_err(|e| DocvaultError::Config(e.to_string()))?
            .set_default("search_index_path", default_search_index_path())
            .map_err(|e| DocvaultError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| DocvaultError::Config(e.to_string()))?
            .set_default(
                "index_writer_memory_mb",
                default_index_writer_memory_mb() as i64,
            )
            .map_err(|e| DocvaultError::Config(e.to_string()))?
            .set_default("default_page_size", default_page_size() as i64)
            .map_err(|e| DocvaultError::Config(e.to_string()))?
            .set_default("max_page_size", default_max_page_size() as i64)
            .map_err(|e| DocvaultError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // DOCVAULT_DB_PATH, DOCVAULT_LOG_LEVEL, ...
        // Keys contain underscores, so nesting uses a double underscore.
        builder = builder.add_source(
            Environment::with_prefix("DOCVAULT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| DocvaultError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| DocvaultError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), DocvaultError> {
        if self.index_writer_memory_mb == 0 {
            return Err(DocvaultError::Config(
                "index_writer_memory_mb must be > 0".to_string(),
            ));
        }
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(DocvaultError::Config("page sizes must be > 0".to_string()));
        }
        if self.default_page_size > self.max_page_size {
            return Err(DocvaultError::Config(format!(
                "default_page_size ({}) exceeds max_page_size ({})",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(())
    }

    /// Expand ~ in db_path to the home directory
    pub fn expanded_db_path(&self) -> PathBuf {
        expand_home(&self.db_path)
    }

    /// Expand ~ in search_index_path to the home directory
    pub fn expanded_search_index_path(&self) -> PathBuf {
        expand_home(&self.search_index_path)
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(dirs) = BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.index_writer_memory_mb, 50);
        assert_eq!(settings.default_page_size, 10);
        assert_eq!(settings.max_page_size, 100);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_with_defaults() {
        let settings = Settings::load(None).unwrap();
        assert!(settings.default_page_size <= settings.max_page_size);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("docvault.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "db_path = \"/srv/docvault/db\"").unwrap();
        writeln!(file, "default_page_size = 25").unwrap();

        let settings = Settings::load(Some(&path.to_string_lossy())).unwrap();
        assert_eq!(settings.db_path, "/srv/docvault/db");
        assert_eq!(settings.default_page_size, 25);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Settings::load(Some("/nonexistent/docvault-config.toml"));
        assert!(matches!(result, Err(DocvaultError::Config(_))));
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::default();
        settings.index_writer_memory_mb = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.default_page_size = 500;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.max_page_size = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_expand_home() {
        let settings = Settings {
            db_path: "/absolute/db".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.expanded_db_path(), PathBuf::from("/absolute/db"));

        let expanded = expand_home("~/docvault/index");
        assert!(expanded.ends_with("docvault/index"));
    }
}
