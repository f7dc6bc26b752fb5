use contracts::shared::table::normalize_page_size;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub table: TableConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Server-side limits for list and export requests
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct TableConfig {
    pub default_page_size: usize,
    pub export_row_limit: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_page_size: 25,
            export_row_limit: 10_000,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/crm.db"

[server]
host = "0.0.0.0"
port = 3000

[table]
default_page_size = 25
export_row_limit = 10000
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config: Config = toml::from_str(contents)?;
    config.table.default_page_size = normalize_page_size(config.table.default_page_size);
    if config.table.export_row_limit == 0 {
        anyhow::bail!("table.export_row_limit must be greater than zero");
    }
    Ok(config)
}

/// Remember the loaded configuration for request handlers
pub fn install(config: Config) {
    if CONFIG.set(config).is_err() {
        tracing::warn!("Configuration already installed, keeping the first one");
    }
}

/// Table limits of the running server; defaults until `install` is called
pub fn table_settings() -> TableConfig {
    CONFIG.get().map(|c| c.table).unwrap_or_default()
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/crm.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.table.default_page_size, 25);
        assert_eq!(config.table.export_row_limit, 10_000);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = parse_config("[database]\npath = \"crm.db\"\n").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.table.default_page_size, 25);
    }

    #[test]
    fn page_size_is_snapped_to_allowed_set() {
        let config = parse_config(
            "[database]\npath = \"crm.db\"\n[table]\ndefault_page_size = 30\nexport_row_limit = 5\n",
        )
        .unwrap();
        assert_eq!(config.table.default_page_size, 50);
    }

    #[test]
    fn zero_export_limit_is_rejected() {
        let result = parse_config(
            "[database]\npath = \"crm.db\"\n[table]\ndefault_page_size = 25\nexport_row_limit = 0\n",
        );
        assert!(result.is_err());
    }
}
