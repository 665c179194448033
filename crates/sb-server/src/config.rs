use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use sb_core::AppConfig;
use tracing::debug;

/// Environment variable pointing at the TOML config file.
const CONFIG_PATH_VAR: &str = "SHAREBOARD_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "shareboard.toml";

/// Load configuration: TOML file (if present) with environment overrides.
///
/// A missing file is not an error; every section has defaults.
pub fn load() -> Result<AppConfig> {
    let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = read_file(Path::new(&path))?;
    apply_env_overrides(&mut config);
    Ok(config)
}

fn read_file(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(url) = env::var("DATABASE_URL") {
        config.storage.database_url = url;
    }
    if let Ok(addr) = env::var("SHAREBOARD_LISTEN_ADDR") {
        config.server.listen_addr = addr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = read_file(Path::new("/nonexistent/shareboard.toml")).unwrap();
        assert_eq!(config.storage.history_limit, 20);
    }

    #[test]
    fn test_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shareboard.toml");
        fs::write(
            &path,
            r#"
            [server]
            listen_addr = "127.0.0.1:9999"

            [storage]
            database_url = "/tmp/test.db"
            "#,
        )
        .unwrap();

        let config = read_file(&path).unwrap();
        assert_eq!(config.server.listen_addr, "127.0.0.1:9999");
        assert_eq!(config.storage.database_url, "/tmp/test.db");
        assert_eq!(config.storage.history_limit, 20);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shareboard.toml");
        fs::write(&path, "listen_addr = [not toml").unwrap();
        assert!(read_file(&path).is_err());
    }
}
