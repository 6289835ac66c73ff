mod types;

pub use types::*;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::path::{Path, PathBuf};

/// Environment variables that override file settings.
pub const ENV_STORE_PATH: &str = "ARTVAULT_STORE_PATH";
pub const ENV_SEED_PATH: &str = "ARTVAULT_SEED_PATH";
pub const ENV_IMAGES_DIR: &str = "ARTVAULT_IMAGES_DIR";
pub const ENV_PORT: &str = "PORT";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./artvault.toml",
        "./config.toml",
        "~/.config/artvault/config.toml",
        "/etc/artvault/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    // Return default config if no file found
    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    validate_config(&config)?;
    Ok(config)
}

/// Apply environment variable overrides on top of file settings
fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(path) = env_path(ENV_STORE_PATH) {
        config.storage.store_path = path;
    }
    if let Some(path) = env_path(ENV_SEED_PATH) {
        config.storage.seed_path = Some(path);
    }
    if let Some(path) = env_path(ENV_IMAGES_DIR) {
        config.storage.images_dir = path;
    }
    if let Ok(port) = std::env::var(ENV_PORT) {
        if !port.trim().is_empty() {
            config.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{} is not a valid port: {:?}", ENV_PORT, port))?;
        }
    }
    Ok(())
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| PathBuf::from(shellexpand::tilde(&v).as_ref()))
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.server.body_limit_mb == 0 {
        anyhow::bail!("Server body_limit_mb cannot be 0");
    }

    for origin in &config.server.allowed_origins {
        if origin == "*" {
            anyhow::bail!("Wildcard origin is not allowed; list origins explicitly");
        }
        if HeaderValue::from_str(origin).is_err() {
            anyhow::bail!("Allowed origin is not a valid header value: {:?}", origin);
        }
    }

    if config.storage.store_path.as_os_str().is_empty() {
        anyhow::bail!("Storage store_path cannot be empty");
    }

    if let Some(ref dir) = config.server.public_dir {
        if !dir.exists() {
            tracing::warn!("Public asset directory does not exist: {:?}", dir);
        }
    }

    if !config.storage.images_dir.exists() {
        tracing::warn!(
            "Artwork image directory does not exist: {:?}",
            config.storage.images_dir
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [ENV_STORE_PATH, ENV_SEED_PATH, ENV_IMAGES_DIR, ENV_PORT] {
            std::env::remove_var(name);
        }
    }

    fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("artvault.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.body_limit_bytes(), 50 * 1024 * 1024);
        assert_eq!(config.server.api_key_env, "OPENAI_API_KEY");
        assert_eq!(
            config.storage.store_path,
            PathBuf::from("data/art_database.json")
        );
        assert!(config.storage.seed_path.is_none());
    }

    #[test]
    #[serial]
    fn test_load_config_from_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
[server]
host = "127.0.0.1"
port = 8088
allowed_origins = ["https://art.example.com"]

[storage]
store_path = "/var/data/art_database.json"
seed_path = "/app/seed/art_database.json"
"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.allowed_origins, vec!["https://art.example.com"]);
        assert_eq!(config.server.body_limit_mb, 50);
        assert_eq!(
            config.storage.seed_path,
            Some(PathBuf::from("/app/seed/art_database.json"))
        );
        assert_eq!(
            config.storage.images_dir,
            PathBuf::from("public/images/artworks")
        );
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[storage]\nstore_path = \"from-file.json\"\n");

        std::env::set_var(ENV_STORE_PATH, "/disk/art_database.json");
        std::env::set_var(ENV_SEED_PATH, "/seed/art_database.json");
        std::env::set_var(ENV_PORT, "9000");
        let config = load_config(&path);
        clear_env();

        let config = config.unwrap();
        assert_eq!(
            config.storage.store_path,
            PathBuf::from("/disk/art_database.json")
        );
        assert_eq!(
            config.storage.seed_path,
            Some(PathBuf::from("/seed/art_database.json"))
        );
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    #[serial]
    fn test_invalid_port_env() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "");
        std::env::set_var(ENV_PORT, "not-a-port");
        let result = load_config(&path);
        clear_env();
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_rejects_wildcard_origin() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[server]\nallowed_origins = [\"*\"]\n");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Wildcard"));
    }

    #[test]
    #[serial]
    fn test_rejects_zero_port_and_body_limit() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[server]\nport = 0\n");
        assert!(load_config(&path).is_err());

        let path = write_config(&dir, "[server]\nbody_limit_mb = 0\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    #[serial]
    fn test_invalid_toml() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[server\nport = ");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    #[serial]
    fn test_ai_api_key_from_env() {
        let mut server = ServerConfig::default();
        server.api_key_env = "ARTVAULT_TEST_AI_KEY".to_string();

        std::env::remove_var("ARTVAULT_TEST_AI_KEY");
        assert_eq!(server.ai_api_key(), None);

        std::env::set_var("ARTVAULT_TEST_AI_KEY", "  ");
        assert_eq!(server.ai_api_key(), None);

        std::env::set_var("ARTVAULT_TEST_AI_KEY", "sk-test");
        assert_eq!(server.ai_api_key().as_deref(), Some("sk-test"));
        std::env::remove_var("ARTVAULT_TEST_AI_KEY");
    }
}
