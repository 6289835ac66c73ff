use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// General public assets, served for any path no route claims
    #[serde(default = "default_public_dir")]
    pub public_dir: Option<PathBuf>,

    /// Maximum request body size in megabytes (inline base64 images are large)
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// Origins that receive CORS headers
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Environment variable holding the AI service API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3001
}
fn default_public_dir() -> Option<PathBuf> {
    Some(PathBuf::from("public"))
}
fn default_body_limit_mb() -> usize {
    50
}
fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl ServerConfig {
    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb.saturating_mul(1024 * 1024)
    }

    /// Read the AI service API key from the environment.
    ///
    /// Unset and empty variables both count as "no key".
    pub fn ai_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
            body_limit_mb: default_body_limit_mb(),
            allowed_origins: default_allowed_origins(),
            api_key_env: default_api_key_env(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Writable record store
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Read-only seed copied to `store_path` on first start
    #[serde(default)]
    pub seed_path: Option<PathBuf>,

    /// Per-record image files, served under /images/artworks
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/art_database.json")
}
fn default_images_dir() -> PathBuf {
    PathBuf::from("public/images/artworks")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            seed_path: None,
            images_dir: default_images_dir(),
        }
    }
}
