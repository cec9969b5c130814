//! Application configuration for orgscrape.
//!
//! User config lives at `~/.orgscrape/orgscrape.toml`.
//! CLI flags override config file values, which override defaults.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OrgScrapeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "orgscrape.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".orgscrape";

// ---------------------------------------------------------------------------
// Config structs (matching orgscrape.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Outbound HTTP settings for page fetches.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// HTTP API settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// CLI batch scraping settings.
    #[serde(default)]
    pub batch: BatchConfig,
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Redirects the HTTP client follows before giving up.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// User-Agent header sent with every fetch.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_max_redirects() -> usize {
    5
}
fn default_user_agent() -> String {
    concat!("orgscrape/", env!("CARGO_PKG_VERSION")).into()
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address for `orgscrape serve`.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Let the API scrape loopback/private hosts. Off for public deployments.
    #[serde(default)]
    pub allow_private_hosts: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            allow_private_hosts: false,
        }
    }
}

impl ServerConfig {
    /// Parse the configured bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind.parse().map_err(|e| {
            OrgScrapeError::config(format!("invalid bind address '{}': {e}", self.bind))
        })
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".into()
}

/// `[batch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum pages fetched at once by `orgscrape scrape`.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    4
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.orgscrape/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| OrgScrapeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.orgscrape/orgscrape.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| OrgScrapeError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        OrgScrapeError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| OrgScrapeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = render_config(&AppConfig::default())?;

    std::fs::write(&path, content).map_err(|e| OrgScrapeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Render a config as pretty TOML.
pub fn render_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| OrgScrapeError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let toml_str = render_config(&AppConfig::default()).expect("serialize default config");
        assert!(toml_str.contains("timeout_secs"));
        assert!(toml_str.contains("127.0.0.1:8080"));
        assert!(toml_str.contains("orgscrape/"));
    }

    #[test]
    fn config_roundtrip() {
        let toml_str = render_config(&AppConfig::default()).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.fetch.timeout_secs, 30);
        assert_eq!(parsed.fetch.max_redirects, 5);
        assert_eq!(parsed.batch.concurrency, 4);
        assert!(!parsed.server.allow_private_hosts);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[server]
bind = "0.0.0.0:9000"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert!(!config.server.allow_private_hosts);
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.batch.concurrency, 4);
    }

    #[test]
    fn bind_address_parsing() {
        let config = ServerConfig::default();
        let addr = config.socket_addr().expect("default bind parses");
        assert_eq!(addr.port(), 8080);

        let bad = ServerConfig {
            bind: "not-an-address".into(),
            allow_private_hosts: false,
        };
        let err = bad.socket_addr().unwrap_err();
        assert!(err.to_string().contains("invalid bind address"));
    }

    #[test]
    fn load_config_from_file() {
        let dir = std::env::temp_dir().join(format!("orgscrape-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("orgscrape.toml");
        std::fs::write(&path, "[fetch]\ntimeout_secs = 5\n").expect("write config");

        let config = load_config_from(&path).expect("load");
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.fetch.max_redirects, 5);

        std::fs::write(&path, "[fetch\n").expect("write broken config");
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
