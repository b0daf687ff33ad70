use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::recipes::store::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_RECIPE_URL,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub url: String,
    /// Local dataset file; takes precedence over `url` when set.
    #[serde(default)]
    pub recipes_file: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_url: Option<String>,
    pub recipes_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/whattoeat/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.source_url {
            self.source.url = url;
            self.source.recipes_file.clear();
        }
        if let Some(path) = overrides.recipes_file {
            self.source.recipes_file = path.display().to_string();
        }
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_recipes_file(&self) -> Option<PathBuf> {
        let path = self.source.recipes_file.trim();
        (!path.is_empty()).then(|| expand_tilde(path))
    }

    /// Resolves `server.host` (an IP or a hostname such as `localhost`) to the
    /// first address it yields.
    pub async fn bind_addr(&self) -> Result<SocketAddr> {
        let target = format!("{}:{}", self.server.host, self.server.port);
        let addr = tokio::net::lookup_host(&target)
            .await
            .with_context(|| format!("invalid server address: {target}"))?
            .next()
            .ok_or_else(|| anyhow!("server address resolved to nothing: {target}"));
        addr
    }

    pub fn default_template() -> String {
        let template = r#"[source]
url = "https://weilei.site/all_recipes.json"
# recipes_file = "~/recipes/all_recipes.json"
cache_ttl_secs = 1800
fetch_timeout_secs = 12

[server]
host = "127.0.0.1"
port = 3000
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            recipes_file: String::new(),
            cache_ttl_secs: default_cache_ttl_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_source_url() -> String {
    DEFAULT_RECIPE_URL.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::{Config, ConfigOverrides};

    #[test]
    fn template_parses_to_defaults() {
        let parsed: Config = toml::from_str(&Config::default_template()).expect("template");
        let defaults = Config::default();
        assert_eq!(parsed.source.url, defaults.source.url);
        assert_eq!(parsed.source.cache_ttl_secs, 1800);
        assert_eq!(parsed.source.fetch_timeout_secs, 12);
        assert_eq!(parsed.server.port, defaults.server.port);
        assert!(parsed.resolved_recipes_file().is_none());
    }

    #[test]
    fn partial_file_keeps_section_defaults() {
        let parsed: Config = toml::from_str("[server]\nport = 8088\n").expect("partial");
        assert_eq!(parsed.server.port, 8088);
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.source.cache_ttl_secs, 1800);
    }

    #[tokio::test]
    async fn overrides_win_over_file_values() {
        let mut config = Config::default();
        config.source.recipes_file = "/tmp/old.json".to_string();
        config.apply_overrides(ConfigOverrides {
            source_url: Some("http://localhost:9000/r.json".to_string()),
            recipes_file: None,
            host: Some("0.0.0.0".to_string()),
            port: Some(8080),
        });
        assert_eq!(config.source.url, "http://localhost:9000/r.json");
        assert!(config.resolved_recipes_file().is_none());
        assert_eq!(config.bind_addr().await.expect("addr").to_string(), "0.0.0.0:8080");

        config.apply_overrides(ConfigOverrides {
            recipes_file: Some(PathBuf::from("/data/recipes.json")),
            ..ConfigOverrides::default()
        });
        assert_eq!(
            config.resolved_recipes_file(),
            Some(PathBuf::from("/data/recipes.json"))
        );
    }

    #[test]
    fn missing_file_loads_defaults() {
        let config =
            Config::load(Some(&PathBuf::from("/nonexistent/whattoeat.toml"))).expect("defaults");
        assert_eq!(config.server.port, 3000);
    }

    #[tokio::test]
    async fn resolves_host_names() {
        let mut config = Config::default();
        config.server.host = "localhost".to_string();
        config.server.port = 3100;
        let addr = config.bind_addr().await.expect("localhost resolves");
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 3100);
    }

    #[tokio::test]
    async fn rejects_bad_bind_address() {
        let mut config = Config::default();
        config.server.host = "not a host".to_string();
        assert!(config.bind_addr().await.is_err());
    }
}
