//! Configuration loading for huginnd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.huginn/config.toml` (user)
//! 3. `/etc/huginn/config.toml` (system)
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.huginn/secrets.toml` (user, must be 0600)
//! 2. `/etc/huginn/secrets.toml` (system, must be 0600)

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::TtlPolicy;
use crate::providers::{BuiltinProvider, DEFAULT_BASE_URL, DEFAULT_LOCALE, ProxyPool};
use crate::{HuginnError, Result};

/// Environment variable holding a JSON list of proxy URLs.
pub const PROXIES_ENV_VAR: &str = "HUGINN_PROXIES";

/// Environment variable holding the session credential.
pub const CREDENTIAL_ENV_VAR: &str = "HUGINN_SESSION_CREDENTIAL";

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamSection,
    #[serde(default)]
    pub proxies: ProxiesConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:3000".to_string()
}

/// Extraction service connection.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Backend used when a request names none (default: gogoanime).
    #[serde(default = "default_provider")]
    pub default_provider: String,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            default_provider: default_provider(),
        }
    }
}

impl UpstreamSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_provider() -> String {
    BuiltinProvider::DEFAULT.as_str().to_string()
}

/// Egress proxy list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxiesConfig {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Which cache store backs the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Memory,
    Redis,
    None,
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    /// Required when `backend = "redis"`.
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Memory store capacity (default: 10000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// Optional key prefix.
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub ttl: TtlConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            redis_url: None,
            max_entries: default_max_entries(),
            namespace: None,
            ttl: TtlConfig::default(),
        }
    }
}

fn default_max_entries() -> u64 {
    10_000
}

/// TTLs in seconds. Omitted values keep the policy defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TtlConfig {
    pub listing_secs: Option<u64>,
    pub item_weekday_secs: Option<u64>,
    pub item_weekend_secs: Option<u64>,
    pub sources_secs: Option<u64>,
}

impl TtlConfig {
    pub fn policy(&self) -> TtlPolicy {
        let defaults = TtlPolicy::default();
        let or = |secs: Option<u64>, fallback: Duration| {
            secs.map(Duration::from_secs).unwrap_or(fallback)
        };
        TtlPolicy {
            listing: or(self.listing_secs, defaults.listing),
            item_weekday: or(self.item_weekday_secs, defaults.item_weekday),
            item_weekend: or(self.item_weekend_secs, defaults.item_weekend),
            sources: or(self.sources_secs, defaults.sources),
        }
    }
}

/// Session acquisition for session-requiring backends.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Token endpoint. Without it, session-requiring backends fail to
    /// resolve.
    #[serde(default)]
    pub auth_url: Option<String>,
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auth_url: None,
            default_locale: default_locale(),
        }
    }
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

/// Secrets configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub session: Option<SessionSecret>,
}

/// Credential used to acquire sessions.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSecret {
    pub credential: String,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.huginn/config.toml`
    /// 3. `/etc/huginn/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        let content = fs::read_to_string(&path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            HuginnError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(HuginnError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".huginn").join("config.toml");
            if user_config.exists() {
                return Ok(user_config);
            }
        }

        let system_config = PathBuf::from("/etc/huginn/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }

        Err(HuginnError::Configuration(
            "No config file found. Create ~/.huginn/config.toml or /etc/huginn/config.toml"
                .to_string(),
        ))
    }

    /// The proxy pool, with `HUGINN_PROXIES` taking precedence over the
    /// file's `[proxies] urls`.
    pub fn proxy_pool(&self) -> Result<ProxyPool> {
        self.proxy_pool_with(std::env::var(PROXIES_ENV_VAR).ok().as_deref())
    }

    fn proxy_pool_with(&self, env_value: Option<&str>) -> Result<ProxyPool> {
        match env_value {
            Some(raw) if !raw.trim().is_empty() => ProxyPool::from_json(raw),
            _ => ProxyPool::new(&self.proxies.urls),
        }
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.huginn/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/huginn/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists (the credential may come
    /// from the environment).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".huginn").join("secrets.toml");
            if user_secrets.exists() {
                Self::check_permissions(&user_secrets)?;
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/huginn/secrets.toml");
        if system_secrets.exists() {
            Self::check_permissions(&system_secrets)?;
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            HuginnError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(HuginnError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// The session credential, falling back to `HUGINN_SESSION_CREDENTIAL`.
    pub fn credential(&self) -> Option<String> {
        self.credential_with(std::env::var(CREDENTIAL_ENV_VAR).ok())
    }

    fn credential_with(&self, env_value: Option<String>) -> Option<String> {
        self.session
            .as_ref()
            .map(|s| s.credential.clone())
            .or(env_value)
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.address, "127.0.0.1:3000");
        assert_eq!(config.upstream.timeout_secs, 30);
        assert_eq!(config.upstream.default_provider, "gogoanime");
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.session.default_locale, "en-US");
        assert_eq!(config.cache.ttl.policy(), TtlPolicy::default());
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [server]
            address = "0.0.0.0:3000"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.address, "0.0.0.0:3000");
        // Defaults preserved
        assert_eq!(config.cache.max_entries, 10_000);
        assert!(config.proxies.urls.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "127.0.0.1:3000"

            [upstream]
            base_url = "http://extractor:3001"
            timeout_secs = 10
            default_provider = "zoro"

            [proxies]
            urls = ["http://10.0.0.1:8080", "socks5://10.0.0.2:1080"]

            [cache]
            backend = "redis"
            redis_url = "redis://127.0.0.1:6379"
            namespace = "huginn"

            [cache.ttl]
            listing_secs = 120
            sources_secs = 60

            [session]
            auth_url = "http://auth.local/token"
            default_locale = "ja-JP"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.upstream.timeout(), Duration::from_secs(10));
        assert_eq!(config.upstream.default_provider, "zoro");
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.cache.namespace.as_deref(), Some("huginn"));

        let ttl = config.cache.ttl.policy();
        assert_eq!(ttl.listing, Duration::from_secs(120));
        assert_eq!(ttl.sources, Duration::from_secs(60));
        assert_eq!(ttl.item_weekday, TtlPolicy::default().item_weekday);

        assert_eq!(config.proxy_pool_with(None).unwrap().len(), 2);
        assert_eq!(config.session.default_locale, "ja-JP");
    }

    #[test]
    fn parse_cache_disabled() {
        let config: Config = toml::from_str("[cache]\nbackend = \"none\"").unwrap();
        assert_eq!(config.cache.backend, CacheBackend::None);
    }

    #[test]
    fn proxy_env_overrides_file() {
        let config: Config = toml::from_str("[proxies]\nurls = [\"http://a:1\"]").unwrap();
        let pool = config
            .proxy_pool_with(Some(r#"["http://b:1","http://c:1"]"#))
            .unwrap();
        assert_eq!(pool.len(), 2);

        assert_eq!(config.proxy_pool_with(Some("")).unwrap().len(), 1);
        assert!(config.proxy_pool_with(Some("not json")).is_err());
    }

    #[test]
    fn parse_secrets() {
        let toml = r#"
            [session]
            credential = "refresh-token"
        "#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(
            secrets.session.as_ref().unwrap().credential,
            "refresh-token"
        );
    }

    #[test]
    fn credential_prefers_file_over_env() {
        let secrets = Secrets {
            session: Some(SessionSecret {
                credential: "from-file".to_string(),
            }),
        };
        assert_eq!(
            secrets.credential_with(Some("from-env".to_string())),
            Some("from-file".to_string())
        );
        assert_eq!(
            Secrets::default().credential_with(Some("from-env".to_string())),
            Some("from-env".to_string())
        );
        assert_eq!(Secrets::default().credential_with(None), None);
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[cfg(unix)]
    #[test]
    fn insecure_secrets_are_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, "[session]\ncredential = \"x\"\n").unwrap();

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(Secrets::check_permissions(&path).is_err());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
        assert!(Secrets::check_permissions(&path).is_ok());
        let secrets = Secrets::load_from_file(&path).unwrap();
        assert_eq!(secrets.credential_with(None).as_deref(), Some("x"));
    }
}
