use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{logs, messages};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub logging: LoggingConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/technotes.db".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// Browser origins allowed to call the API with credentials.
    /// Requests without an Origin header are always accepted.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3500,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations) - higher = more CPU work
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,

    /// Throttling policy for the login endpoint.
    pub login_limiter: LoginLimiterConfig,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            login_limiter: LoginLimiterConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginLimiterConfig {
    /// Length of the sliding window.
    pub window_seconds: u64,

    /// Requests admitted per client within one window.
    pub max_requests: u32,

    /// Status returned once the limit is exceeded.
    pub status_code: u16,

    pub message: String,

    /// Event log file (under `logging.log_dir`) that receives rejections.
    pub log_file: String,

    /// Trusted proxy IP addresses allowed to provide forwarded client IP headers.
    ///
    /// When empty, forwarded headers are ignored and the socket peer address
    /// is used.
    pub trusted_proxy_ips: Vec<String>,
}

impl Default for LoginLimiterConfig {
    fn default() -> Self {
        Self {
            window_seconds: 60,
            max_requests: 5,
            status_code: 429,
            message: messages::TOO_MANY_LOGIN_ATTEMPTS.to_string(),
            log_file: logs::ERROR_LOG.to_string(),
            trusted_proxy_ips: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory holding the append-only event log files.
    pub log_dir: String,

    /// Append one line per request to `request_log_file`.
    pub request_log: bool,

    pub request_log_file: String,

    pub error_log_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            request_log: true,
            request_log_file: logs::REQUEST_LOG.to_string(),
            error_log_file: logs::ERROR_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

/// Where [`Config::load`] found its settings. Logged once tracing is up.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    pub file: Option<PathBuf>,

    pub env_file: Option<PathBuf>,
}

impl ConfigSource {
    pub fn log(&self) {
        if let Some(path) = &self.env_file {
            info!("Loaded environment from: {}", path.display());
        }

        match &self.file {
            Some(path) => info!("Loaded config from: {}", path.display()),
            None => info!("No config file found, using defaults"),
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies environment overrides
    /// (a `.env` file in the working directory is read first if present).
    pub fn load() -> Result<(Self, ConfigSource)> {
        let env_file = dotenvy::dotenv().ok();

        let (mut config, file) = Self::load_file()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok((config, ConfigSource { file, env_file }))
    }

    fn load_file() -> Result<(Self, Option<PathBuf>)> {
        Self::load_first(Self::config_paths())
    }

    /// Loads the first existing path and reports which one it was.
    fn load_first(paths: Vec<PathBuf>) -> Result<(Self, Option<PathBuf>)> {
        for path in paths {
            if path.exists() {
                let config = Self::load_from_path(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Overrides file settings with `DATABASE_URL`, `PORT`, `ALLOWED_ORIGINS`
    /// (comma separated) and `LOG_DIR`.
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("DATABASE_URL") {
            self.general.database_path = url;
        }

        if let Some(port) = var("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        if let Some(origins) = var("ALLOWED_ORIGINS") {
            self.server.cors_allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(dir) = var("LOG_DIR") {
            self.logging.log_dir = dir;
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("technotes").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".technotes").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Server host cannot be empty");
        }

        let limiter = &self.security.login_limiter;
        if limiter.window_seconds == 0 {
            anyhow::bail!("Login limiter window must be > 0 seconds");
        }

        if limiter.max_requests == 0 {
            anyhow::bail!("Login limiter max_requests must be > 0");
        }

        if !(400..600).contains(&limiter.status_code) {
            anyhow::bail!(
                "Login limiter status code must be a 4xx or 5xx code, got {}",
                limiter.status_code
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3500);
        assert_eq!(config.security.login_limiter.window_seconds, 60);
        assert_eq!(config.security.login_limiter.max_requests, 5);
        assert_eq!(config.security.login_limiter.status_code, 429);
        assert_eq!(config.security.login_limiter.log_file, "errLog.log");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[security.login_limiter]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [security.login_limiter]
            max_requests = 10
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.security.login_limiter.max_requests, 10);

        assert_eq!(config.security.login_limiter.window_seconds, 60);
        assert_eq!(config.server.port, 3500);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "sqlite:/tmp/other.db"),
            ("PORT", "8080"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
        ]);

        let mut config = Config::default();
        config.apply_env_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.general.database_path, "sqlite:/tmp/other.db");
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.server.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.logging.log_dir, "logs");
    }

    #[test]
    fn test_load_first_reports_source() {
        let dir = std::env::temp_dir().join(format!("technotes-config-{}", uuid::Uuid::new_v4()));
        let missing = dir.join("missing.toml");
        let present = dir.join("config.toml");

        let (config, file) = Config::load_first(vec![missing.clone()]).unwrap();
        assert!(file.is_none());
        assert_eq!(config.server.port, 3500);

        let mut custom = Config::default();
        custom.server.port = 4000;
        custom.save_to_path(&present).unwrap();

        let (config, file) = Config::load_first(vec![missing, present.clone()]).unwrap();
        assert_eq!(file, Some(present));
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = Config::default();
        config.apply_env_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 3500);
    }

    #[test]
    fn test_validate_rejects_bad_limiter() {
        let mut config = Config::default();
        config.security.login_limiter.max_requests = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.security.login_limiter.status_code = 200;
        assert!(config.validate().is_err());
    }
}
