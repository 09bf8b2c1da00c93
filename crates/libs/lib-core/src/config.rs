//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! The configuration is built once in the binary and handed down explicitly to
//! the server, adapters and bridge; there is no process-wide instance.
//!
//! ```rust,no_run
//! use lib_core::Config;
//!
//! let config = Config::from_env()?;
//! config.validate()?;
//! # Ok::<(), String>(())
//! ```

use lib_utils::{get_env, get_env_or, get_env_parse_or, validate_min, validate_not_empty};
use std::path::PathBuf;
use std::time::Duration;

/// Default base URL of the hosted assistant API.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default listen address.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Credential for the hosted assistant API
    pub openai_api_key: String,

    /// Identity of the assistant every run is started against
    pub assistant_id: String,

    /// Base URL of the hosted assistant API
    pub openai_base_url: String,

    /// Address the HTTP server listens on
    pub bind_address: String,

    /// Base URL the realtime bridge posts chat requests to
    ///
    /// Defaults to `http://<bind_address>` so the bridge calls its own HTTP surface.
    pub deployment_url: String,

    /// Execution mode (`production`, `development`, ...)
    pub app_env: String,

    /// Delay between two run status checks, in milliseconds
    pub poll_interval_ms: u64,

    /// Maximum number of run status checks before giving up
    pub poll_max_attempts: u32,

    /// Timeout for each outbound HTTP request, in seconds
    pub http_timeout_secs: u64,

    /// Directory uploads are staged in before they are forwarded
    pub upload_dir: PathBuf,

    /// Maximum accepted request body size for uploads
    pub max_upload_bytes: usize,

    /// CORS origins; a single `*` allows any origin
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let openai_api_key = get_env("OPENAI_API_KEY").map_err(|e| e.to_string())?;
        let assistant_id = get_env("ASSISTANT_ID").map_err(|e| e.to_string())?;

        let openai_base_url = get_env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let bind_address = get_env_or("BIND_ADDRESS", DEFAULT_BIND_ADDRESS);
        let deployment_url = get_env_or("DEPLOYMENT_URL", &format!("http://{}", bind_address))
            .trim_end_matches('/')
            .to_string();
        let app_env = get_env_or("APP_ENV", "development").to_lowercase();

        let poll_interval_ms = get_env_parse_or("POLL_INTERVAL_MS", 1000).map_err(|e| e.to_string())?;
        let poll_max_attempts = get_env_parse_or("POLL_MAX_ATTEMPTS", 300).map_err(|e| e.to_string())?;
        let http_timeout_secs = get_env_parse_or("HTTP_TIMEOUT_SECS", 30).map_err(|e| e.to_string())?;
        let max_upload_bytes =
            get_env_parse_or("MAX_UPLOAD_BYTES", 25 * 1024 * 1024).map_err(|e| e.to_string())?;

        let upload_dir = get_env("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("uploads"));

        let allowed_origins = get_env_or("ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            openai_api_key,
            assistant_id,
            openai_base_url,
            bind_address,
            deployment_url,
            app_env,
            poll_interval_ms,
            poll_max_attempts,
            http_timeout_secs,
            upload_dir,
            max_upload_bytes,
            allowed_origins,
        })
    }

    /// Replace the bind address.
    ///
    /// A `deployment_url` that was derived from the old bind address follows
    /// the new one; an explicitly configured URL is kept.
    pub fn override_bind_address(&mut self, bind_address: impl Into<String>) {
        let bind_address = bind_address.into();
        if self.deployment_url == format!("http://{}", self.bind_address) {
            self.deployment_url = format!("http://{}", bind_address);
        }
        self.bind_address = bind_address;
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        validate_not_empty(&self.openai_api_key, "OPENAI_API_KEY")?;
        validate_not_empty(&self.assistant_id, "ASSISTANT_ID")?;
        validate_min(self.poll_interval_ms, 1, "POLL_INTERVAL_MS")?;
        validate_min(u64::from(self.poll_max_attempts), 1, "POLL_MAX_ATTEMPTS")?;
        validate_min(self.http_timeout_secs, 1, "HTTP_TIMEOUT_SECS")?;

        if !self.openai_base_url.starts_with("http://") && !self.openai_base_url.starts_with("https://") {
            return Err("OPENAI_BASE_URL must be an http(s) URL".to_string());
        }
        if !self.deployment_url.starts_with("http://") && !self.deployment_url.starts_with("https://") {
            return Err("DEPLOYMENT_URL must be an http(s) URL".to_string());
        }

        Ok(())
    }

    /// Whether the realtime listener should be started.
    ///
    /// Production deployments only serve the request/response endpoints.
    pub fn realtime_enabled(&self) -> bool {
        self.app_env != "production"
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"***REDACTED***")
            .field("assistant_id", &self.assistant_id)
            .field("openai_base_url", &self.openai_base_url)
            .field("bind_address", &self.bind_address)
            .field("deployment_url", &self.deployment_url)
            .field("app_env", &self.app_env)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("poll_max_attempts", &self.poll_max_attempts)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("upload_dir", &self.upload_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("allowed_origins", &self.allowed_origins)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            openai_api_key: "sk-test".to_string(),
            assistant_id: "asst_test".to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            deployment_url: "http://127.0.0.1:3000".to_string(),
            app_env: "development".to_string(),
            poll_interval_ms: 1000,
            poll_max_attempts: 300,
            http_timeout_secs: 30,
            upload_dir: std::env::temp_dir().join("uploads"),
            max_upload_bytes: 1024,
            allowed_origins: vec!["*".to_string()],
        }
    }

    #[test]
    fn test_bind_override_moves_derived_deployment_url() {
        let mut config = test_config();
        config.override_bind_address("127.0.0.1:8080");

        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.deployment_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_bind_override_keeps_explicit_deployment_url() {
        let mut config = Config {
            deployment_url: "https://relay.example.com".to_string(),
            ..test_config()
        };
        config.override_bind_address("0.0.0.0:8080");

        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.deployment_url, "https://relay.example.com");
    }

    #[test]
    fn test_valid_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_zero_poll_attempts_rejected() {
        let config = Config {
            poll_max_attempts: 0,
            ..test_config()
        };
        assert_eq!(
            config.validate(),
            Err("POLL_MAX_ATTEMPTS must be at least 1".to_string())
        );
    }

    #[test]
    fn test_bad_deployment_url_rejected() {
        let config = Config {
            deployment_url: "localhost:3000".to_string(),
            ..test_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_realtime_gated_by_app_env() {
        assert!(test_config().realtime_enabled());
        let config = Config {
            app_env: "production".to_string(),
            ..test_config()
        };
        assert!(!config.realtime_enabled());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", test_config());
        assert!(!rendered.contains("sk-test"));
        assert!(rendered.contains("REDACTED"));
    }
}
