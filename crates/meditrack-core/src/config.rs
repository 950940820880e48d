use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable that overrides `base_url` (useful for staging deployments).
pub const API_URL_ENV: &str = "MEDITRACK_API_URL";

/// Default API root when neither the config file nor the environment set one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5166/api/v1";

/// Endpoint paths relative to `base_url` (optional `[endpoints]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPaths {
    pub sign_in: String,
    pub sign_up: String,
    pub users: String,
    pub doctors: String,
    pub caregivers: String,
    pub admins: String,
    pub senior_citizens: String,
    pub organizations: String,
    pub relatives: String,
    pub devices: String,
    pub alerts: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            sign_in: "/authentication/sign-in".to_string(),
            sign_up: "/authentication/sign-up".to_string(),
            users: "/users".to_string(),
            doctors: "/doctors".to_string(),
            caregivers: "/caregivers".to_string(),
            admins: "/admins".to_string(),
            senior_citizens: "/senior-citizens".to_string(),
            organizations: "/organizations".to_string(),
            relatives: "/relatives".to_string(),
            devices: "/devices".to_string(),
            alerts: "/alerts".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/meditrack/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root of the REST API, e.g. `http://localhost:5166/api/v1`.
    pub base_url: String,
    /// Seconds allowed for establishing a connection.
    pub connect_timeout_secs: u64,
    /// Optional whole-request timeout in seconds (None = wait indefinitely).
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Premium relative sign-ups must carry a confirmed payment.
    #[serde(default)]
    pub require_payment_confirmation: bool,
    #[serde(default)]
    pub endpoints: EndpointPaths,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 15,
            request_timeout_secs: None,
            require_payment_confirmation: false,
            endpoints: EndpointPaths::default(),
        }
    }
}

impl ClientConfig {
    /// Apply `MEDITRACK_API_URL` if set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            self.apply_base_url_override(&url);
        }
        self
    }

    fn apply_base_url_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.base_url = url.to_string();
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("meditrack")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ClientConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ClientConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg.with_env_overrides());
    }

    let data =
        fs::read_to_string(&path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ClientConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg.with_env_overrides())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.base_url, "http://localhost:5166/api/v1");
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert!(cfg.request_timeout_secs.is_none());
        assert!(!cfg.require_payment_confirmation);
        assert_eq!(cfg.endpoints.sign_in, "/authentication/sign-in");
        assert_eq!(cfg.endpoints.senior_citizens, "/senior-citizens");
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ClientConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ClientConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.base_url, cfg.base_url);
        assert_eq!(parsed.endpoints, cfg.endpoints);
    }

    #[test]
    fn config_toml_partial_endpoints_fall_back_to_defaults() {
        let toml = r#"
            base_url = "https://api.example.org/v2"
            connect_timeout_secs = 5
            request_timeout_secs = 30
            require_payment_confirmation = true

            [endpoints]
            doctors = "/medics"
        "#;
        let cfg: ClientConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.base_url, "https://api.example.org/v2");
        assert_eq!(cfg.request_timeout_secs, Some(30));
        assert!(cfg.require_payment_confirmation);
        assert_eq!(cfg.endpoints.doctors, "/medics");
        assert_eq!(cfg.endpoints.caregivers, "/caregivers");
    }

    #[test]
    fn config_toml_without_endpoints_section() {
        let toml = r#"
            base_url = "http://127.0.0.1:9000/api"
            connect_timeout_secs = 2
        "#;
        let cfg: ClientConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.endpoints, EndpointPaths::default());
    }

    #[test]
    fn blank_base_url_override_is_ignored() {
        let mut cfg = ClientConfig::default();
        cfg.apply_base_url_override("   ");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        cfg.apply_base_url_override(" https://staging.example.org/api/v1 ");
        assert_eq!(cfg.base_url, "https://staging.example.org/api/v1");
    }
}
