//! Gateway configuration loading and management.

use serde::{Deserialize, Serialize};
use std::path::Path;

use trellis_core::{AgentEndpoints, RegistryConfig};

/// Full configuration for the Trellis gateway.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// API server settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Upstream agent endpoints.
    #[serde(default)]
    pub agent: AgentEndpoints,

    /// Trust registry settings.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API listen address.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// API port.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_listen_addr() -> String {
    "127.0.0.1".into()
}
fn default_api_port() -> u16 {
    3000
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_api_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ApiConfig {
    /// The full listen address in `host:port` form.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.port)
    }
}

impl GatewayConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: GatewayConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.api.port, 3000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.agent.governance_url, "http://localhost:8021");
        assert_eq!(config.registry.url, "http://localhost:8001");
    }

    #[test]
    fn test_socket_addr() {
        let config = GatewayConfig::default();
        assert_eq!(config.api.socket_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = GatewayConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let decoded: GatewayConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(decoded.api.port, config.api.port);
        assert_eq!(decoded.agent.member_url, config.agent.member_url);
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let config = GatewayConfig::load(Path::new("/nonexistent/trellis.toml")).unwrap();
        assert_eq!(config.api.port, 3000);
    }

    #[test]
    fn test_config_from_toml_partial() {
        let toml_str = r#"
[api]
port = 8080

[agent]
default_api_key = "shared-key"
"#;
        let config: GatewayConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.agent.default_api_key.as_deref(), Some("shared-key"));
        // Defaults for unspecified
        assert_eq!(config.api.listen_addr, "127.0.0.1");
        assert_eq!(config.agent.ecosystem_url, "http://localhost:8031");
        assert_eq!(config.logging.format, "text");
    }
}
