use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use crate::name_server::NameServer;

const MIN_PACKET_SIZE: usize = 512;
const MAX_PACKET_SIZE: usize = 4096;
const NAME_SERVER_COUNT: usize = 2;

/// Main configuration structure for SimpleDNS
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (bind address, port, packet size)
    #[serde(default)]
    pub server: ServerConfig,

    /// Resolution configuration (upstreams, cache, static hosts)
    #[serde(default)]
    pub dns: DnsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. simpledns.toml in current directory
    /// 3. /etc/simpledns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("simpledns.toml").exists() {
            Self::from_file("simpledns.toml")?
        } else if std::path::Path::new("/etc/simpledns/config.toml").exists() {
            Self::from_file("/etc/simpledns/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.no_hosts {
            self.dns.use_hosts = false;
        }
    }

    /// Parsed upstreams, primary first.
    pub fn name_servers(&self) -> Result<Vec<NameServer>, ConfigError> {
        self.dns
            .name_servers
            .iter()
            .map(|s| {
                s.parse::<NameServer>()
                    .map_err(|e| ConfigError::Validation(e.to_string()))
            })
            .collect()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_address.trim().parse::<IpAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "Invalid bind address '{}'",
                self.server.bind_address
            )));
        }

        if !self.logging.is_known_level() {
            return Err(ConfigError::Validation(format!(
                "Unknown log level '{}'",
                self.logging.level
            )));
        }

        if !(MIN_PACKET_SIZE..=MAX_PACKET_SIZE).contains(&self.server.max_packet_size) {
            return Err(ConfigError::Validation(format!(
                "max_packet_size must be between {} and {}, got {}",
                MIN_PACKET_SIZE, MAX_PACKET_SIZE, self.server.max_packet_size
            )));
        }

        if self.dns.name_servers.len() != NAME_SERVER_COUNT {
            return Err(ConfigError::Validation(format!(
                "Exactly {} name servers are required, got {}",
                NAME_SERVER_COUNT,
                self.dns.name_servers.len()
            )));
        }

        for server in self.name_servers()? {
            if server.port == 0 {
                return Err(ConfigError::Validation(format!(
                    "Name server {} has port 0",
                    server.ip
                )));
            }
        }

        if self.dns.cache_max_entries == 0 {
            return Err(ConfigError::Validation(
                "cache_max_entries cannot be 0".to_string(),
            ));
        }

        if self.dns.attempt_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "attempt_timeout_ms cannot be 0".to_string(),
            ));
        }

        if self.dns.attempt_timeout_ms > self.dns.resolve_timeout_ms {
            return Err(ConfigError::Validation(format!(
                "attempt_timeout_ms ({}) exceeds resolve_timeout_ms ({})",
                self.dns.attempt_timeout_ms, self.dns.resolve_timeout_ms
            )));
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
    pub no_hosts: bool,
}
