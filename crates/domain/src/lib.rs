//! SimpleDNS Domain Layer
pub mod config;
pub mod errors;
pub mod name_server;

pub use config::{CliOverrides, Config, ConfigError, DnsConfig, LocalRecord, LoggingConfig, ServerConfig};
pub use errors::DomainError;
pub use name_server::{IpVersion, NameServer};
