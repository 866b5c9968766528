use serde::{Deserialize, Serialize};

use super::local_records::LocalRecord;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Upstreams in priority order, primary first. Exactly two are expected.
    #[serde(default = "default_name_servers")]
    pub name_servers: Vec<String>,

    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Budget for a single upstream exchange, in milliseconds.
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,

    /// Budget for the whole failover walk, in milliseconds.
    #[serde(default = "default_resolve_timeout_ms")]
    pub resolve_timeout_ms: u64,

    #[serde(default = "default_true")]
    pub use_hosts: bool,

    #[serde(default)]
    pub hosts_file: Option<String>,

    #[serde(default)]
    pub local_records: Vec<LocalRecord>,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            name_servers: default_name_servers(),
            cache_max_entries: default_cache_max_entries(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            resolve_timeout_ms: default_resolve_timeout_ms(),
            use_hosts: default_true(),
            hosts_file: None,
            local_records: Vec::new(),
        }
    }
}

impl DnsConfig {
    /// Configured hosts file, or the platform default location.
    pub fn hosts_file_path(&self) -> &str {
        match &self.hosts_file {
            Some(path) => path,
            None => default_hosts_file(),
        }
    }
}

fn default_name_servers() -> Vec<String> {
    vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()]
}

fn default_cache_max_entries() -> usize {
    1000
}

fn default_attempt_timeout_ms() -> u64 {
    1500
}

fn default_resolve_timeout_ms() -> u64 {
    3000
}

fn default_true() -> bool {
    true
}

#[cfg(unix)]
fn default_hosts_file() -> &'static str {
    "/etc/hosts"
}

#[cfg(windows)]
fn default_hosts_file() -> &'static str {
    "C:\\Windows\\System32\\drivers\\etc\\hosts"
}

#[cfg(not(any(unix, windows)))]
fn default_hosts_file() -> &'static str {
    "hosts"
}
