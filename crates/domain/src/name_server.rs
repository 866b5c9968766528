use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::errors::DomainError;

const DEFAULT_DNS_PORT: u16 = 53;

/// Address family of a textual IP, decided by its separators alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Colons win over dots so IPv4-mapped IPv6 literals are classified as v6.
    pub fn classify(ip: &str) -> Option<Self> {
        if ip.contains(':') {
            Some(Self::V6)
        } else if ip.contains('.') {
            Some(Self::V4)
        } else {
            None
        }
    }
}

/// An upstream resolver endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameServer {
    pub ip: IpAddr,
    pub port: u16,
}

impl NameServer {
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self { ip, port }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}

impl fmt::Display for NameServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.socket_addr())
    }
}

impl FromStr for NameServer {
    type Err = DomainError;

    /// Accepts `ip`, `ip:port`, `[v6]` and `[v6]:port`; the port defaults to 53.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(Self::new(addr.ip(), addr.port()));
        }

        let bare = s.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = bare.parse::<IpAddr>() {
            return Ok(Self::new(ip, DEFAULT_DNS_PORT));
        }

        Err(DomainError::InvalidNameServer(s.to_string()))
    }
}
