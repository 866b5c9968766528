use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid name server: {0}")]
    InvalidNameServer(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Cache construction failed: {0}")]
    CacheConstruction(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport connection reset by {server}")]
    TransportConnectionReset { server: String },

    #[error("Response id {received} does not match query id {expected} from {server}")]
    TransportIdMismatch {
        server: String,
        expected: u16,
        received: u16,
    },

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,
}
