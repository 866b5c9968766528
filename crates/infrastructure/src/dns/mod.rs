pub mod buffer_pool;
pub mod cache;
pub mod forwarding;
pub mod hosts;
pub mod server;
pub mod transport;
pub mod upstream;

pub use buffer_pool::{BufferPool, PooledBuffer};
pub use cache::{CacheRepository, CachedAnswer};
pub use hosts::StaticHostTable;
pub use server::{DnsRequestHandler, UdpDnsServer};
pub use upstream::{UpstreamResolver, UpstreamTimeouts};
