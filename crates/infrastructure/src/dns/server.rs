pub mod handler;
pub mod listener;

pub use handler::DnsRequestHandler;
pub use listener::UdpDnsServer;
