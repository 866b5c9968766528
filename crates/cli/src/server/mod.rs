pub mod dns;

pub use dns::{bind_dns_server, run_dns_server};
