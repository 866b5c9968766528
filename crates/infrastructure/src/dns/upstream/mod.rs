pub mod deadline;
pub mod failover;

pub use deadline::with_deadline;
pub use failover::{Upstream, UpstreamResolver, UpstreamTimeouts};
