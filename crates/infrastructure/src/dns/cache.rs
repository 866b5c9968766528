pub mod coarse_clock;
pub mod key;
pub mod metrics;
pub mod repository;

pub use coarse_clock::unix_now;
pub use key::{normalize_domain, CacheKey};
pub use metrics::{CacheMetrics, CacheMetricsSnapshot};
pub use repository::{CacheRepository, CachedAnswer};
