use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock seconds since the Unix epoch; cache expiry is absolute in this unit.
#[inline]
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
