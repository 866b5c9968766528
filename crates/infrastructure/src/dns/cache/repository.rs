use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use hickory_proto::op::Message;
use hickory_proto::rr::{Name, RecordType};
use lru::LruCache;
use rustc_hash::FxBuildHasher;
use simpledns_domain::DomainError;
use tracing::debug;

use super::key::CacheKey;
use super::metrics::CacheMetrics;

/// A decoded upstream response and the absolute second at which it stops being served.
#[derive(Debug, Clone)]
pub struct CachedAnswer {
    pub response: Message,
    pub expires_at: u64,
}

impl CachedAnswer {
    pub fn new(response: Message, expires_at: u64) -> Self {
        Self {
            response,
            expires_at,
        }
    }

    #[inline]
    pub fn is_stale(&self, now: u64) -> bool {
        self.expires_at <= now
    }

    /// Seconds left before expiry, floored at zero.
    #[inline]
    pub fn remaining_ttl(&self, now: u64) -> u32 {
        self.expires_at
            .saturating_sub(now)
            .min(u64::from(u32::MAX)) as u32
    }
}

/// Bounded LRU store of upstream answers keyed by (name, type).
///
/// Staleness is detected on read: a stale hit is removed and reported as a
/// miss. Capacity eviction follows LRU order and ignores TTL. Readers get
/// their own copy of the stored message.
pub struct CacheRepository {
    entries: Mutex<LruCache<CacheKey, CachedAnswer, FxBuildHasher>>,
    capacity: NonZeroUsize,
    metrics: CacheMetrics,
}

impl CacheRepository {
    pub fn new(capacity: usize) -> Result<Self, DomainError> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            DomainError::CacheConstruction("capacity must be greater than zero".to_string())
        })?;

        Ok(Self {
            entries: Mutex::new(LruCache::with_hasher(capacity, FxBuildHasher)),
            capacity,
            metrics: CacheMetrics::default(),
        })
    }

    fn entries(&self) -> MutexGuard<'_, LruCache<CacheKey, CachedAnswer, FxBuildHasher>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, now: u64, name: &Name, record_type: RecordType) -> Option<CachedAnswer> {
        let key = CacheKey::from_name(name, record_type);
        let mut entries = self.entries();

        let stale = match entries.get(&key) {
            None => {
                CacheMetrics::record(&self.metrics.misses);
                return None;
            }
            Some(answer) if !answer.is_stale(now) => {
                CacheMetrics::record(&self.metrics.hits);
                return Some(answer.clone());
            }
            Some(answer) => answer.expires_at,
        };

        entries.pop(&key);
        drop(entries);

        CacheMetrics::record(&self.metrics.misses);
        CacheMetrics::record(&self.metrics.lazy_deletions);
        debug!(
            domain = %key.domain,
            record_type = %record_type,
            expired_at = stale,
            "Evicted stale cache entry"
        );
        None
    }

    pub fn set(&self, name: &Name, record_type: RecordType, answer: CachedAnswer) {
        if answer.response.answers().is_empty() {
            return;
        }

        let key = CacheKey::from_name(name, record_type);
        let evicted = self.entries().push(key.clone(), answer);

        CacheMetrics::record(&self.metrics.insertions);
        if let Some((evicted_key, _)) = evicted {
            if evicted_key != key {
                CacheMetrics::record(&self.metrics.evictions);
                debug!(
                    domain = %evicted_key.domain,
                    record_type = %evicted_key.record_type,
                    "Evicted least recently used cache entry"
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}
