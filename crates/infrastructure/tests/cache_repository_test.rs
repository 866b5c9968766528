use hickory_proto::rr::RecordType;
use simpledns_domain::DomainError;
use simpledns_infrastructure::dns::{CacheRepository, CachedAnswer};
use std::net::Ipv4Addr;
use std::sync::Arc;

mod helpers;
use helpers::{a_response, empty_response, first_a, name};

const NOW: u64 = 1_700_000_000;

fn answer(domain: &str, ttl: u32, expires_at: u64) -> CachedAnswer {
    CachedAnswer::new(
        a_response(domain, &[ttl], Ipv4Addr::new(192, 0, 2, 1)),
        expires_at,
    )
}

#[test]
fn test_zero_capacity_is_construction_error() {
    let result = CacheRepository::new(0);
    assert!(matches!(result, Err(DomainError::CacheConstruction(_))));
}

#[test]
fn test_fresh_entry_is_returned() {
    let cache = CacheRepository::new(10).unwrap();
    cache.set(&name("example.com."), RecordType::A, answer("example.com.", 60, NOW + 60));

    let hit = cache
        .get(NOW, &name("example.com."), RecordType::A)
        .expect("fresh entry should hit");
    assert_eq!(hit.expires_at, NOW + 60);
    assert_eq!(first_a(&hit.response), Some(Ipv4Addr::new(192, 0, 2, 1)));
}

#[test]
fn test_stale_entry_is_evicted_permanently() {
    let cache = CacheRepository::new(10).unwrap();
    cache.set(&name("example.com."), RecordType::A, answer("example.com.", 60, NOW + 60));

    assert!(
        cache.get(NOW + 60, &name("example.com."), RecordType::A).is_none(),
        "expires_at == now must be treated as stale"
    );
    assert!(
        cache.get(NOW, &name("example.com."), RecordType::A).is_none(),
        "a stale read must evict the entry"
    );
    assert!(cache.is_empty());
    assert_eq!(cache.metrics().snapshot().lazy_deletions, 1);
}

#[test]
fn test_record_types_do_not_alias() {
    let cache = CacheRepository::new(10).unwrap();
    cache.set(&name("example.com."), RecordType::A, answer("example.com.", 60, NOW + 60));

    assert!(cache.get(NOW, &name("example.com."), RecordType::AAAA).is_none());
    assert!(cache.get(NOW, &name("example.com."), RecordType::A).is_some());
}

#[test]
fn test_lookup_ignores_case_and_root_dot() {
    let cache = CacheRepository::new(10).unwrap();
    cache.set(&name("Example.COM."), RecordType::A, answer("example.com.", 60, NOW + 60));

    assert!(cache.get(NOW, &name("example.com"), RecordType::A).is_some());
}

#[test]
fn test_empty_answer_is_not_stored() {
    let cache = CacheRepository::new(10).unwrap();
    cache.set(
        &name("nodata.example."),
        RecordType::A,
        CachedAnswer::new(empty_response("nodata.example."), NOW + 60),
    );

    assert!(cache.is_empty());
    assert!(cache.get(NOW, &name("nodata.example."), RecordType::A).is_none());
}

#[test]
fn test_overwrite_keeps_single_slot() {
    let cache = CacheRepository::new(10).unwrap();
    cache.set(&name("example.com."), RecordType::A, answer("example.com.", 60, NOW + 60));
    cache.set(&name("example.com."), RecordType::A, answer("example.com.", 600, NOW + 600));

    assert_eq!(cache.len(), 1);
    let hit = cache.get(NOW, &name("example.com."), RecordType::A).unwrap();
    assert_eq!(hit.expires_at, NOW + 600);
    assert_eq!(cache.metrics().snapshot().evictions, 0);
}

#[test]
fn test_capacity_evicts_least_recently_used() {
    let cache = CacheRepository::new(3).unwrap();
    for domain in ["a.test.", "b.test.", "c.test."] {
        cache.set(&name(domain), RecordType::A, answer(domain, 60, NOW + 60));
    }

    // Touch a.test so b.test becomes the LRU entry.
    assert!(cache.get(NOW, &name("a.test."), RecordType::A).is_some());

    cache.set(&name("d.test."), RecordType::A, answer("d.test.", 60, NOW + 60));

    assert_eq!(cache.len(), 3);
    assert!(cache.get(NOW, &name("b.test."), RecordType::A).is_none());
    assert!(cache.get(NOW, &name("a.test."), RecordType::A).is_some());
    assert!(cache.get(NOW, &name("c.test."), RecordType::A).is_some());
    assert!(cache.get(NOW, &name("d.test."), RecordType::A).is_some());
    assert_eq!(cache.metrics().snapshot().evictions, 1);
}

#[test]
fn test_capacity_plus_one_inserts_keep_capacity_entries() {
    let cache = CacheRepository::new(5).unwrap();
    for i in 0..6 {
        let domain = format!("host{}.test.", i);
        cache.set(&name(&domain), RecordType::A, answer(&domain, 60, NOW + 60));
    }

    assert_eq!(cache.len(), 5);
    assert!(cache.get(NOW, &name("host0.test."), RecordType::A).is_none());
}

#[test]
fn test_reader_copy_does_not_touch_stored_value() {
    let cache = CacheRepository::new(10).unwrap();
    cache.set(&name("example.com."), RecordType::A, answer("example.com.", 300, NOW + 300));

    let mut copy = cache.get(NOW, &name("example.com."), RecordType::A).unwrap();
    let mut header = *copy.response.header();
    header.set_id(0xFFFF);
    copy.response.set_header(header);
    for record in copy.response.answers_mut().iter_mut() {
        record.set_ttl(1);
    }

    let again = cache.get(NOW, &name("example.com."), RecordType::A).unwrap();
    assert_eq!(again.response.id(), 0);
    assert_eq!(again.response.answers()[0].ttl(), 300);
}

#[test]
fn test_remaining_ttl_is_never_negative() {
    let entry = answer("example.com.", 60, NOW + 60);

    assert_eq!(entry.remaining_ttl(NOW), 60);
    assert_eq!(entry.remaining_ttl(NOW + 59), 1);
    assert_eq!(entry.remaining_ttl(NOW + 120), 0);
}

#[test]
fn test_hit_rate_metrics() {
    let cache = CacheRepository::new(10).unwrap();
    cache.set(&name("example.com."), RecordType::A, answer("example.com.", 60, NOW + 60));

    cache.get(NOW, &name("example.com."), RecordType::A);
    cache.get(NOW, &name("missing.com."), RecordType::A);

    let snapshot = cache.metrics().snapshot();
    assert_eq!(snapshot.hits, 1);
    assert_eq!(snapshot.misses, 1);
    assert_eq!(snapshot.insertions, 1);
    assert!((cache.metrics().hit_rate() - 50.0).abs() < f64::EPSILON);
}

#[test]
fn test_concurrent_access_respects_capacity() {
    let cache = Arc::new(CacheRepository::new(64).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for i in 0..100 {
                    let domain = format!("w{}-{}.test.", worker, i);
                    cache.set(&name(&domain), RecordType::A, answer(&domain, 60, NOW + 60));
                    let _ = cache.get(NOW, &name(&domain), RecordType::A);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 64);
    assert_eq!(cache.capacity(), 64);
}
