use compact_str::CompactString;
use hickory_proto::rr::{Name, RecordType};

/// Cache and static-table identity of a name: ASCII lower-case, no trailing root dot.
pub fn normalize_domain(domain: &str) -> CompactString {
    let trimmed = domain.trim_end_matches('.');
    let mut normalized = CompactString::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        normalized.push(c.to_ascii_lowercase());
    }
    normalized
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub domain: CompactString,
    pub record_type: RecordType,
}

impl CacheKey {
    #[inline]
    pub fn new(domain: &str, record_type: RecordType) -> Self {
        Self {
            domain: normalize_domain(domain),
            record_type,
        }
    }

    #[inline]
    pub fn from_name(name: &Name, record_type: RecordType) -> Self {
        Self::new(&name.to_ascii(), record_type)
    }
}
