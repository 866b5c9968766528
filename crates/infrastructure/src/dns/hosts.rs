//! Static host table consulted before the cache and the upstreams.

use crate::dns::cache::normalize_domain;
use crate::dns::forwarding::MessageBuilder;
use compact_str::CompactString;
use hickory_proto::op::{Message, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use rustc_hash::FxHashMap;
use simpledns_domain::IpVersion;
use smallvec::SmallVec;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use tracing::{debug, warn};

/// TTL advertised on synthesized records. They never expire locally.
pub const STATIC_RECORD_TTL: u32 = 300;

#[derive(Default)]
struct HostRecords {
    v4: SmallVec<[Record; 2]>,
    v6: SmallVec<[Record; 2]>,
}

pub struct StaticHostTable {
    hosts: FxHashMap<CompactString, HostRecords>,
}

impl StaticHostTable {
    pub fn empty() -> Self {
        Self {
            hosts: FxHashMap::default(),
        }
    }

    /// Builds the table from `hostname -> [ip]` pairs; entries that do not parse are skipped.
    pub fn from_hosts<I, H>(hosts: I) -> Self
    where
        I: IntoIterator<Item = (H, Vec<String>)>,
        H: AsRef<str>,
    {
        let mut table = Self::empty();

        for (hostname, ips) in hosts {
            let key = normalize_domain(hostname.as_ref());
            let Some(owner) = owner_name(&key) else {
                warn!(hostname = %hostname.as_ref(), "Skipping invalid static hostname");
                continue;
            };

            for ip in ips {
                match synthesize(&owner, &ip) {
                    Some((IpVersion::V4, record)) => {
                        table.hosts.entry(key.clone()).or_default().v4.push(record)
                    }
                    Some((IpVersion::V6, record)) => {
                        table.hosts.entry(key.clone()).or_default().v6.push(record)
                    }
                    None => {
                        warn!(hostname = %key, ip = %ip, "Skipping invalid static address");
                    }
                }
            }
        }

        debug!(hosts = table.len(), "Static host table built");
        table
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn contains(&self, hostname: &str) -> bool {
        self.hosts.contains_key(&normalize_domain(hostname))
    }

    /// Authoritative answer for an A/AAAA question on a known host, or `None`.
    pub fn resolve_static(&self, query: &Query, id: u16) -> Option<Message> {
        let host = self.hosts.get(&normalize_domain(&query.name().to_ascii()))?;

        let records = match query.query_type() {
            RecordType::A => &host.v4,
            RecordType::AAAA => &host.v6,
            _ => return None,
        };

        if records.is_empty() {
            return None;
        }

        let mut response = MessageBuilder::response(id, ResponseCode::NoError);
        response.set_authoritative(true);
        response.add_query(query.clone());
        for record in records {
            response.add_answer(record.clone());
        }
        Some(response)
    }
}

fn owner_name(normalized: &str) -> Option<Name> {
    if normalized.is_empty() {
        return None;
    }
    let mut name = Name::from_str(normalized).ok()?;
    name.set_fqdn(true);
    Some(name)
}

fn synthesize(owner: &Name, ip: &str) -> Option<(IpVersion, Record)> {
    let ip = ip.trim();
    match IpVersion::classify(ip)? {
        IpVersion::V4 => {
            let addr = Ipv4Addr::from_str(ip).ok()?;
            let record = Record::from_rdata(owner.clone(), STATIC_RECORD_TTL, RData::A(A(addr)));
            Some((IpVersion::V4, record))
        }
        IpVersion::V6 => {
            let addr = Ipv6Addr::from_str(ip).ok()?;
            let record =
                Record::from_rdata(owner.clone(), STATIC_RECORD_TTL, RData::AAAA(AAAA(addr)));
            Some((IpVersion::V6, record))
        }
    }
}
