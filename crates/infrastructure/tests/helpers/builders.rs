use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use simpledns_infrastructure::dns::forwarding::MessageBuilder;
use simpledns_infrastructure::dns::{CacheRepository, UpstreamResolver, UpstreamTimeouts};
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use super::MockDnsServer;

pub fn name(domain: &str) -> Name {
    Name::from_str(domain).unwrap()
}

pub fn query(domain: &str, record_type: RecordType) -> Query {
    let mut query = Query::new();
    query.set_name(name(domain));
    query.set_query_type(record_type);
    query.set_query_class(DNSClass::IN);
    query
}

/// Client query datagram with a fixed ID.
pub fn query_bytes(id: u16, domain: &str, record_type: RecordType) -> Vec<u8> {
    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(query(domain, record_type));
    MessageBuilder::serialize_message(&message).unwrap()
}

/// Header-only datagram: valid DNS, zero questions.
pub fn empty_question_bytes(id: u16) -> Vec<u8> {
    let message = Message::new(id, MessageType::Query, OpCode::Query);
    MessageBuilder::serialize_message(&message).unwrap()
}

pub fn a_response(domain: &str, ttls: &[u32], ip: Ipv4Addr) -> Message {
    let mut message = Message::new(0, MessageType::Response, OpCode::Query);
    message.add_query(query(domain, RecordType::A));
    for ttl in ttls {
        message.add_answer(Record::from_rdata(name(domain), *ttl, RData::A(A(ip))));
    }
    message
}

pub fn empty_response(domain: &str) -> Message {
    a_response(domain, &[], Ipv4Addr::UNSPECIFIED)
}

pub fn timeouts(attempt_ms: u64, total_ms: u64) -> UpstreamTimeouts {
    UpstreamTimeouts {
        attempt: Duration::from_millis(attempt_ms),
        total: Duration::from_millis(total_ms),
    }
}

pub fn resolver_for(
    primary: &MockDnsServer,
    secondary: &MockDnsServer,
    timeouts: UpstreamTimeouts,
    cache: Arc<CacheRepository>,
) -> UpstreamResolver {
    UpstreamResolver::new(
        &[primary.name_server(), secondary.name_server()],
        timeouts,
        cache,
    )
}

pub fn first_a(message: &Message) -> Option<Ipv4Addr> {
    message.answers().iter().find_map(|r| match r.data() {
        RData::A(a) => Some(a.0),
        _ => None,
    })
}
