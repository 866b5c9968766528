use crate::dns::cache::{unix_now, CacheRepository, CachedAnswer};
use crate::dns::forwarding::{MessageBuilder, ResponseParser};
use crate::dns::hosts::StaticHostTable;
use crate::dns::upstream::UpstreamResolver;
use hickory_proto::op::{Message, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Turns one inbound datagram into at most one reply.
///
/// Lookup order is static hosts, then cache, then upstreams. Undecodable
/// datagrams and failed resolutions produce no reply.
pub struct DnsRequestHandler {
    static_hosts: Option<Arc<StaticHostTable>>,
    cache: Arc<CacheRepository>,
    resolver: Arc<UpstreamResolver>,
}

impl DnsRequestHandler {
    pub fn new(cache: Arc<CacheRepository>, resolver: Arc<UpstreamResolver>) -> Self {
        Self {
            static_hosts: None,
            cache,
            resolver,
        }
    }

    pub fn with_static_hosts(mut self, static_hosts: Arc<StaticHostTable>) -> Self {
        self.static_hosts = Some(static_hosts);
        self
    }

    /// Wire-format reply for `datagram`, if any.
    pub async fn handle(&self, datagram: &[u8], client: SocketAddr) -> Option<Vec<u8>> {
        let response = self.answer(datagram, client).await?;

        match MessageBuilder::serialize_message(&response) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(client = %client, id = response.id(), error = %e, "Failed to encode DNS response");
                None
            }
        }
    }

    pub async fn answer(&self, datagram: &[u8], client: SocketAddr) -> Option<Message> {
        let request = match ResponseParser::decode(datagram) {
            Ok(request) => request,
            Err(e) => {
                warn!(client = %client, bytes = datagram.len(), error = %e, "Dropping undecodable datagram");
                return None;
            }
        };

        let id = request.id();
        let Some(query) = request.queries().first().cloned() else {
            debug!(client = %client, id, "Query without question");
            return Some(MessageBuilder::response(id, ResponseCode::NoError));
        };

        debug!(
            domain = %query.name(),
            record_type = ?query.query_type(),
            client = %client,
            "DNS query received"
        );

        if let Some(static_hosts) = &self.static_hosts {
            if let Some(response) = static_hosts.resolve_static(&query, id) {
                debug!(domain = %query.name(), "Answered from static hosts");
                return Some(response);
            }
        }

        let now = unix_now();
        if let Some(cached) = self.cache.get(now, query.name(), query.query_type()) {
            debug!(domain = %query.name(), ttl = cached.remaining_ttl(now), "Cache hit");
            return Some(rewrite_cached(cached, id, now));
        }

        match self.resolver.resolve(&query).await {
            Ok(mut response) => {
                set_response_id(&mut response, id);
                if response.answers().is_empty() {
                    debug!(
                        domain = %query.name(),
                        record_type = ?query.query_type(),
                        rcode = ?response.response_code(),
                        "Upstream answer is empty"
                    );
                }
                Some(response)
            }
            Err(e) => {
                warn!(
                    domain = %query.name(),
                    record_type = ?query.query_type(),
                    client = %client,
                    error = %e,
                    "Query resolution failed"
                );
                None
            }
        }
    }
}

/// Patches a cached copy for delivery: the requester's ID and the remaining lifetime as TTL.
fn rewrite_cached(cached: CachedAnswer, id: u16, now: u64) -> Message {
    let ttl = cached.remaining_ttl(now);
    let mut response = cached.response;
    set_response_id(&mut response, id);
    for record in response.answers_mut().iter_mut() {
        record.set_ttl(ttl);
    }
    response
}

fn set_response_id(response: &mut Message, id: u16) {
    let mut header = *response.header();
    header.set_id(id);
    response.set_header(header);
}
