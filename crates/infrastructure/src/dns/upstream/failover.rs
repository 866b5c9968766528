use super::deadline::with_deadline;
use crate::dns::cache::{unix_now, CacheRepository, CachedAnswer};
use crate::dns::forwarding::{DnsResponse, MessageBuilder, ResponseParser};
use crate::dns::transport::{DnsTransport, UdpTransport};
use hickory_proto::op::{Message, Query};
use hickory_proto::rr::{Name, RecordType};
use simpledns_domain::{DomainError, NameServer};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(1500);
const DEFAULT_TOTAL_TIMEOUT: Duration = Duration::from_millis(3000);

/// A configured name server and the transport used to reach it.
pub struct Upstream {
    pub server: NameServer,
    transport: Arc<dyn DnsTransport>,
}

impl Upstream {
    pub fn udp(server: NameServer) -> Self {
        Self::with_transport(server, Arc::new(UdpTransport::new(server.socket_addr())))
    }

    pub fn with_transport(server: NameServer, transport: Arc<dyn DnsTransport>) -> Self {
        Self { server, transport }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UpstreamTimeouts {
    /// Budget for one exchange with one upstream.
    pub attempt: Duration,
    /// Budget for the whole walk over every upstream.
    pub total: Duration,
}

impl UpstreamTimeouts {
    pub fn from_millis(attempt_ms: u64, total_ms: u64) -> Self {
        Self {
            attempt: Duration::from_millis(attempt_ms),
            total: Duration::from_millis(total_ms),
        }
    }
}

impl Default for UpstreamTimeouts {
    fn default() -> Self {
        Self {
            attempt: DEFAULT_ATTEMPT_TIMEOUT,
            total: DEFAULT_TOTAL_TIMEOUT,
        }
    }
}

/// Forwards queries to upstreams in priority order and caches what comes back.
///
/// Each upstream gets at most one attempt per call. An attempt fails on
/// transport errors, on its timeout, on an undecodable reply and on a reply
/// whose ID does not match the query. Attempt timeouts are clipped to what is
/// left of the overall deadline.
pub struct UpstreamResolver {
    upstreams: Vec<Upstream>,
    timeouts: UpstreamTimeouts,
    cache: Arc<CacheRepository>,
}

impl UpstreamResolver {
    pub fn new(
        servers: &[NameServer],
        timeouts: UpstreamTimeouts,
        cache: Arc<CacheRepository>,
    ) -> Self {
        let upstreams = servers.iter().copied().map(Upstream::udp).collect();
        Self::with_upstreams(upstreams, timeouts, cache)
    }

    pub fn with_upstreams(
        upstreams: Vec<Upstream>,
        timeouts: UpstreamTimeouts,
        cache: Arc<CacheRepository>,
    ) -> Self {
        Self {
            upstreams,
            timeouts,
            cache,
        }
    }

    pub fn servers(&self) -> impl Iterator<Item = &NameServer> {
        self.upstreams.iter().map(|u| &u.server)
    }

    pub fn timeouts(&self) -> UpstreamTimeouts {
        self.timeouts
    }

    pub async fn resolve(&self, query: &Query) -> Result<Message, DomainError> {
        let deadline = Instant::now() + self.timeouts.total;
        let requested_type = query.query_type();
        let forwarded_type = forwarded_type(requested_type);

        if forwarded_type != requested_type {
            debug!(domain = %query.name(), "Forwarding ANY query as A (RFC 8482)");
        }

        for (index, upstream) in self.upstreams.iter().enumerate() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!(domain = %query.name(), position = index, "Resolve deadline exhausted");
                break;
            }

            let budget = self.timeouts.attempt.min(remaining);
            let started = Instant::now();

            match with_deadline(
                budget,
                self.attempt(upstream, query.name(), forwarded_type, budget),
            )
            .await
            {
                Ok(mut response) => {
                    debug!(
                        server = %upstream.server,
                        latency_ms = started.elapsed().as_millis() as u64,
                        position = index,
                        rcode = ?response.rcode,
                        answers = response.message.answers().len(),
                        "Server responded"
                    );

                    if forwarded_type != requested_type {
                        restore_question_type(&mut response.message, requested_type);
                    }

                    self.store(query, &response);
                    return Ok(response.message);
                }
                Err(e) => {
                    warn!(
                        server = %upstream.server,
                        protocol = upstream.transport.protocol_name(),
                        error = %e,
                        position = index,
                        "Failing over"
                    );
                }
            }
        }

        Err(DomainError::TransportAllServersUnreachable)
    }

    async fn attempt(
        &self,
        upstream: &Upstream,
        name: &Name,
        record_type: RecordType,
        budget: Duration,
    ) -> Result<DnsResponse, DomainError> {
        let (id, query_bytes) = MessageBuilder::build_query_with_id(name, record_type)?;
        let reply = upstream.transport.send(&query_bytes, budget).await?;
        let response = ResponseParser::parse(&reply.bytes)?;

        if response.id != id {
            return Err(DomainError::TransportIdMismatch {
                server: upstream.server.to_string(),
                expected: id,
                received: response.id,
            });
        }

        if response.truncated {
            debug!(server = %upstream.server, domain = %name, "Upstream response truncated");
        }

        Ok(response)
    }

    fn store(&self, query: &Query, response: &DnsResponse) {
        match response.min_ttl {
            Some(ttl) if ttl > 0 => {
                let expires_at = unix_now() + u64::from(ttl);
                self.cache.set(
                    query.name(),
                    query.query_type(),
                    CachedAnswer::new(response.message.clone(), expires_at),
                );
            }
            _ => {
                debug!(
                    domain = %query.name(),
                    record_type = %query.query_type(),
                    "Response not cacheable"
                );
            }
        }
    }
}

fn forwarded_type(requested: RecordType) -> RecordType {
    if requested == RecordType::ANY {
        RecordType::A
    } else {
        requested
    }
}

fn restore_question_type(message: &mut Message, record_type: RecordType) {
    for query in message.queries_mut().iter_mut() {
        query.set_query_type(record_type);
    }
}
