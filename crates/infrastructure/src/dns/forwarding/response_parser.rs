use hickory_proto::op::{Message, ResponseCode};
use simpledns_domain::DomainError;

/// A decoded upstream reply with the header facts the resolver branches on.
#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub id: u16,

    pub rcode: ResponseCode,

    pub truncated: bool,

    /// Smallest answer TTL; `None` when there are no answers.
    pub min_ttl: Option<u32>,

    pub message: Message,
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        let message = Self::decode(response_bytes)?;

        Ok(DnsResponse {
            id: message.id(),
            rcode: message.response_code(),
            truncated: message.truncated(),
            min_ttl: Self::min_ttl(&message),
            message,
        })
    }

    pub fn decode(bytes: &[u8]) -> Result<Message, DomainError> {
        Message::from_vec(bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS message: {}", e))
        })
    }

    pub fn min_ttl(message: &Message) -> Option<u32> {
        let mut min_ttl: Option<u32> = None;
        for record in message.answers() {
            let record_ttl = record.ttl();
            min_ttl = Some(min_ttl.map_or(record_ttl, |current| current.min(record_ttl)));
        }
        min_ttl
    }
}
