use simpledns_domain::NameServer;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

const TYPE_AAAA: u16 = 28;

#[derive(Clone, Copy, Debug)]
pub enum MockBehavior {
    /// One A (or AAAA for AAAA questions) answer with the given TTL.
    Answer { ttl: u32, ip: Ipv4Addr },
    /// NOERROR with an empty answer section.
    Empty,
    /// Correct answer under a different message ID.
    WrongId,
    /// Reads queries and never replies.
    Silent,
}

/// Loopback upstream that records the question types it receives.
pub struct MockDnsServer {
    addr: SocketAddr,
    seen_types: Arc<Mutex<Vec<u16>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let seen_types = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&seen_types);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            let query = &buf[..len];
                            if let Some(qtype) = question_type(query) {
                                seen.lock().unwrap().push(qtype);
                            }
                            if let Some(response) = build_mock_response(query, behavior) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            seen_types,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn name_server(&self) -> NameServer {
        NameServer::new(self.addr.ip(), self.addr.port())
    }

    pub fn seen_query_types(&self) -> Vec<u16> {
        self.seen_types.lock().unwrap().clone()
    }

    pub fn queries_received(&self) -> usize {
        self.seen_types.lock().unwrap().len()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// QTYPE of a single-question query without additional records.
fn question_type(query: &[u8]) -> Option<u16> {
    if query.len() < 17 {
        return None;
    }
    let end = query.len();
    Some(u16::from_be_bytes([query[end - 4], query[end - 3]]))
}

fn build_mock_response(query: &[u8], behavior: MockBehavior) -> Option<Vec<u8>> {
    if query.len() < 12 {
        return None;
    }

    let (ttl, ip, answer_count, id) = match behavior {
        MockBehavior::Silent => return None,
        MockBehavior::Answer { ttl, ip } => (ttl, ip, 1u8, [query[0], query[1]]),
        MockBehavior::Empty => (0, Ipv4Addr::UNSPECIFIED, 0u8, [query[0], query[1]]),
        MockBehavior::WrongId => (
            60,
            Ipv4Addr::new(10, 0, 0, 1),
            1u8,
            [query[0] ^ 0xFF, query[1] ^ 0xFF],
        ),
    };

    let mut response = Vec::with_capacity(512);
    response.extend_from_slice(&id);
    response.push(0x81);
    response.push(0x80);
    response.extend_from_slice(&query[4..6]);
    response.extend_from_slice(&[0x00, answer_count]);
    response.extend_from_slice(&[0x00, 0x00]);
    response.extend_from_slice(&[0x00, 0x00]);
    response.extend_from_slice(&query[12..]);

    if answer_count == 0 {
        return Some(response);
    }

    response.extend_from_slice(&[0xc0, 0x0c]);
    if question_type(query) == Some(TYPE_AAAA) {
        response.extend_from_slice(&[0x00, 0x1c, 0x00, 0x01]);
        response.extend_from_slice(&ttl.to_be_bytes());
        response.extend_from_slice(&[0x00, 0x10]);
        response.extend_from_slice(&[0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01]);
    } else {
        response.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        response.extend_from_slice(&ttl.to_be_bytes());
        response.extend_from_slice(&[0x00, 0x04]);
        response.extend_from_slice(&ip.octets());
    }

    Some(response)
}
