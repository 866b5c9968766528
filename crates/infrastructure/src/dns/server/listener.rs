use super::handler::DnsRequestHandler;
use crate::dns::buffer_pool::{BufferPool, PooledBuffer, DEFAULT_POOL_CAPACITY};
use simpledns_domain::DomainError;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const SOCKET_RECV_BUFFER_SIZE: usize = 512 * 1024;

/// UDP front end: one receive loop, one task per datagram.
pub struct UdpDnsServer {
    socket: Arc<UdpSocket>,
    handler: Arc<DnsRequestHandler>,
    buffer_pool: Arc<BufferPool>,
    local_addr: SocketAddr,
}

impl UdpDnsServer {
    pub fn bind(
        bind_addr: SocketAddr,
        handler: Arc<DnsRequestHandler>,
        max_packet_size: usize,
    ) -> Result<Self, DomainError> {
        let socket = create_udp_socket(bind_addr).map_err(|e| {
            DomainError::IoError(format!("Failed to bind UDP socket on {}: {}", bind_addr, e))
        })?;
        Self::from_socket(socket, handler, max_packet_size)
    }

    pub fn from_socket(
        socket: UdpSocket,
        handler: Arc<DnsRequestHandler>,
        max_packet_size: usize,
    ) -> Result<Self, DomainError> {
        let local_addr = socket
            .local_addr()
            .map_err(|e| DomainError::IoError(format!("Failed to read local address: {}", e)))?;

        Ok(Self {
            socket: Arc::new(socket),
            handler,
            buffer_pool: Arc::new(BufferPool::new(DEFAULT_POOL_CAPACITY, max_packet_size)),
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves until `shutdown` is cancelled. In-flight requests observe a child token.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(bind_address = %self.local_addr, "DNS server listening");

        loop {
            let mut datagram = self.buffer_pool.acquire();

            let received = tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(bind_address = %self.local_addr, "DNS server shutting down");
                    break;
                }
                result = self.socket.recv_from(&mut datagram[..]) => result,
            };

            match received {
                Ok((len, peer)) => {
                    datagram.truncate(len);
                    self.dispatch(datagram, peer, shutdown.child_token());
                }
                Err(e) => {
                    warn!(error = %e, "UDP recv error");
                }
            }
        }
    }

    fn dispatch(&self, datagram: PooledBuffer, peer: SocketAddr, cancel: CancellationToken) {
        let socket = Arc::clone(&self.socket);
        let handler = Arc::clone(&self.handler);

        tokio::spawn(async move {
            let reply = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(client = %peer, "Request abandoned on shutdown");
                    return;
                }
                reply = handler.handle(&datagram, peer) => reply,
            };
            drop(datagram);

            if let Some(bytes) = reply {
                if let Err(e) = socket.send_to(&bytes, peer).await {
                    error!(client = %peer, error = %e, "Failed to send DNS response");
                }
            }
        });
    }
}

fn create_udp_socket(socket_addr: SocketAddr) -> std::io::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(SOCKET_RECV_BUFFER_SIZE)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}
