use simpledns_domain::Config;
use simpledns_infrastructure::dns::{DnsRequestHandler, UdpDnsServer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub fn bind_dns_server(
    config: &Config,
    handler: Arc<DnsRequestHandler>,
) -> anyhow::Result<UdpDnsServer> {
    let socket_addr: SocketAddr = config.server.listen_address().parse()?;

    info!(
        bind_address = %socket_addr,
        max_packet_size = config.server.max_packet_size,
        "Starting DNS server"
    );

    Ok(UdpDnsServer::bind(
        socket_addr,
        handler,
        config.server.max_packet_size,
    )?)
}

pub async fn run_dns_server(server: UdpDnsServer, shutdown: CancellationToken) {
    let local_addr = server.local_addr();
    server.run(shutdown).await;
    info!(bind_address = %local_addr, "DNS server stopped");
}
