use clap::Parser;
use simpledns_domain::CliOverrides;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "simpledns")]
#[command(version)]
#[command(about = "SimpleDNS - Caching DNS forwarder with static hosts")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'p', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Do not answer from the hosts file or local records
    #[arg(long)]
    no_hosts: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
        no_hosts: cli.no_hosts,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting SimpleDNS v{}", env!("CARGO_PKG_VERSION"));
    info!(
        listen = %config.server.listen_address(),
        name_servers = ?config.dns.name_servers,
        cache_max_entries = config.dns.cache_max_entries,
        use_hosts = config.dns.use_hosts,
        "Configuration loaded"
    );

    let dns_services = di::DnsServices::new(&config)?;
    let shutdown = CancellationToken::new();

    let dns_server = server::bind_dns_server(&config, dns_services.handler.clone())?;
    let dns_task = tokio::spawn(server::run_dns_server(dns_server, shutdown.clone()));

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");

    shutdown.cancel();
    if let Err(e) = dns_task.await {
        error!(error = %e, "DNS server task failed");
    }

    let metrics = dns_services.cache.metrics().snapshot();
    info!(
        hits = metrics.hits,
        misses = metrics.misses,
        entries = dns_services.cache.len(),
        "Server shutdown complete"
    );
    Ok(())
}
