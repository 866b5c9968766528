use anyhow::Context;
use simpledns_domain::Config;
use simpledns_infrastructure::dns::{
    CacheRepository, DnsRequestHandler, StaticHostTable, UpstreamResolver, UpstreamTimeouts,
};
use simpledns_infrastructure::system::{merge_local_records, read_hosts_file, HostsMap};
use std::sync::Arc;
use tracing::info;

pub struct DnsServices {
    pub cache: Arc<CacheRepository>,
    pub handler: Arc<DnsRequestHandler>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let cache = Arc::new(CacheRepository::new(config.dns.cache_max_entries)?);
        let resolver = Arc::new(Self::build_resolver(config, cache.clone())?);

        let mut handler = DnsRequestHandler::new(cache.clone(), resolver);
        if config.dns.use_hosts {
            handler = handler.with_static_hosts(Arc::new(Self::build_static_hosts(config)?));
        } else {
            info!("Static hosts disabled");
        }

        Ok(Self {
            cache,
            handler: Arc::new(handler),
        })
    }

    fn build_resolver(
        config: &Config,
        cache: Arc<CacheRepository>,
    ) -> anyhow::Result<UpstreamResolver> {
        let servers = config.name_servers()?;
        let timeouts =
            UpstreamTimeouts::from_millis(config.dns.attempt_timeout_ms, config.dns.resolve_timeout_ms);

        info!(
            primary = %servers[0],
            secondary = %servers[1],
            attempt_timeout_ms = config.dns.attempt_timeout_ms,
            resolve_timeout_ms = config.dns.resolve_timeout_ms,
            "Upstream resolver configured"
        );

        Ok(UpstreamResolver::new(&servers, timeouts, cache))
    }

    fn build_static_hosts(config: &Config) -> anyhow::Result<StaticHostTable> {
        let path = config.dns.hosts_file_path();
        let mut hosts: HostsMap = read_hosts_file(path)
            .with_context(|| format!("Failed to read hosts file {}", path))?;
        merge_local_records(&mut hosts, &config.dns.local_records);

        let table = StaticHostTable::from_hosts(hosts);
        info!(path = %path, hosts = table.len(), "Static hosts loaded");
        Ok(table)
    }
}
