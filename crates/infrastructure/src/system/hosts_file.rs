//! Reader for the system hosts file (`addr name [aliases...]` per line).

use rustc_hash::FxHashMap;
use simpledns_domain::LocalRecord;
use smallvec::SmallVec;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::net::IpAddr;
use std::path::Path;
use tracing::{debug, warn};

/// Lower-cased hostname to its textual addresses, in file order.
pub type HostsMap = FxHashMap<String, Vec<String>>;

pub fn read_hosts_file<P: AsRef<Path>>(path: P) -> io::Result<HostsMap> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let hosts = parse_hosts(BufReader::new(file))?;
    debug!(path = %path.display(), hosts = hosts.len(), "Hosts file loaded");
    Ok(hosts)
}

pub fn parse_hosts<R: BufRead>(src: R) -> io::Result<HostsMap> {
    let mut hosts = HostsMap::default();

    for line in src.lines() {
        let line = line?;
        let line = match line.split_once('#') {
            Some((content, _)) => content,
            None => line.as_str(),
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        let fields: SmallVec<[&str; 4]> = line.split_whitespace().collect();
        if fields.len() < 2 {
            continue;
        }
        let addr = fields[0];

        if addr.parse::<IpAddr>().is_err() {
            warn!(address = %addr, "Skipping hosts entry with invalid address");
            continue;
        }

        for name in &fields[1..] {
            let addrs = hosts.entry(name.to_ascii_lowercase()).or_default();
            if !addrs.iter().any(|a| a == addr) {
                addrs.push(addr.to_string());
            }
        }
    }

    Ok(hosts)
}

/// Folds configured records into `hosts`; configured addresses come after file ones.
pub fn merge_local_records(hosts: &mut HostsMap, records: &[LocalRecord]) {
    for record in records {
        let addrs = hosts.entry(record.fqdn().to_ascii_lowercase()).or_default();
        if !addrs.iter().any(|a| a == &record.ip) {
            addrs.push(record.ip.clone());
        }
    }
}
