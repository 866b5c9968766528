pub mod hosts_file;

pub use hosts_file::{merge_local_records, parse_hosts, read_hosts_file, HostsMap};
