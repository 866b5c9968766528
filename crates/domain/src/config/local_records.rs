use serde::{Deserialize, Serialize};

/// An inline static host entry, merged with the hosts file at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocalRecord {
    pub hostname: String,

    #[serde(default)]
    pub domain: Option<String>,

    pub ip: String,
}

impl LocalRecord {
    pub fn fqdn(&self) -> String {
        match &self.domain {
            Some(domain) => format!("{}.{}", self.hostname, domain),
            None => self.hostname.clone(),
        }
    }
}
