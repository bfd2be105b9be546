use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Server the hierarchy walk starts from. Defaults to a.root-servers.net.
    #[serde(default = "default_root_server")]
    pub root_server: IpAddr,

    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    /// Receive timeout per query attempt. The identical datagram is
    /// retransmitted once before the server is reported unreachable.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_ms: u64,

    /// Bound on CNAME/NS-address detours within one lookup.
    #[serde(default = "default_max_indirection")]
    pub max_indirection: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_server: default_root_server(),
            dns_port: default_dns_port(),
            query_timeout_ms: default_query_timeout(),
            max_indirection: default_max_indirection(),
        }
    }
}

fn default_root_server() -> IpAddr {
    // a.root-servers.net
    IpAddr::V4(Ipv4Addr::new(198, 41, 0, 4))
}

fn default_dns_port() -> u16 {
    53
}

fn default_query_timeout() -> u64 {
    5000
}

fn default_max_indirection() -> u32 {
    10
}
