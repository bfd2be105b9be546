use dnswalk_domain::ResolveError;
use std::net::SocketAddr;

/// Port for the blocking datagram exchange with a nameserver.
pub trait DnsTransport: Send + Sync {
    /// Sends one query datagram to `server` and blocks for one reply.
    ///
    /// On a receive timeout the identical datagram is retransmitted exactly
    /// once; a second timeout is reported as `ResolveError::Unreachable`.
    fn exchange(&self, server: SocketAddr, query: &[u8]) -> Result<Vec<u8>, ResolveError>;
}
