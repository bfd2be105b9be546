use dnswalk_application::ports::DnsTransport;
use dnswalk_domain::ResolveError;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

/// Responses larger than this arrive truncated and carry the TC bit,
/// which the decoder rejects, so a bigger buffer would buy nothing.
const MAX_DATAGRAM: usize = 1024;

/// UDP exchange with a fixed read timeout and a single retransmit.
///
/// One unconnected socket is shared across all queries; a lock keeps a
/// send and its matching receive together so two concurrent exchanges
/// cannot steal each other's datagrams.
pub struct UdpTransport {
    socket: UdpSocket,
    exchange_lock: Mutex<()>,
}

impl UdpTransport {
    /// Binds an ephemeral local port. Failing to bind or to arm the
    /// timeout leaves no usable transport, so both are fatal here.
    pub fn bind(timeout: Duration) -> Result<Self, ResolveError> {
        let socket = UdpSocket::bind(("0.0.0.0", 0)).map_err(io_error)?;
        socket.set_read_timeout(Some(timeout)).map_err(io_error)?;
        Ok(Self {
            socket,
            exchange_lock: Mutex::new(()),
        })
    }
}

impl DnsTransport for UdpTransport {
    fn exchange(&self, server: SocketAddr, query: &[u8]) -> Result<Vec<u8>, ResolveError> {
        let _guard = self
            .exchange_lock
            .lock()
            .map_err(|_| ResolveError::Io("transport lock poisoned".to_string()))?;

        let mut buf = [0u8; MAX_DATAGRAM];
        for attempt in 1..=2 {
            self.socket.send_to(query, server).map_err(io_error)?;
            debug!(%server, attempt, len = query.len(), "query sent");

            match self.socket.recv_from(&mut buf) {
                Ok((received, from)) => {
                    debug!(%from, len = received, "response received");
                    return Ok(buf[..received].to_vec());
                }
                Err(e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    warn!(%server, attempt, "query timed out");
                }
                Err(e) => return Err(io_error(e)),
            }
        }

        Err(ResolveError::Unreachable {
            server: server.ip(),
        })
    }
}

fn io_error(e: std::io::Error) -> ResolveError {
    ResolveError::Io(e.to_string())
}
