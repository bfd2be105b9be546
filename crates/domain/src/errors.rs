use crate::rcode::Rcode;
use std::net::IpAddr;
use thiserror::Error;

/// Everything that can go wrong while resolving one query.
///
/// None of these are fatal to the process: the engine degrades every
/// failure to "no records found" at the top level. `MaxIndirectionExceeded`
/// is the only variant that is surfaced to the user as such.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A response arrived whose ID does not match the outstanding query.
    /// Handled exactly like a timeout: the stray packet is discarded.
    #[error("transaction ID mismatch (expected {expected:#06x}, got {got:#06x})")]
    TransactionMismatch { expected: u16, got: u16 },

    /// No reply from the server after the one allowed retransmit.
    #[error("no response from {server} after retransmit")]
    Unreachable { server: IpAddr },

    /// Truncated read, pointer-cycle guard tripped, or unexpected EOF.
    /// Aborts decoding of that response only.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// TC bit set; TCP fallback is out of scope, so this is a failure.
    #[error("response truncated")]
    Truncated,

    /// The server answered with a non-zero RCODE.
    #[error("server returned {0}")]
    Rcode(Rcode),

    /// Terminal failure for the whole lookup.
    #[error("maximum number of indirection levels reached")]
    MaxIndirectionExceeded,

    #[error("I/O error: {0}")]
    Io(String),
}
