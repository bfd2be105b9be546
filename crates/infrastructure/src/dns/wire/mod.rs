//! DNS wire-format codec (RFC 1035 §4).
//!
//! Queries are encoded with a single question, QCLASS=IN and the
//! recursion-desired bit cleared. Response decoding validates the header,
//! skips the echoed question and parses all three record sections,
//! resolving name-compression pointers with a bounded worklist.

mod decoder;
mod encoder;
mod name;

pub use decoder::{decode_response, ParsedMessage};
pub use encoder::encode_query;

/// Fixed header length: ID, flags and the four section counts.
pub(crate) const HEADER_LEN: usize = 12;

pub(crate) const QCLASS_IN: u16 = 1;

/// Two set high bits turn a label length byte into a compression pointer.
pub(crate) const POINTER_MASK: u8 = 0xC0;
