use super::{HEADER_LEN, QCLASS_IN};
use dnswalk_domain::QueryKey;

/// Builds a query message for `key` and returns it with its transaction ID.
///
/// The recursion-desired bit stays cleared: this client walks the
/// hierarchy itself and never asks a server to recurse on its behalf.
/// Labels are written as-is; lengths above 63 are the caller's problem.
pub fn encode_query(key: &QueryKey) -> (Vec<u8>, u16) {
    let id = fastrand::u16(..);

    let mut message = Vec::with_capacity(HEADER_LEN + key.name().len() + 6);
    message.extend_from_slice(&id.to_be_bytes());
    message.extend_from_slice(&0u16.to_be_bytes()); // flags: QR=0, OPCODE=0, RD=0
    message.extend_from_slice(&1u16.to_be_bytes()); // QDCOUNT
    message.extend_from_slice(&0u16.to_be_bytes()); // ANCOUNT
    message.extend_from_slice(&0u16.to_be_bytes()); // NSCOUNT
    message.extend_from_slice(&0u16.to_be_bytes()); // ARCOUNT

    for label in key.name().split('.').filter(|label| !label.is_empty()) {
        message.push(label.len() as u8);
        message.extend_from_slice(label.as_bytes());
    }
    message.push(0);
    message.extend_from_slice(&key.record_type().code().to_be_bytes());
    message.extend_from_slice(&QCLASS_IN.to_be_bytes());

    (message, id)
}
