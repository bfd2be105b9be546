use dnswalk_domain::{QueryKey, ResourceRecord};
use std::net::IpAddr;

/// Port for per-query diagnostic output (the `trace on` feature).
///
/// The engine reports what it sends and what it decodes; how that is
/// rendered belongs to the outer layer.
pub trait TraceSink: Send + Sync {
    fn query_sent(&self, id: u16, key: &QueryKey, server: IpAddr);

    fn response_received(
        &self,
        id: u16,
        authoritative: bool,
        answers: &[ResourceRecord],
        authority: &[ResourceRecord],
        additional: &[ResourceRecord],
    );
}

/// Sink that discards every event.
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn query_sent(&self, _id: u16, _key: &QueryKey, _server: IpAddr) {}

    fn response_received(
        &self,
        _id: u16,
        _authoritative: bool,
        _answers: &[ResourceRecord],
        _authority: &[ResourceRecord],
        _additional: &[ResourceRecord],
    ) {
    }
}
