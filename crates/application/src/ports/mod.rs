mod dns_transport;
mod host_resolver;
mod record_store;
mod trace_sink;

pub use dns_transport::DnsTransport;
pub use host_resolver::HostResolver;
pub use record_store::RecordStore;
pub use trace_sink::{NullTraceSink, TraceSink};
