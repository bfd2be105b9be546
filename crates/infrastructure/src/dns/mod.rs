pub mod cache;
pub mod resolver;
pub mod transport;
pub mod wire;

pub use cache::RecordCache;
pub use resolver::IterativeResolver;
pub use transport::UdpTransport;
