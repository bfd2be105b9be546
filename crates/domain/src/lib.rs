//! dnswalk domain layer
pub mod config;
pub mod errors;
pub mod query_key;
pub mod rcode;
pub mod record_type;
pub mod resource_record;

pub use config::{CliOverrides, Config, ConfigError, LoggingConfig, ResolverConfig};
pub use errors::ResolveError;
pub use query_key::QueryKey;
pub use rcode::Rcode;
pub use record_type::RecordType;
pub use resource_record::{RecordData, ResourceRecord};
