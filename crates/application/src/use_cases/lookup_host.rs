use crate::ports::HostResolver;
use dnswalk_domain::{QueryKey, RecordType, ResolveError};
use std::sync::Arc;
use tracing::warn;

/// One result row for the caller: the host and type as queried, plus the
/// TTL and value text of a record found for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupAnswer {
    pub host: String,
    pub record_type: RecordType,
    /// Seconds, or -1 for the "no records found" sentinel row.
    pub ttl: i64,
    pub value: String,
}

impl LookupAnswer {
    /// The single row returned when resolution produced nothing.
    fn not_found(host: &str, record_type: RecordType) -> Self {
        Self {
            host: host.to_string(),
            record_type,
            ttl: -1,
            value: "0.0.0.0".to_string(),
        }
    }
}

pub struct LookupHostUseCase {
    resolver: Arc<dyn HostResolver>,
}

impl LookupHostUseCase {
    pub fn new(resolver: Arc<dyn HostResolver>) -> Self {
        Self { resolver }
    }

    /// Resolves `host`/`record_type` and maps the records onto result rows.
    ///
    /// The rows always carry the host name as queried, even when the
    /// records belong to a CNAME target further down the chain. A failed
    /// or empty resolution yields exactly one sentinel row.
    pub fn execute(&self, host: &str, record_type: RecordType) -> Vec<LookupAnswer> {
        let key = QueryKey::new(host, record_type);

        let records = match self.resolver.resolve(&key) {
            Ok(records) => records,
            Err(ResolveError::MaxIndirectionExceeded) => {
                warn!(host, %record_type, "maximum number of indirection levels reached");
                Vec::new()
            }
            Err(e) => {
                warn!(host, %record_type, error = %e, "lookup failed");
                Vec::new()
            }
        };

        if records.is_empty() {
            return vec![LookupAnswer::not_found(host, record_type)];
        }

        records
            .iter()
            .map(|record| LookupAnswer {
                host: host.to_string(),
                record_type,
                ttl: i64::from(record.ttl()),
                value: record.value_text(),
            })
            .collect()
    }
}
