use dnswalk_domain::{QueryKey, ResourceRecord};

/// Port for the TTL-aware record cache.
pub trait RecordStore: Send + Sync {
    /// All non-expired records known for `key`; empty if none.
    fn lookup(&self, key: &QueryKey) -> Vec<ResourceRecord>;

    /// Adds a record to the set for its key. Re-inserting an equal record
    /// refreshes its expiry clock instead of duplicating it.
    fn insert(&self, record: ResourceRecord);

    /// Diagnostic enumeration of all keys with their non-expired records.
    fn all_entries(&self) -> Vec<(QueryKey, Vec<ResourceRecord>)>;
}
