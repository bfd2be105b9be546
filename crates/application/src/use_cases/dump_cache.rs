use crate::ports::RecordStore;
use dnswalk_domain::{QueryKey, ResourceRecord};
use std::sync::Arc;

/// Enumerates every non-expired cache entry (the `dump` command).
pub struct DumpCacheUseCase {
    store: Arc<dyn RecordStore>,
}

impl DumpCacheUseCase {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn execute(&self) -> Vec<(QueryKey, Vec<ResourceRecord>)> {
        self.store.all_entries()
    }
}
