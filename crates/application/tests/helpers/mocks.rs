use dnswalk_application::ports::{HostResolver, RecordStore};
use dnswalk_domain::{QueryKey, ResolveError, ResourceRecord};
use std::collections::HashMap;
use std::sync::Mutex;

/// Scripted resolver: hands out a canned result per key.
pub struct MockHostResolver {
    responses: Mutex<HashMap<QueryKey, Result<Vec<ResourceRecord>, ResolveError>>>,
}

impl MockHostResolver {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_records(self, key: QueryKey, records: Vec<ResourceRecord>) -> Self {
        self.responses.lock().unwrap().insert(key, Ok(records));
        self
    }

    pub fn with_error(self, key: QueryKey, error: ResolveError) -> Self {
        self.responses.lock().unwrap().insert(key, Err(error));
        self
    }
}

impl Default for MockHostResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl HostResolver for MockHostResolver {
    fn resolve(&self, key: &QueryKey) -> Result<Vec<ResourceRecord>, ResolveError> {
        self.responses
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Record store backed by a plain vector, no expiry.
pub struct MockRecordStore {
    records: Mutex<Vec<ResourceRecord>>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl Default for MockRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MockRecordStore {
    fn lookup(&self, key: &QueryKey) -> Vec<ResourceRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.key() == *key)
            .cloned()
            .collect()
    }

    fn insert(&self, record: ResourceRecord) {
        self.records.lock().unwrap().push(record);
    }

    fn all_entries(&self) -> Vec<(QueryKey, Vec<ResourceRecord>)> {
        let records = self.records.lock().unwrap();
        let mut entries: Vec<(QueryKey, Vec<ResourceRecord>)> = Vec::new();
        for record in records.iter() {
            match entries.iter_mut().find(|(key, _)| *key == record.key()) {
                Some((_, set)) => set.push(record.clone()),
                None => entries.push((record.key(), vec![record.clone()])),
            }
        }
        entries
    }
}
