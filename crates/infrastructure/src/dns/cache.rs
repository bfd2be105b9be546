//! In-memory record cache with per-record TTL expiry.

use dashmap::DashMap;
use dnswalk_application::ports::RecordStore;
use dnswalk_domain::{QueryKey, ResourceRecord};
use rustc_hash::FxBuildHasher;
use std::time::{Duration, Instant};
use tracing::trace;

#[derive(Debug, Clone)]
struct CachedRecord {
    record: ResourceRecord,
    inserted: Instant,
}

impl CachedRecord {
    fn is_expired(&self, now: Instant) -> bool {
        // A zero TTL means usable for the in-flight resolution only, so
        // it is already dead by the time anything reads it back.
        now.duration_since(self.inserted) >= Duration::from_secs(u64::from(self.record.ttl()))
    }
}

/// Keyed by (name, type); each key holds every distinct record learned
/// for it. Expiry is lazy, checked on read.
pub struct RecordCache {
    entries: DashMap<QueryKey, Vec<CachedRecord>, FxBuildHasher>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
        }
    }

    fn lookup_at(&self, key: &QueryKey, now: Instant) -> Vec<ResourceRecord> {
        match self.entries.get_mut(key) {
            Some(mut slot) => {
                slot.retain(|cached| !cached.is_expired(now));
                slot.iter().map(|cached| cached.record.clone()).collect()
            }
            None => Vec::new(),
        }
    }

    fn insert_at(&self, record: ResourceRecord, now: Instant) {
        if !record.is_cacheable() {
            return;
        }
        let mut slot = self.entries.entry(record.key()).or_default();
        // Re-learning a known record restarts its clock in place;
        // equality ignores TTL so a changed TTL still matches.
        if let Some(existing) = slot.iter_mut().find(|cached| cached.record == record) {
            existing.record = record;
            existing.inserted = now;
            return;
        }
        trace!(key = %record.key(), ttl = record.ttl(), "caching record");
        slot.push(CachedRecord {
            record,
            inserted: now,
        });
    }
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for RecordCache {
    fn lookup(&self, key: &QueryKey) -> Vec<ResourceRecord> {
        self.lookup_at(key, Instant::now())
    }

    fn insert(&self, record: ResourceRecord) {
        self.insert_at(record, Instant::now());
    }

    fn all_entries(&self) -> Vec<(QueryKey, Vec<ResourceRecord>)> {
        let now = Instant::now();
        let mut entries: Vec<(QueryKey, Vec<ResourceRecord>)> = self
            .entries
            .iter()
            .filter_map(|slot| {
                let live: Vec<ResourceRecord> = slot
                    .value()
                    .iter()
                    .filter(|cached| !cached.is_expired(now))
                    .map(|cached| cached.record.clone())
                    .collect();
                if live.is_empty() {
                    None
                } else {
                    Some((slot.key().clone(), live))
                }
            })
            .collect();
        entries.sort_by(|(a, _), (b, _)| {
            a.name()
                .to_ascii_lowercase()
                .cmp(&b.name().to_ascii_lowercase())
                .then_with(|| a.record_type().code().cmp(&b.record_type().code()))
        });
        entries
    }
}
