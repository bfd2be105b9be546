use crate::record_type::RecordType;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The (host name, record type) pair a lookup or cache entry is keyed on.
///
/// The name keeps the spelling it was created with, but two keys compare
/// and hash equal regardless of ASCII case, matching DNS name semantics.
#[derive(Debug, Clone)]
pub struct QueryKey {
    name: String,
    record_type: RecordType,
}

impl QueryKey {
    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            record_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }
}

impl PartialEq for QueryKey {
    fn eq(&self, other: &Self) -> bool {
        self.record_type == other.record_type && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for QueryKey {}

impl Hash for QueryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.name.as_bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_u16(self.record_type.code());
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.record_type)
    }
}
