use crate::query_key::QueryKey;
use crate::record_type::RecordType;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Decoded RDATA of a resource record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    /// Domain name payload (NS target, CNAME target).
    Name(String),
    /// MX exchange with its preference. The preference is retained for
    /// diagnostics only; resolution treats MX like any other name payload.
    Mx { preference: u16, exchange: String },
    /// RDATA we consume to keep the stream aligned but never interpret
    /// (SOA and unsupported types). Never cached, never an answer.
    Opaque(Vec<u8>),
}

/// One decoded resource record.
///
/// Created by the wire decoder; afterwards owned by the cache (when the
/// response was authoritative) or used transiently for referral decisions.
#[derive(Debug, Clone)]
pub struct ResourceRecord {
    name: String,
    record_type: RecordType,
    ttl: u32,
    data: RecordData,
}

impl ResourceRecord {
    pub fn new(name: impl Into<String>, record_type: RecordType, ttl: u32, data: RecordData) -> Self {
        Self {
            name: name.into(),
            record_type,
            ttl,
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn data(&self) -> &RecordData {
        &self.data
    }

    pub fn key(&self) -> QueryKey {
        QueryKey::new(self.name.clone(), self.record_type)
    }

    pub fn ip(&self) -> Option<IpAddr> {
        match self.data {
            RecordData::Ipv4(addr) => Some(IpAddr::V4(addr)),
            RecordData::Ipv6(addr) => Some(IpAddr::V6(addr)),
            _ => None,
        }
    }

    /// Target host name for records whose payload is a name (NS, CNAME, MX).
    pub fn target_name(&self) -> Option<&str> {
        match &self.data {
            RecordData::Name(name) => Some(name),
            RecordData::Mx { exchange, .. } => Some(exchange),
            _ => None,
        }
    }

    /// Records with opaque payloads are kept only for trace output.
    pub fn is_cacheable(&self) -> bool {
        !matches!(self.data, RecordData::Opaque(_))
    }

    /// Printable value column for result and trace lines.
    pub fn value_text(&self) -> String {
        match &self.data {
            RecordData::Ipv4(addr) => addr.to_string(),
            RecordData::Ipv6(addr) => addr.to_string(),
            RecordData::Name(name) => name.clone(),
            RecordData::Mx { exchange, .. } => exchange.clone(),
            RecordData::Opaque(_) => "----".to_string(),
        }
    }
}

impl PartialEq for ResourceRecord {
    /// TTL is deliberately excluded: re-learning a record refreshes its
    /// expiry clock instead of producing a second cache entry.
    fn eq(&self, other: &Self) -> bool {
        self.record_type == other.record_type
            && self.name.eq_ignore_ascii_case(&other.name)
            && self.data == other.data
    }
}

impl Eq for ResourceRecord {}
