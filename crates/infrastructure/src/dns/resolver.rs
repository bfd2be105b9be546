//! Iterative resolution engine.
//!
//! One lookup walks the hierarchy from the root server, following
//! referrals at the same indirection level and spending one level on every
//! CNAME hop or nameserver-address detour. The level is bounded, so every
//! lookup terminates.

use crate::dns::wire::{decode_response, encode_query, ParsedMessage};
use dnswalk_application::ports::{DnsTransport, HostResolver, RecordStore, TraceSink};
use dnswalk_domain::{QueryKey, RecordType, ResolveError, ResourceRecord};
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// What one query against one server told us.
#[derive(Debug)]
enum StepOutcome {
    /// The cache now holds records for the key being queried.
    Answered,
    /// Same-level referral: retry the same key against this server.
    Referral(IpAddr),
    /// The name is an alias; resolve the target from the root instead.
    CnameFollow(String),
    /// A nameserver was named without a usable address; its address must
    /// be resolved first.
    Detour(String),
    /// Nothing usable came back from this server.
    Failed,
}

pub struct IterativeResolver {
    cache: Arc<dyn RecordStore>,
    transport: Arc<dyn DnsTransport>,
    trace: Arc<dyn TraceSink>,
    trace_enabled: AtomicBool,
    root_server: RwLock<IpAddr>,
    dns_port: u16,
    max_indirection: u32,
}

impl IterativeResolver {
    pub fn new(
        cache: Arc<dyn RecordStore>,
        transport: Arc<dyn DnsTransport>,
        trace: Arc<dyn TraceSink>,
        root_server: IpAddr,
        dns_port: u16,
        max_indirection: u32,
    ) -> Self {
        Self {
            cache,
            transport,
            trace,
            trace_enabled: AtomicBool::new(false),
            root_server: RwLock::new(root_server),
            dns_port,
            max_indirection,
        }
    }

    /// Changes the server every subsequent lookup starts from.
    pub fn set_root_server(&self, server: IpAddr) {
        *write_lock(&self.root_server) = server;
    }

    pub fn root_server(&self) -> IpAddr {
        *read_lock(&self.root_server)
    }

    pub fn set_trace_enabled(&self, enabled: bool) {
        self.trace_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn trace_enabled(&self) -> bool {
        self.trace_enabled.load(Ordering::Relaxed)
    }

    /// Sends one query for `key` to `server` and classifies the result.
    /// Every failure mode short of the indirection budget collapses into
    /// `Failed`; the caller decides what that branch costs.
    fn query_step(&self, key: &QueryKey, server: IpAddr) -> StepOutcome {
        let (query, id) = encode_query(key);
        if self.trace_enabled() {
            self.trace.query_sent(id, key, server);
        }

        let target = SocketAddr::new(server, self.dns_port);
        let response = match self.transport.exchange(target, &query) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(%server, key = %key, error = %e, "no response from server");
                return StepOutcome::Failed;
            }
        };

        let parsed = match decode_response(&response, id) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(%server, key = %key, error = %e, "unusable response");
                return StepOutcome::Failed;
            }
        };

        if self.trace_enabled() {
            self.trace.response_received(
                id,
                parsed.authoritative,
                &parsed.answers,
                &parsed.authority,
                &parsed.additional,
            );
        }

        // Only an authoritative server's word goes into the cache, but
        // then every record it sent does, across all three sections.
        if parsed.authoritative {
            for record in parsed.records() {
                self.cache.insert(record.clone());
            }
        }

        self.classify(key, &parsed)
    }

    fn classify(&self, key: &QueryKey, parsed: &ParsedMessage) -> StepOutcome {
        if parsed.authoritative {
            let direct_match = parsed.answers.iter().any(|record| {
                record.record_type() == key.record_type()
                    && record.name().eq_ignore_ascii_case(key.name())
            });
            if direct_match {
                return StepOutcome::Answered;
            }
        }

        // An alias for the queried name redirects the lookup even when
        // the server was not authoritative: the target is resolved from
        // the root like any other name. Skipped when CNAME itself is the
        // queried type, where the alias record is the answer.
        if key.record_type() != RecordType::CNAME {
            let alias = parsed.answers.iter().find_map(|record| {
                if record.record_type() == RecordType::CNAME
                    && record.name().eq_ignore_ascii_case(key.name())
                {
                    record.target_name().map(str::to_string)
                } else {
                    None
                }
            });
            if let Some(target) = alias {
                return StepOutcome::CnameFollow(target);
            }
        }

        // Referral: a delegated nameserver whose address came along as
        // glue in the additional section.
        let mut glueless: Option<String> = None;
        for ns in parsed
            .authority
            .iter()
            .filter(|record| record.record_type() == RecordType::NS)
        {
            let Some(ns_name) = ns.target_name() else {
                continue;
            };
            let glue = parsed.additional.iter().find_map(|record| {
                if record.record_type() == RecordType::A
                    && record.name().eq_ignore_ascii_case(ns_name)
                {
                    record.ip()
                } else {
                    None
                }
            });
            match glue {
                Some(address) => return StepOutcome::Referral(address),
                None => {
                    if glueless.is_none() {
                        glueless = Some(ns_name.to_string());
                    }
                }
            }
        }

        match glueless {
            Some(ns_name) => StepOutcome::Detour(ns_name),
            None => StepOutcome::Failed,
        }
    }

    /// A previously cached alias lets a lookup skip straight to the
    /// target without touching the network.
    fn cached_alias(&self, key: &QueryKey) -> Option<String> {
        if key.record_type() == RecordType::CNAME {
            return None;
        }
        self.cache
            .lookup(&QueryKey::new(key.name(), RecordType::CNAME))
            .first()
            .and_then(|record| record.target_name().map(str::to_string))
    }
}

impl HostResolver for IterativeResolver {
    fn resolve(&self, key: &QueryKey) -> Result<Vec<ResourceRecord>, ResolveError> {
        let root = self.root_server();
        let mut current = key.clone();
        let mut server = root;
        let mut level: u32 = 0;
        // Suspended keys whose resolution is waiting on a detour.
        let mut pending: Vec<QueryKey> = Vec::new();
        // Same-level referrals do not spend indirection budget but are
        // still bounded, so a delegation loop cannot run forever.
        let mut referrals: u32 = 0;

        loop {
            let outcome = {
                let cached = self.cache.lookup(&current);
                if !cached.is_empty() {
                    StepOutcome::Answered
                } else if let Some(target) = self.cached_alias(&current) {
                    StepOutcome::CnameFollow(target)
                } else if referrals > self.max_indirection {
                    debug!(key = %current, "referral chain exhausted");
                    StepOutcome::Failed
                } else {
                    self.query_step(&current, server)
                }
            };

            match outcome {
                StepOutcome::Answered => match pending.pop() {
                    None => return Ok(self.cache.lookup(&current)),
                    Some(suspended) => {
                        // The detour produced an address; aim the
                        // suspended query at it.
                        let address = self
                            .cache
                            .lookup(&current)
                            .iter()
                            .find_map(ResourceRecord::ip);
                        match address {
                            Some(ip) => {
                                debug!(key = %suspended, %ip, "detour resolved, resuming");
                                current = suspended;
                                server = ip;
                                referrals = 0;
                            }
                            None => return Ok(self.cache.lookup(&suspended)),
                        }
                    }
                },
                StepOutcome::Referral(address) => {
                    debug!(key = %current, %address, "following referral");
                    server = address;
                    referrals += 1;
                }
                StepOutcome::CnameFollow(target) => {
                    level += 1;
                    if level > self.max_indirection {
                        return Err(ResolveError::MaxIndirectionExceeded);
                    }
                    debug!(from = %current.name(), to = %target, level, "following alias");
                    current = QueryKey::new(target, current.record_type());
                    server = root;
                    referrals = 0;
                }
                StepOutcome::Detour(ns_name) => {
                    level += 1;
                    if level > self.max_indirection {
                        return Err(ResolveError::MaxIndirectionExceeded);
                    }
                    debug!(nameserver = %ns_name, level, "resolving nameserver address");
                    pending.push(current);
                    current = QueryKey::new(ns_name, RecordType::A);
                    server = root;
                    referrals = 0;
                }
                StepOutcome::Failed => {
                    // Abandon this branch: the suspended caller resumes
                    // with whatever the cache already holds for it.
                    return match pending.pop() {
                        Some(suspended) => Ok(self.cache.lookup(&suspended)),
                        None => Ok(Vec::new()),
                    };
                }
            }
        }
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
