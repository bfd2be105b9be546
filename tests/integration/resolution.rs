//! End-to-end resolution tests: the real engine, cache and codec driven
//! against a scripted transport.

mod helpers;

use dnswalk_application::ports::{HostResolver, NullTraceSink, RecordStore, TraceSink};
use dnswalk_application::use_cases::{LookupAnswer, LookupHostUseCase};
use dnswalk_domain::{QueryKey, RecordType, ResolveError, ResourceRecord};
use dnswalk_infrastructure::dns::{IterativeResolver, RecordCache};
use helpers::{a_record, cname_record, ns_record, CannedResponse, ScriptedTransport};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

const ROOT: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 41, 0, 4));

fn resolver_with(
    transport: Arc<ScriptedTransport>,
) -> (Arc<IterativeResolver>, Arc<RecordCache>) {
    let cache = Arc::new(RecordCache::new());
    let resolver = Arc::new(IterativeResolver::new(
        cache.clone(),
        transport,
        Arc::new(NullTraceSink),
        ROOT,
        53,
        10,
    ));
    (resolver, cache)
}

#[test]
fn test_authoritative_answer_from_first_server() {
    let transport = Arc::new(ScriptedTransport::new().on(
        ROOT,
        "www.example.com",
        RecordType::A,
        CannedResponse::authoritative().answer(a_record("www.example.com", 300, [93, 184, 216, 34])),
    ));
    let (resolver, _cache) = resolver_with(transport.clone());

    let records = resolver
        .resolve(&QueryKey::new("www.example.com", RecordType::A))
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ip().unwrap().to_string(), "93.184.216.34");
    assert_eq!(transport.query_count(), 1);
}

#[test]
fn test_second_lookup_is_served_from_cache() {
    let transport = Arc::new(ScriptedTransport::new().on(
        ROOT,
        "www.example.com",
        RecordType::A,
        CannedResponse::authoritative().answer(a_record("www.example.com", 300, [93, 184, 216, 34])),
    ));
    let (resolver, _cache) = resolver_with(transport.clone());
    let key = QueryKey::new("www.example.com", RecordType::A);

    resolver.resolve(&key).unwrap();
    let records = resolver.resolve(&key).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(transport.query_count(), 1);
}

#[test]
fn test_referral_with_glue_is_followed() {
    let child = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 53));
    let transport = Arc::new(
        ScriptedTransport::new()
            .on(
                ROOT,
                "www.example.com",
                RecordType::A,
                CannedResponse::referral()
                    .authority(ns_record("example.com", 172800, "ns1.example.com"))
                    .additional(a_record("ns1.example.com", 172800, [192, 0, 2, 53])),
            )
            .on(
                child,
                "www.example.com",
                RecordType::A,
                CannedResponse::authoritative()
                    .answer(a_record("www.example.com", 300, [203, 0, 113, 80])),
            ),
    );
    let (resolver, cache) = resolver_with(transport.clone());

    let records = resolver
        .resolve(&QueryKey::new("www.example.com", RecordType::A))
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ip().unwrap().to_string(), "203.0.113.80");
    assert_eq!(
        transport.queries_sent(),
        vec![
            (ROOT, "www.example.com".to_string(), 1),
            (child, "www.example.com".to_string(), 1),
        ]
    );
    // The glue arrived in a non-authoritative referral, so it was used
    // transiently but never cached.
    assert!(cache
        .lookup(&QueryKey::new("ns1.example.com", RecordType::A))
        .is_empty());
}

#[test]
fn test_cname_chase_answers_for_the_queried_host() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .on(
                ROOT,
                "foo.example",
                RecordType::A,
                CannedResponse::authoritative().answer(cname_record("foo.example", 300, "bar.example")),
            )
            .on(
                ROOT,
                "bar.example",
                RecordType::A,
                CannedResponse::authoritative().answer(a_record("bar.example", 300, [93, 184, 216, 34])),
            ),
    );
    let (resolver, _cache) = resolver_with(transport.clone());
    let lookup = LookupHostUseCase::new(resolver);

    let rows = lookup.execute("foo.example", RecordType::A);

    assert_eq!(
        rows,
        vec![LookupAnswer {
            host: "foo.example".to_string(),
            record_type: RecordType::A,
            ttl: 300,
            value: "93.184.216.34".to_string(),
        }]
    );
    // Exactly one extra query for the alias target.
    assert_eq!(transport.query_count(), 2);
}

#[test]
fn test_non_authoritative_alias_is_still_followed() {
    // A server may hand back the alias without being authoritative for
    // it and without resolving the target; the lookup must chase the
    // target from the root rather than giving up.
    let transport = Arc::new(
        ScriptedTransport::new()
            .on(
                ROOT,
                "foo.example",
                RecordType::A,
                CannedResponse::referral().answer(cname_record("foo.example", 300, "bar.example")),
            )
            .on(
                ROOT,
                "bar.example",
                RecordType::A,
                CannedResponse::authoritative().answer(a_record("bar.example", 300, [93, 184, 216, 34])),
            ),
    );
    let (resolver, _cache) = resolver_with(transport.clone());

    let records = resolver
        .resolve(&QueryKey::new("foo.example", RecordType::A))
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ip().unwrap().to_string(), "93.184.216.34");
    assert_eq!(
        transport.queries_sent(),
        vec![
            (ROOT, "foo.example".to_string(), 1),
            (ROOT, "bar.example".to_string(), 1),
        ]
    );
}

#[test]
fn test_glueless_nameserver_detour() {
    let delegated = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10));
    let transport = Arc::new(
        ScriptedTransport::new()
            .on(
                ROOT,
                "www.example.org",
                RecordType::A,
                CannedResponse::referral()
                    .authority(ns_record("example.org", 86400, "ns1.nameserver.net")),
            )
            .on(
                ROOT,
                "ns1.nameserver.net",
                RecordType::A,
                CannedResponse::authoritative()
                    .answer(a_record("ns1.nameserver.net", 86400, [192, 0, 2, 10])),
            )
            .on(
                delegated,
                "www.example.org",
                RecordType::A,
                CannedResponse::authoritative()
                    .answer(a_record("www.example.org", 300, [203, 0, 113, 5])),
            ),
    );
    let (resolver, _cache) = resolver_with(transport.clone());

    let records = resolver
        .resolve(&QueryKey::new("www.example.org", RecordType::A))
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ip().unwrap().to_string(), "203.0.113.5");
    assert_eq!(
        transport.queries_sent(),
        vec![
            (ROOT, "www.example.org".to_string(), 1),
            (ROOT, "ns1.nameserver.net".to_string(), 1),
            (delegated, "www.example.org".to_string(), 1),
        ]
    );
}

#[test]
fn test_indirection_budget_stops_an_alias_cycle() {
    let mut transport = ScriptedTransport::new();
    for i in 0..=10 {
        transport = transport.on(
            ROOT,
            &format!("c{i}.example"),
            RecordType::A,
            CannedResponse::authoritative().answer(cname_record(
                &format!("c{i}.example"),
                300,
                &format!("c{}.example", i + 1),
            )),
        );
    }
    let (resolver, _cache) = resolver_with(Arc::new(transport));

    let err = resolver
        .resolve(&QueryKey::new("c0.example", RecordType::A))
        .unwrap_err();

    assert_eq!(err, ResolveError::MaxIndirectionExceeded);
}

#[test]
fn test_exhausted_indirection_prints_the_sentinel_row() {
    let mut transport = ScriptedTransport::new();
    for i in 0..=10 {
        transport = transport.on(
            ROOT,
            &format!("c{i}.example"),
            RecordType::A,
            CannedResponse::authoritative().answer(cname_record(
                &format!("c{i}.example"),
                300,
                &format!("c{}.example", i + 1),
            )),
        );
    }
    let (resolver, _cache) = resolver_with(Arc::new(transport));
    let lookup = LookupHostUseCase::new(resolver);

    let rows = lookup.execute("c0.example", RecordType::A);

    assert_eq!(
        rows,
        vec![LookupAnswer {
            host: "c0.example".to_string(),
            record_type: RecordType::A,
            ttl: -1,
            value: "0.0.0.0".to_string(),
        }]
    );
}

#[test]
fn test_unreachable_server_yields_empty_set() {
    let transport = Arc::new(ScriptedTransport::new());
    let (resolver, _cache) = resolver_with(transport.clone());

    let records = resolver
        .resolve(&QueryKey::new("www.example.com", RecordType::A))
        .unwrap();

    assert!(records.is_empty());
    assert_eq!(transport.query_count(), 1);
}

#[test]
fn test_failed_detour_abandons_the_branch() {
    // The root names a nameserver without glue and the detour for its
    // address goes unanswered; the lookup degrades to the empty set.
    let transport = Arc::new(ScriptedTransport::new().on(
        ROOT,
        "www.example.org",
        RecordType::A,
        CannedResponse::referral().authority(ns_record("example.org", 86400, "ns1.nameserver.net")),
    ));
    let (resolver, _cache) = resolver_with(transport.clone());

    let records = resolver
        .resolve(&QueryKey::new("www.example.org", RecordType::A))
        .unwrap();

    assert!(records.is_empty());
    assert_eq!(
        transport.queries_sent(),
        vec![
            (ROOT, "www.example.org".to_string(), 1),
            (ROOT, "ns1.nameserver.net".to_string(), 1),
        ]
    );
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl TraceSink for RecordingSink {
    fn query_sent(&self, _id: u16, key: &QueryKey, server: IpAddr) {
        self.events
            .lock()
            .unwrap()
            .push(format!("query {key} -> {server}"));
    }

    fn response_received(
        &self,
        _id: u16,
        authoritative: bool,
        answers: &[ResourceRecord],
        _authority: &[ResourceRecord],
        _additional: &[ResourceRecord],
    ) {
        self.events
            .lock()
            .unwrap()
            .push(format!("response aa={authoritative} answers={}", answers.len()));
    }
}

#[test]
fn test_trace_events_follow_the_query_flow() {
    let transport = Arc::new(ScriptedTransport::new().on(
        ROOT,
        "www.example.com",
        RecordType::A,
        CannedResponse::authoritative().answer(a_record("www.example.com", 300, [93, 184, 216, 34])),
    ));
    let cache = Arc::new(RecordCache::new());
    let sink = Arc::new(RecordingSink::default());
    let resolver = IterativeResolver::new(cache, transport, sink.clone(), ROOT, 53, 10);
    resolver.set_trace_enabled(true);

    HostResolver::resolve(&resolver, &QueryKey::new("www.example.com", RecordType::A)).unwrap();

    let events = sink.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            format!("query www.example.com A -> {ROOT}"),
            "response aa=true answers=1".to_string(),
        ]
    );
}
