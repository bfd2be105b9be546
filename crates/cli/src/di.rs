use crate::trace::StdoutTraceSink;
use dnswalk_application::use_cases::{DumpCacheUseCase, LookupHostUseCase};
use dnswalk_domain::Config;
use dnswalk_infrastructure::dns::{IterativeResolver, RecordCache, UdpTransport};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Everything the command loop talks to, wired up once at startup.
pub struct Services {
    pub lookup: LookupHostUseCase,
    pub dump: DumpCacheUseCase,
    pub resolver: Arc<IterativeResolver>,
}

impl Services {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let cache = Arc::new(RecordCache::new());
        let transport = Arc::new(
            UdpTransport::bind(Duration::from_millis(config.resolver.query_timeout_ms))
                .map_err(|e| anyhow::anyhow!("cannot open UDP socket: {e}"))?,
        );

        let resolver = Arc::new(IterativeResolver::new(
            cache.clone(),
            transport,
            Arc::new(StdoutTraceSink),
            config.resolver.root_server,
            config.resolver.dns_port,
            config.resolver.max_indirection,
        ));

        info!(
            root_server = %config.resolver.root_server,
            timeout_ms = config.resolver.query_timeout_ms,
            "resolver initialised"
        );

        Ok(Self {
            lookup: LookupHostUseCase::new(resolver.clone()),
            dump: DumpCacheUseCase::new(cache),
            resolver,
        })
    }
}
