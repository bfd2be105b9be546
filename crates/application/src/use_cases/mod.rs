mod dump_cache;
mod lookup_host;

pub use dump_cache::DumpCacheUseCase;
pub use lookup_host::{LookupAnswer, LookupHostUseCase};
