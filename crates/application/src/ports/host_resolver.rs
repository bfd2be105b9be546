use dnswalk_domain::{QueryKey, ResolveError, ResourceRecord};

/// Port for the iterative resolver engine.
pub trait HostResolver: Send + Sync {
    /// Walks the DNS hierarchy for `key` starting at the configured root
    /// server, following referrals and CNAME chains.
    ///
    /// Per-server failures degrade to an empty record set. The only error
    /// surfaced is exhaustion of the indirection budget.
    fn resolve(&self, key: &QueryKey) -> Result<Vec<ResourceRecord>, ResolveError>;
}
