use crate::app::ports::{DomainStatus, DomainValidityPort};
use crate::observability::metrics;
use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use std::time::Duration;
use tracing::{debug, warn};

/// MX lookups through the system resolver configuration.
pub struct MxDomainValidity {
    resolver: TokioAsyncResolver,
}

impl MxDomainValidity {
    pub fn new(timeout: Duration) -> Self {
        let resolver = match hickory_resolver::system_conf::read_system_conf() {
            Ok((config, mut opts)) => {
                opts.timeout = timeout;
                TokioAsyncResolver::tokio(config, opts)
            }
            Err(e) => {
                warn!("Falling back to default resolver config: {}", e);
                let mut opts = ResolverOpts::default();
                opts.timeout = timeout;
                TokioAsyncResolver::tokio(ResolverConfig::default(), opts)
            }
        };
        Self { resolver }
    }
}

#[async_trait]
impl DomainValidityPort for MxDomainValidity {
    async fn check(&self, domain: &str) -> DomainStatus {
        // Fully qualified so resolver search domains are not appended
        let fqdn = format!("{}.", domain.trim().trim_end_matches('.').to_lowercase());
        let status = match self.resolver.mx_lookup(fqdn.as_str()).await {
            Ok(lookup) => {
                let exchanges = lookup.iter().count();
                if exchanges > 0 {
                    DomainStatus::AcceptsMail { exchanges }
                } else {
                    DomainStatus::NoMailExchange
                }
            }
            Err(e) => match e.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => DomainStatus::NoMailExchange,
                _ => DomainStatus::Unresolvable(e.to_string()),
            },
        };

        debug!("MX check for {}: {:?}", domain, status);
        metrics::domain::checked(status.is_valid());
        status
    }
}

/// Returns the same answer for every domain. Used for offline runs and tests.
pub struct FixedDomainValidity(pub bool);

#[async_trait]
impl DomainValidityPort for FixedDomainValidity {
    async fn check(&self, _domain: &str) -> DomainStatus {
        if self.0 {
            DomainStatus::AcceptsMail { exchanges: 1 }
        } else {
            DomainStatus::NoMailExchange
        }
    }
}
