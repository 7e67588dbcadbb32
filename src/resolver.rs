use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use std::net::IpAddr;
use thiserror::Error;
use tracing::info;

/// Startup-only resolution failure. The operator recovers by entering a
/// different host; the monitor loop never sees this error.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ResolutionError(String);

pub struct Resolver {
    inner: TokioResolver,
}

impl Resolver {
    pub fn new() -> Self {
        let inner = TokioResolver::builder_with_config(
            ResolverConfig::cloudflare(),
            TokioConnectionProvider::default(),
        )
        .build();
        info!("DNS resolver configured: Cloudflare 1.1.1.1 / 1.0.0.1");
        Self { inner }
    }

    /// Resolves a hostname or literal IP to a single concrete address. IP
    /// literals short-circuit without touching the network; hostnames take
    /// the first address the lookup returns.
    pub async fn resolve(&self, host: &str) -> Result<IpAddr, ResolutionError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(ip);
        }
        match self.inner.lookup_ip(host).await {
            Ok(lookup) => lookup
                .iter()
                .next()
                .ok_or_else(|| ResolutionError(format!("No IP address found for {}", host))),
            Err(e) => Err(ResolutionError(e.to_string())),
        }
    }
}
