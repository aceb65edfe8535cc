// src/resolver.rs
use crate::error::Result;
use crate::types::{LookupError, RadonError, RecordKind, ResolverConfig};
use async_trait::async_trait;
use log::{debug, warn};
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use trust_dns_resolver::config::{NameServerConfig, Protocol, ResolverConfig as DnsResolverConfig, ResolverOpts};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::rr::RecordType;
use trust_dns_resolver::TokioAsyncResolver;

/// The DNS operations the pipeline needs. Implementations are shared by all
/// workers and must tolerate concurrent queries.
#[async_trait]
pub trait DnsLookup: Send + Sync {
    async fn lookup_host(&self, domain: &str) -> Result<Vec<String>>;
    async fn lookup_addr(&self, addr: IpAddr) -> Result<Vec<String>>;
    async fn lookup_txt(&self, domain: &str) -> Result<Vec<String>>;
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<String>>;
    async fn lookup_cname(&self, domain: &str) -> Result<Option<String>>;
}

/// Per-attempt timeout and attempt cap applied to every record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(timeout: Duration, max_attempts: u32) -> Self {
        Self {
            timeout,
            max_attempts: max_attempts.max(1),
        }
    }
}

impl From<&ResolverConfig> for RetryPolicy {
    fn from(config: &ResolverConfig) -> Self {
        Self::new(config.lookup_timeout, config.max_attempts)
    }
}

/// Runs `op` until it succeeds, times out, or returns errors
/// `policy.max_attempts` times in a row.
///
/// A timeout ends the lookup immediately, whatever attempts remain. The
/// in-flight future is dropped on timeout, which abandons the query.
pub async fn with_retry<T, F, Fut>(
    kind: RecordKind,
    domain: &str,
    policy: &RetryPolicy,
    mut op: F,
) -> std::result::Result<T, LookupError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match tokio::time::timeout(policy.timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) if attempt < policy.max_attempts => {
                debug!("{} lookup for {} failed on attempt {}: {}", kind, domain, attempt, e);
                attempt += 1;
            }
            Ok(Err(e)) => {
                warn!(
                    "failed: max attempts exhausted kind={} domain={} error={}",
                    kind, domain, e
                );
                return Err(LookupError::Exhausted {
                    kind,
                    domain: domain.to_string(),
                    attempts: attempt,
                    message: e.to_string(),
                });
            }
            Err(_) => {
                warn!(
                    "error: timed out kind={} domain={} after={:?}",
                    kind, domain, policy.timeout
                );
                return Err(LookupError::Timeout {
                    kind,
                    domain: domain.to_string(),
                    after: policy.timeout,
                });
            }
        }
    }
}

/// [`DnsLookup`] backed by trust-dns.
#[derive(Clone)]
pub struct Resolver {
    resolver: TokioAsyncResolver,
}

impl Resolver {
    /// Builds the resolver from a resolv.conf file when one is configured,
    /// otherwise from the configured nameserver list, which must not be empty.
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        match &config.resolv_conf {
            Some(path) => Self::from_resolv_conf(path),
            None => Self::from_nameservers(&config.nameservers, config.lookup_timeout),
        }
    }

    pub fn from_resolv_conf(path: &Path) -> Result<Self> {
        let contents = std::fs::read(path).map_err(|e| {
            RadonError::ConfigError(format!("Failed to read resolver configuration {}: {}", path.display(), e))
        })?;
        let (resolver_config, opts) =
            trust_dns_resolver::system_conf::parse_resolv_conf(&contents).map_err(|e| {
                RadonError::ConfigError(format!("Failed to parse resolver configuration {}: {}", path.display(), e))
            })?;
        if resolver_config.name_servers().is_empty() {
            return Err(RadonError::ConfigError(format!(
                "No nameservers found in {}",
                path.display()
            )));
        }

        debug!(
            "Loaded {} nameservers from {}",
            resolver_config.name_servers().len(),
            path.display()
        );
        Ok(Self {
            resolver: TokioAsyncResolver::tokio(resolver_config, opts),
        })
    }

    pub fn from_nameservers(nameservers: &[String], timeout: Duration) -> Result<Self> {
        if nameservers.is_empty() {
            return Err(RadonError::ConfigError("No nameservers configured".to_string()));
        }

        let mut resolver_config = DnsResolverConfig::new();
        for ns in nameservers {
            let socket_addr = SocketAddr::from_str(ns)
                .map_err(|e| RadonError::ConfigError(format!("Invalid nameserver address {}: {}", ns, e)))?;
            resolver_config.add_name_server(NameServerConfig {
                socket_addr,
                protocol: Protocol::Udp,
                tls_dns_name: None,
                trust_negative_responses: false,
                bind_addr: None,
            });
        }

        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        // retries are driven by `with_retry`
        opts.attempts = 1;

        Ok(Self {
            resolver: TokioAsyncResolver::tokio(resolver_config, opts),
        })
    }
}

fn is_no_records(e: &ResolveError) -> bool {
    matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

/// An authoritative "no such records" answer is a result, not a transient
/// failure, so it maps to an empty value instead of being retried.
fn collect_records<T, U, F>(
    lookup: std::result::Result<T, ResolveError>,
    kind: RecordKind,
    target: &str,
    map: F,
) -> Result<U>
where
    U: Default,
    F: FnOnce(T) -> U,
{
    match lookup {
        Ok(found) => Ok(map(found)),
        Err(e) if is_no_records(&e) => Ok(U::default()),
        Err(e) => Err(RadonError::ResolutionError(format!(
            "{} lookup for {}: {}",
            kind, target, e
        ))),
    }
}

#[async_trait]
impl DnsLookup for Resolver {
    async fn lookup_host(&self, domain: &str) -> Result<Vec<String>> {
        collect_records(self.resolver.lookup_ip(domain).await, RecordKind::Address, domain, |lookup| {
            lookup.iter().map(|ip| ip.to_string()).collect()
        })
    }

    async fn lookup_addr(&self, addr: IpAddr) -> Result<Vec<String>> {
        let target = addr.to_string();
        collect_records(self.resolver.reverse_lookup(addr).await, RecordKind::Ptr, &target, |lookup| {
            lookup.iter().map(|host| host.to_string()).collect()
        })
    }

    async fn lookup_txt(&self, domain: &str) -> Result<Vec<String>> {
        collect_records(self.resolver.txt_lookup(domain).await, RecordKind::Txt, domain, |lookup| {
            lookup.iter().map(|txt| txt.to_string()).collect()
        })
    }

    async fn lookup_mx(&self, domain: &str) -> Result<Vec<String>> {
        collect_records(self.resolver.mx_lookup(domain).await, RecordKind::Mx, domain, |lookup| {
            lookup
                .iter()
                .map(|mx| format!("{} {}", mx.preference(), mx.exchange()))
                .collect()
        })
    }

    async fn lookup_cname(&self, domain: &str) -> Result<Option<String>> {
        collect_records(
            self.resolver.lookup(domain, RecordType::CNAME).await,
            RecordKind::Cname,
            domain,
            |lookup| {
                lookup
                    .iter()
                    .find_map(|rdata| rdata.as_cname())
                    .map(|cname| cname.to_string())
            },
        )
    }
}
