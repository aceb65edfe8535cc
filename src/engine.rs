// src/engine.rs
//! Resolution pipeline.
//!
//! A fixed pool of workers pulls candidates from a shared bounded queue,
//! runs every record lookup for a candidate and publishes exactly one
//! [`LookupResult`] per candidate into a bounded result channel. A single
//! consumer drains that channel; a slow consumer throttles the workers.

use crate::error::Result;
use crate::output::OutputManager;
use crate::resolver::{with_retry, DnsLookup, RetryPolicy};
use crate::types::{LookupError, LookupResult, RadonError, ResolverConfig, RunSummary};
use futures::future::join_all;
use log::{debug, info};
use crate::utils::{ipv4_literal, is_dotted_quad};
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub struct Pipeline {
    lookup: Arc<dyn DnsLookup>,
    policy: RetryPolicy,
    concurrency: usize,
}

impl Pipeline {
    pub fn new(lookup: Arc<dyn DnsLookup>, config: &ResolverConfig) -> Self {
        Self {
            lookup,
            policy: RetryPolicy::from(config),
            concurrency: config.concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Starts the workers and the task feeder, returning the result stream
    /// and a handle that completes once every worker has finished. Must be
    /// called from within a Tokio runtime.
    pub fn dispatch(&self, candidates: Vec<String>) -> (Receiver<LookupResult>, JoinHandle<Result<()>>) {
        let (task_tx, task_rx) = mpsc::channel::<String>(self.concurrency);
        let task_rx = Arc::new(Mutex::new(task_rx));
        let (result_tx, result_rx) = mpsc::channel::<LookupResult>(self.concurrency);

        let workers: Vec<JoinHandle<()>> = (0..self.concurrency)
            .map(|id| {
                tokio::spawn(worker(
                    id,
                    task_rx.clone(),
                    result_tx.clone(),
                    self.lookup.clone(),
                    self.policy,
                ))
            })
            .collect();
        drop(result_tx);

        let driver = tokio::spawn(async move {
            for candidate in candidates {
                task_tx
                    .send(candidate)
                    .await
                    .map_err(|_| RadonError::PipelineError("task queue closed early".to_string()))?;
            }
            drop(task_tx);

            for joined in join_all(workers).await {
                joined.map_err(|e| RadonError::PipelineError(format!("worker failed: {}", e)))?;
            }
            Ok(())
        });

        (result_rx, driver)
    }

    /// Resolves every candidate and renders each result through `output`
    /// as it completes. Returns once all workers and the consumer are done.
    pub async fn run(&self, candidates: Vec<String>, output: &OutputManager) -> Result<RunSummary> {
        let expected = candidates.len();
        debug!("resolving domains domainCount={} workers={}", expected, self.concurrency);

        let (mut results, driver) = self.dispatch(candidates);
        let summary = output.drain(&mut results, expected).await?;
        drop(results);

        driver
            .await
            .map_err(|e| RadonError::PipelineError(format!("task feeder failed: {}", e)))??;

        if summary.results != expected {
            return Err(RadonError::PipelineError(format!(
                "expected {} results, received {}",
                expected, summary.results
            )));
        }

        info!(
            "Resolved {} candidates: {} with records, {} failed lookups",
            summary.results, summary.with_records, summary.failed_lookups
        );
        Ok(summary)
    }
}

async fn worker(
    id: usize,
    tasks: Arc<Mutex<Receiver<String>>>,
    results: Sender<LookupResult>,
    lookup: Arc<dyn DnsLookup>,
    policy: RetryPolicy,
) {
    loop {
        let next = tasks.lock().await.recv().await;
        let Some(domain) = next else {
            break;
        };

        let result = resolve(lookup.as_ref(), &domain, &policy).await;
        if results.send(result).await.is_err() {
            debug!("worker {}: result consumer went away", id);
            break;
        }
    }
}

fn settle<T: Default>(result: &mut LookupResult, outcome: std::result::Result<T, LookupError>) -> T {
    match outcome {
        Ok(value) => value,
        Err(e) => {
            result.errors.insert(e.kind(), e);
            T::default()
        }
    }
}

/// Runs every applicable lookup for one candidate. A literal IPv4 address
/// gets a PTR lookup only; any other name gets address, TXT, MX and CNAME
/// lookups, issued concurrently. Failures only empty their own field.
///
/// A dotted quad that is not a valid address is never sent to the resolver;
/// it comes back with a PTR failure.
pub async fn resolve(lookup: &dyn DnsLookup, domain: &str, policy: &RetryPolicy) -> LookupResult {
    use crate::types::RecordKind::*;

    let mut result = LookupResult::new(domain);

    if is_dotted_quad(domain) {
        let hosts = match ipv4_literal(domain) {
            Some(ip) => with_retry(Ptr, domain, policy, || lookup.lookup_addr(IpAddr::V4(ip))).await,
            None => Err(LookupError::Exhausted {
                kind: Ptr,
                domain: domain.to_string(),
                attempts: 0,
                message: "not a valid IPv4 address".to_string(),
            }),
        };
        result.ptr_hosts = settle(&mut result, hosts);
        return result;
    }

    let (addresses, txt, mx, cname) = tokio::join!(
        with_retry(Address, domain, policy, || lookup.lookup_host(domain)),
        with_retry(Txt, domain, policy, || lookup.lookup_txt(domain)),
        with_retry(Mx, domain, policy, || lookup.lookup_mx(domain)),
        with_retry(Cname, domain, policy, || lookup.lookup_cname(domain)),
    );
    result.addresses = settle(&mut result, addresses);
    result.txt = settle(&mut result, txt);
    result.mx = settle(&mut result, mx);
    result.cname = settle(&mut result, cname);

    result
}
