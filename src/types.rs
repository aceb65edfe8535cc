// src/types.rs
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub resolver: ResolverConfig,
    pub permute: PermuteConfig,
}

/// Runtime parameters consumed by the resolution pipeline. Upstream servers
/// come from `resolv_conf` when set, otherwise from `nameservers`
/// (`ip:port` entries).
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub concurrency: usize,
    pub lookup_timeout: Duration,
    pub max_attempts: u32,
    pub resolv_conf: Option<PathBuf>,
    pub nameservers: Vec<String>,
    pub ignore_addrs: Vec<String>,
    pub ignore_aliases: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            concurrency: 100,
            lookup_timeout: Duration::from_secs(10),
            max_attempts: 4,
            resolv_conf: None,
            nameservers: Vec::new(),
            ignore_addrs: Vec::new(),
            ignore_aliases: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermuteConfig {
    pub permute: bool,
    pub random_brute: bool,
}

/// Shape of the optional TOML configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub resolver: FileResolverSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileResolverSection {
    pub concurrency: Option<usize>,
    pub lookup_timeout_secs: Option<u64>,
    pub max_attempts: Option<u32>,
    pub resolv_conf: Option<PathBuf>,
    pub nameservers: Option<Vec<String>>,
    pub ignore_addrs: Option<Vec<String>>,
    pub ignore_aliases: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKind {
    Address,
    Ptr,
    Txt,
    Mx,
    Cname,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Address => "A/AAAA",
            RecordKind::Ptr => "PTR",
            RecordKind::Txt => "TXT",
            RecordKind::Mx => "MX",
            RecordKind::Cname => "CNAME",
        };
        f.write_str(name)
    }
}

/// Terminal failure of one record kind for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{kind} lookup for \"{domain}\" timed out after {after:?}")]
    Timeout {
        kind: RecordKind,
        domain: String,
        after: Duration,
    },

    #[error("{kind} lookup for \"{domain}\" failed after {attempts} attempts: {message}")]
    Exhausted {
        kind: RecordKind,
        domain: String,
        attempts: u32,
        message: String,
    },
}

impl LookupError {
    pub fn kind(&self) -> RecordKind {
        match self {
            LookupError::Timeout { kind, .. } | LookupError::Exhausted { kind, .. } => *kind,
        }
    }
}

/// Everything learned about one candidate. Published only once every
/// record kind has reached a terminal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupResult {
    pub domain: String,
    pub addresses: Vec<String>,
    pub txt: Vec<String>,
    pub mx: Vec<String>,
    pub cname: Option<String>,
    pub ptr_hosts: Vec<String>,
    pub errors: BTreeMap<RecordKind, LookupError>,
}

impl LookupResult {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Default::default()
        }
    }

    pub fn error(&self, kind: RecordKind) -> Option<&LookupError> {
        self.errors.get(&kind)
    }

    pub fn has_records(&self) -> bool {
        !self.addresses.is_empty()
            || !self.txt.is_empty()
            || !self.mx.is_empty()
            || !self.ptr_hosts.is_empty()
            || self.cname.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub results: usize,
    pub with_records: usize,
    pub failed_lookups: usize,
    pub lines_written: usize,
}

#[derive(Debug, Error)]
pub enum RadonError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Resolution error: {0}")]
    ResolutionError(String),

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("Pipeline error: {0}")]
    PipelineError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
