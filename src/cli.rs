use clap::Parser;
use std::path::PathBuf;

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

#[derive(Parser, Debug, Clone)]
#[command(
    name = "radon",
    version,
    long_version = LONG_VERSION,
    about = "Fast DNS resolver and bruteforce tool",
    long_about = "Fast DNS resolver and bruteforce tool.\n\n\
Resolve domains in file:\n    radon -d domains.txt\n\n\
Generate permutations and resolve them:\n    radon -p -d domains.txt"
)]
pub struct Args {
    /// Path to file with domains to lookup ("-" reads stdin)
    #[arg(short = 'd', long = "domains-file", value_name = "FILE", default_value = "domains.txt")]
    pub domains_file: String,

    /// Concurrent lookups [default: 100]
    #[arg(short = 'c', long = "concurrency")]
    pub concurrency: Option<usize>,

    /// Path to resolv.conf [default: ~/.radon/resolv.conf]
    #[arg(short = 'r', long = "resolve-conf", value_name = "FILE")]
    pub resolve_conf: Option<PathBuf>,

    /// Ignore hosts that resolve to specific ip(s)
    #[arg(long = "ignore-addr", value_delimiter = ',')]
    pub ignore_addr: Vec<String>,

    /// Ignore hosts that resolve to specific alias(es)
    #[arg(long = "ignore-alias", value_delimiter = ',')]
    pub ignore_alias: Vec<String>,

    /// Lookup timeout in seconds [default: 10]
    #[arg(short = 't', long = "lookup-timeout", value_name = "SECONDS")]
    pub lookup_timeout: Option<u64>,

    /// Number of failed attempts before we give up [default: 4]
    #[arg(short = 'a', long = "max-attempts")]
    pub max_attempts: Option<u32>,

    /// Display debug information
    #[arg(long = "debug")]
    pub debug: bool,

    /// Jumble used tokens to make new subdomains
    #[arg(long = "invoke-random")]
    pub invoke_random: bool,

    /// Permute domains
    #[arg(short = 'p', long = "permute")]
    pub permute: bool,

    /// Configuration file path (TOML)
    #[arg(long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,
}
