// src/lib.rs
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod permute;
pub mod resolver;
pub mod tree;
pub mod types;
pub mod utils;

pub use cli::Args;
pub use engine::Pipeline;
pub use output::{IgnoreFilters, OutputManager};
pub use resolver::{DnsLookup, Resolver, RetryPolicy};
pub use tree::DomainRegistry;
pub use types::{Config, LookupError, LookupResult, RadonError, RecordKind, RunSummary};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
