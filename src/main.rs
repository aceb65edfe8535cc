use anyhow::Result;
use clap::Parser;
use log::{debug, error, info};
use radon::{config, permute, utils, Args, IgnoreFilters, OutputManager, Pipeline, Resolver};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    let level = if args.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = match config::resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let domains = match utils::read_domains(&args.domains_file) {
        Ok(domains) => domains,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    if domains.is_empty() {
        println!("[!] No Domains found");
        return Ok(());
    }
    debug!("input domain count={}", domains.len());

    let unique_count = utils::deduplicate_domains(domains.iter().cloned()).len();
    debug!("unique domain count={}", unique_count);

    let candidates = permute::expand(&domains, &config.permute)?;
    debug!("additional permuted domains count={}", candidates.len().saturating_sub(unique_count));
    debug!("total domain count={}", candidates.len());

    let resolver = match Resolver::new(&config.resolver) {
        Ok(resolver) => resolver,
        Err(e) => {
            error!("unable to start resolver: {}", e);
            process::exit(1);
        }
    };

    let pipeline = Pipeline::new(Arc::new(resolver), &config.resolver);
    let output = OutputManager::stdout(IgnoreFilters::new(
        config.resolver.ignore_addrs.iter().cloned(),
        config.resolver.ignore_aliases.iter().cloned(),
    ));

    let summary = pipeline
        .run(candidates, &output)
        .await
        .map_err(|e| anyhow::anyhow!("Resolution failed: {}", e))?;

    info!(
        "Done: {} candidates, {} output lines, {} workers",
        summary.results,
        summary.lines_written,
        pipeline.concurrency()
    );

    Ok(())
}
