use crate::cli::Args;
use crate::error::{ErrorContext, Result};
use crate::types::{Config, FileConfig, PermuteConfig, RadonError};
use log::debug;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the per-user directory holding the default resolver configuration.
pub const CONFIG_DIR_NAME: &str = ".radon";

pub const DEFAULT_RESOLV_CONF: &str = "\
# Default resolver configuration written by radon on first run.
nameserver 1.1.1.1
nameserver 1.0.0.1
nameserver 8.8.8.8
nameserver 8.8.4.4
nameserver 9.9.9.9
nameserver 149.112.112.112
options timeout:2 attempts:1
";

/// Loads a TOML configuration file over the built-in defaults.
pub fn load_config(config_path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read configuration file {}", config_path.display()))?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let file: FileConfig = toml::from_str(contents).with_context(|| "Failed to parse configuration file".to_string())?;
    let mut config = Config::default();
    let section = file.resolver;

    if let Some(concurrency) = section.concurrency {
        config.resolver.concurrency = concurrency;
    }
    if let Some(secs) = section.lookup_timeout_secs {
        config.resolver.lookup_timeout = Duration::from_secs(secs);
    }
    if let Some(max_attempts) = section.max_attempts {
        config.resolver.max_attempts = max_attempts;
    }
    if section.resolv_conf.is_some() {
        config.resolver.resolv_conf = section.resolv_conf;
    }
    if let Some(nameservers) = section.nameservers {
        config.resolver.nameservers = nameservers;
    }
    if let Some(addrs) = section.ignore_addrs {
        config.resolver.ignore_addrs = addrs;
    }
    if let Some(aliases) = section.ignore_aliases {
        config.resolver.ignore_aliases = aliases;
    }

    Ok(config)
}

fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(value) = env::var("RADON_CONCURRENCY") {
        config.resolver.concurrency = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid RADON_CONCURRENCY {:?}", value))?;
    }
    if let Ok(value) = env::var("RADON_MAX_ATTEMPTS") {
        config.resolver.max_attempts = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid RADON_MAX_ATTEMPTS {:?}", value))?;
    }
    if let Ok(value) = env::var("RADON_RESOLV_CONF") {
        config.resolver.resolv_conf = Some(PathBuf::from(value));
    }
    Ok(())
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(concurrency) = args.concurrency {
        config.resolver.concurrency = concurrency;
    }
    if let Some(secs) = args.lookup_timeout {
        config.resolver.lookup_timeout = Duration::from_secs(secs);
    }
    if let Some(max_attempts) = args.max_attempts {
        config.resolver.max_attempts = max_attempts;
    }
    if let Some(path) = &args.resolve_conf {
        config.resolver.resolv_conf = Some(path.clone());
    }
    config.resolver.ignore_addrs.extend(args.ignore_addr.iter().cloned());
    config.resolver.ignore_aliases.extend(args.ignore_alias.iter().cloned());
    config.permute = PermuteConfig {
        permute: args.permute,
        random_brute: args.invoke_random,
    };
}

pub fn validate_config(config: &Config) -> Result<()> {
    if config.resolver.concurrency == 0 {
        return Err(RadonError::ConfigError("Concurrency must be greater than 0".to_string()));
    }
    if config.resolver.max_attempts == 0 {
        return Err(RadonError::ConfigError("Max attempts must be at least 1".to_string()));
    }
    if config.resolver.lookup_timeout.is_zero() {
        return Err(RadonError::ConfigError("Lookup timeout must be greater than 0".to_string()));
    }
    Ok(())
}

/// Writes the default resolv.conf into `dir` unless one is already there.
pub fn bootstrap_resolv_conf(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create configuration directory {}", dir.display()))?;

    let path = dir.join("resolv.conf");
    if !path.exists() {
        fs::write(&path, DEFAULT_RESOLV_CONF)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Wrote default resolver configuration to {}", path.display());
    }
    Ok(path)
}

fn home_config_dir() -> Result<PathBuf> {
    env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(CONFIG_DIR_NAME))
        .ok_or_else(|| RadonError::ConfigError("Cannot locate home directory (HOME is unset)".to_string()))
}

/// Builds the effective configuration. Precedence, lowest first: defaults,
/// configuration file, environment, command line. When neither a resolver
/// configuration nor a nameserver list is given, the bootstrapped
/// `~/.radon/resolv.conf` is used.
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config_path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    apply_env_overrides(&mut config)?;
    apply_args(&mut config, args);

    if config.resolver.resolv_conf.is_none() && config.resolver.nameservers.is_empty() {
        config.resolver.resolv_conf = Some(bootstrap_resolv_conf(&home_config_dir()?)?);
    }

    validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_config_overrides_defaults() {
        let config = parse_config(
            r#"
            [resolver]
            concurrency = 25
            lookup_timeout_secs = 3
            ignore_addrs = ["127.0.0.1"]
            "#,
        )
        .unwrap();

        assert_eq!(config.resolver.concurrency, 25);
        assert_eq!(config.resolver.lookup_timeout, Duration::from_secs(3));
        assert_eq!(config.resolver.max_attempts, 4);
        assert_eq!(config.resolver.ignore_addrs, vec!["127.0.0.1".to_string()]);
    }

    #[test]
    fn test_parse_config_rejects_bad_toml() {
        assert!(parse_config("[resolver\nconcurrency = ").is_err());
    }

    #[test]
    fn test_validate_config() {
        let mut config = Config::default();
        assert!(validate_config(&config).is_ok());

        config.resolver.concurrency = 0;
        assert!(validate_config(&config).is_err());

        config = Config::default();
        config.resolver.max_attempts = 0;
        assert!(validate_config(&config).is_err());

        config = Config::default();
        config.resolver.lookup_timeout = Duration::ZERO;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bootstrap_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let conf_dir = dir.path().join(CONFIG_DIR_NAME);

        let path = bootstrap_resolv_conf(&conf_dir).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_RESOLV_CONF);

        fs::write(&path, "nameserver 10.0.0.53\n").unwrap();
        bootstrap_resolv_conf(&conf_dir).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "nameserver 10.0.0.53\n");
    }

    #[test]
    fn test_file_nameservers_skip_bootstrap() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("radon.toml");
        fs::write(&config_path, "[resolver]\nnameservers = [\"9.9.9.9:53\", \"149.112.112.112:53\"]\n").unwrap();

        let args = Args::parse_from(["radon", "--config", config_path.to_str().unwrap()]);
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.resolver.nameservers, vec!["9.9.9.9:53", "149.112.112.112:53"]);
        assert!(config.resolver.resolv_conf.is_none());
    }

    #[test]
    fn test_args_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("radon.toml");
        let resolv_path = dir.path().join("resolv.conf");
        fs::write(&config_path, "[resolver]\nconcurrency = 5\nmax_attempts = 2\n").unwrap();

        let args = Args::parse_from([
            "radon",
            "--config",
            config_path.to_str().unwrap(),
            "-c",
            "7",
            "-r",
            resolv_path.to_str().unwrap(),
            "--ignore-addr",
            "10.0.0.1,10.0.0.2",
            "--permute",
        ]);
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.resolver.concurrency, 7);
        assert_eq!(config.resolver.max_attempts, 2);
        assert_eq!(config.resolver.resolv_conf, Some(resolv_path));
        assert_eq!(config.resolver.ignore_addrs, vec!["10.0.0.1", "10.0.0.2"]);
        assert!(config.permute.permute);
        assert!(!config.permute.random_brute);
    }
}
