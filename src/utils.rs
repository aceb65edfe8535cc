// src/utils.rs
use crate::error::Result;
use crate::types::RadonError;
use log::warn;
use regex::Regex;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::net::Ipv4Addr;
use std::path::Path;

/// Sentinel path meaning "read from standard input".
pub const STDIN_PATH: &str = "-";

// optional "<rank>," prefix and any "/path" suffix, as found in ranked domain lists
const CLEANER_PATTERN: &str = r"^([0-9]+,)?([^/]*)(?:/.*)?$";

/// True when `candidate` is written as four dot-separated runs of 1-3 digits.
pub fn is_dotted_quad(candidate: &str) -> bool {
    let mut octets = 0;
    for part in candidate.split('.') {
        octets += 1;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    octets == 4
}

/// The address `candidate` names when it is an IPv4 literal. Dotted quads
/// with out-of-range octets or leading zeros are not literals.
pub fn ipv4_literal(candidate: &str) -> Option<Ipv4Addr> {
    candidate.parse().ok()
}

/// Reads lines from a file into a vector of strings.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    reader.lines().collect()
}

/// Reads candidate domains from `path`, or from stdin when `path` is `-`.
pub fn read_domains(path: &str) -> Result<Vec<String>> {
    let lines = if path == STDIN_PATH {
        if atty::is(atty::Stream::Stdin) {
            warn!("Reading domains from an interactive terminal, end input with Ctrl-D");
        }
        io::stdin().lock().lines().collect::<io::Result<Vec<_>>>()?
    } else {
        read_lines(Path::new(path))
            .map_err(|e| RadonError::ConfigError(format!("Failed to read domains from {}: {}", path, e)))?
    };
    parse_domains(lines)
}

/// Keeps literal IPv4 addresses and cleaned, valid DNS names. Everything
/// else, including dotted quads that are not valid addresses, is dropped.
pub fn parse_domains<I>(lines: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let cleaner = Regex::new(CLEANER_PATTERN)
        .map_err(|e| RadonError::ConfigError(format!("Regex error: {}", e)))?;

    Ok(lines
        .into_iter()
        .filter_map(|line| clean_line(&line, &cleaner))
        .collect())
}

fn clean_line(line: &str, cleaner: &Regex) -> Option<String> {
    let line = line.trim();
    if is_dotted_quad(line) {
        return ipv4_literal(line).map(|ip| ip.to_string());
    }

    let cleaned = cleaner.captures(line)?.get(2)?.as_str();
    let cleaned = cleaned.trim_end_matches('.').to_lowercase();
    is_valid_domain(&cleaned).then_some(cleaned)
}

/// Check if a string is a valid domain
pub fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }

    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() < 2 {
        return false;
    }

    for part in parts {
        if part.is_empty() || part.len() > 63 {
            return false;
        }

        if !part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return false;
        }

        if part.starts_with('-') || part.ends_with('-') {
            return false;
        }
    }

    true
}

/// Remove duplicate domains (case-insensitive), keeping first-seen order
pub fn deduplicate_domains<I>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for domain in domains {
        let lower = domain.to_lowercase();
        if seen.insert(lower) {
            unique.push(domain);
        }
    }

    unique
}
