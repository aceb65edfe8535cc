// src/permute/mod.rs
//! Candidate generation from a seed list.
//!
//! Three generators feed the candidate set: numeric increments, named
//! substitution groups and token-mined random brute. None of them dedupe;
//! [`expand`] merges everything with the seeds and removes duplicates.

mod brute;
mod groups;

pub use brute::{mine_tokens, random_brute, rank_tokens};
pub use groups::REPLACEMENT_GROUPS;

use crate::error::Result;
use crate::tree::split_registrable;
use crate::types::{PermuteConfig, RadonError};
use crate::utils::{deduplicate_domains, ipv4_literal, is_dotted_quad};
use log::debug;
use regex::{NoExpand, Regex};

/// Largest number substituted into a digit run, whatever its width.
pub const MAX_INCREMENT: u32 = 255;

/// Builds a case-sensitive whole-word pattern for `token`.
pub(crate) fn word_regex(token: &str) -> Result<Regex> {
    Regex::new(&format!(r"\b{}\b", regex::escape(token)))
        .map_err(|e| RadonError::InvalidDomain(format!("cannot match token {:?}: {}", token, e)))
}

/// A named set of interchangeable labels, e.g. environment names.
#[derive(Debug, Clone)]
pub struct TokenGroup {
    name: String,
    tokens: Vec<(String, Regex)>,
}

impl TokenGroup {
    pub fn new(name: &str, tokens: &[&str]) -> Result<Self> {
        let tokens = tokens
            .iter()
            .map(|token| Ok((token.to_string(), word_regex(token)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: name.to_string(),
            tokens,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub(crate) fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|(token, _)| token.as_str())
    }
}

/// Compiles the built-in substitution groups.
pub fn replacement_groups() -> Result<Vec<TokenGroup>> {
    REPLACEMENT_GROUPS
        .iter()
        .map(|(name, tokens)| TokenGroup::new(name, tokens))
        .collect()
}

fn digit_runs(domain: &str) -> Vec<(usize, usize)> {
    let bytes = domain.as_bytes();
    let mut runs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            runs.push((start, i));
        } else {
            i += 1;
        }
    }
    runs
}

fn max_increment(width: usize) -> u32 {
    u32::try_from(width)
        .ok()
        .and_then(|w| 10u32.checked_pow(w))
        .map_or(MAX_INCREMENT, |limit| (limit - 1).min(MAX_INCREMENT))
}

fn splice_number(domain: &str, start: usize, end: usize, value: u32) -> String {
    format!(
        "{}{:0width$}{}",
        &domain[..start],
        value,
        &domain[end..],
        width = end - start
    )
}

/// Replaces every maximal digit run with each zero-padded value in
/// `0..=min(10^width - 1, 255)`.
///
/// Runs are processed left to right. Each run is substituted into the
/// original name and into every variant produced for earlier runs, so
/// multiple runs combine. Padding keeps run widths, which keeps the byte
/// offsets of later runs valid in every variant.
pub fn increment_ints(domain: &str) -> Vec<String> {
    let mut generated: Vec<String> = Vec::new();

    for (start, end) in digit_runs(domain) {
        let limit = max_increment(end - start);
        let mut round = Vec::with_capacity((limit as usize + 1) * (generated.len() + 1));
        for value in 0..=limit {
            round.push(splice_number(domain, start, end, value));
            for previous in &generated {
                round.push(splice_number(previous, start, end, value));
            }
        }
        generated.extend(round);
    }

    generated
}

/// Swaps each group token found in the subdomain portion of `domain` for
/// every other token of the group. Names with no subdomain portion, or that
/// the public suffix list cannot classify, yield nothing.
pub fn extrapolate(domain: &str, group: &TokenGroup) -> Vec<String> {
    let (sub, suffix) = match split_registrable(domain) {
        Ok((Some(sub), suffix)) => (sub, suffix),
        Ok((None, _)) => return Vec::new(),
        Err(e) => {
            debug!("extrapolate: skipping {}: {}", domain, e);
            return Vec::new();
        }
    };

    let mut generated = Vec::new();
    for (token, pattern) in &group.tokens {
        if !pattern.is_match(sub) {
            continue;
        }
        for (replacement, _) in &group.tokens {
            if replacement == token {
                continue;
            }
            generated.push(format!(
                "{}.{}",
                pattern.replace_all(sub, NoExpand(replacement)),
                suffix
            ));
        }
    }
    generated
}

/// Runs the enabled generators over `seeds` and returns the seeds followed
/// by every new candidate, without duplicates.
pub fn expand(seeds: &[String], config: &PermuteConfig) -> Result<Vec<String>> {
    let mut generated = Vec::new();

    if config.permute {
        let groups = replacement_groups()?;
        let incremented: Vec<String> = seeds.iter().flat_map(|seed| increment_ints(seed)).collect();
        debug!("numeric increments generated {} names", incremented.len());

        for group in &groups {
            let before = generated.len();
            for domain in seeds.iter().chain(incremented.iter()) {
                generated.extend(extrapolate(domain, group));
            }
            debug!("group {:?} generated {} names", group.name(), generated.len() - before);
        }
        generated.extend(incremented);
    }

    if config.random_brute {
        let brute = random_brute(seeds)?;
        debug!("random brute generated {} names", brute.len());
        generated.extend(brute);
    }

    let before = generated.len();
    generated.retain(|candidate| !is_dotted_quad(candidate) || ipv4_literal(candidate).is_some());
    if generated.len() < before {
        debug!("dropped {} generated names that are not valid IPv4 addresses", before - generated.len());
    }

    Ok(deduplicate_domains(seeds.iter().cloned().chain(generated)))
}
