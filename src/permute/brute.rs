// src/permute/brute.rs
//! Token-mined random brute.
//!
//! Labels seen under the seed domains are mined for reusable naming tokens,
//! which are then swapped into every seed that shares a token with at least
//! one other seed. Output grows with tokens squared times matching seeds.

use super::word_regex;
use crate::error::Result;
use crate::tree::{split_registrable, DomainRegistry};
use crate::utils::deduplicate_domains;
use log::debug;
use regex::NoExpand;
use std::collections::BTreeMap;

/// Minimum number of labels that must contain a prefix or suffix for it to
/// be kept as a token.
const MIN_SUPPORT: usize = 2;

/// Grows candidates one step at a time and keeps the longest one that is
/// still contained in at least [`MIN_SUPPORT`] labels.
fn longest_supported<'a, I, F>(candidates: I, support: F) -> Option<(&'a str, usize)>
where
    I: Iterator<Item = &'a str>,
    F: Fn(&str) -> usize,
{
    let mut best = None;
    for candidate in candidates {
        let count = support(candidate);
        if count < MIN_SUPPORT {
            break;
        }
        best = Some((candidate, count));
    }
    best
}

/// Mines naming tokens from a label frequency map.
///
/// Each label contributes itself (weighted by its frequency), each of its
/// alphanumeric pieces of two or more characters, and the longest prefix and
/// suffix shared with other labels (weighted by how many labels contain them).
pub fn mine_tokens(labels: &BTreeMap<String, usize>) -> BTreeMap<String, usize> {
    let label_set: Vec<&str> = labels.keys().map(String::as_str).collect();
    let support = |needle: &str| label_set.iter().filter(|label| label.contains(needle)).count();

    let mut tokens: BTreeMap<String, usize> = BTreeMap::new();
    for (label, &count) in labels {
        *tokens.entry(label.clone()).or_insert(0) += count;

        for piece in label
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|piece| piece.len() >= 2)
        {
            *tokens.entry(piece.to_string()).or_insert(0) += 1;
        }

        let prefixes = label
            .char_indices()
            .map(|(i, c)| &label[..i + c.len_utf8()]);
        if let Some((prefix, weight)) = longest_supported(prefixes, support) {
            *tokens.entry(prefix.to_string()).or_insert(0) += weight;
        }

        let suffixes = label.char_indices().rev().map(|(i, _)| &label[i..]);
        if let Some((suffix, weight)) = longest_supported(suffixes, support) {
            *tokens.entry(suffix.to_string()).or_insert(0) += weight;
        }
    }
    tokens
}

/// Orders tokens by descending weight. Ties keep lexicographic order.
pub fn rank_tokens(tokens: BTreeMap<String, usize>) -> Vec<String> {
    let mut ranked: Vec<(String, usize)> = tokens.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().map(|(token, _)| token).collect()
}

pub fn random_brute(seeds: &[String]) -> Result<Vec<String>> {
    let seeds = deduplicate_domains(seeds.iter().cloned());
    let mut registry = DomainRegistry::new();
    let mut targets: Vec<(&str, &str)> = Vec::new();

    for seed in &seeds {
        if let Err(e) = registry.register_domain(seed) {
            debug!("random brute: skipping {}: {}", seed, e);
            continue;
        }
        if let Ok((Some(sub), suffix)) = split_registrable(seed) {
            targets.push((sub, suffix));
        }
    }

    let tokens = rank_tokens(mine_tokens(&registry.label_frequency()));
    debug!("random brute: mined {} tokens from {} seeds", tokens.len(), targets.len());

    let mut generated = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        let pattern = word_regex(token)?;
        let matched: Vec<&(&str, &str)> = targets
            .iter()
            .filter(|(sub, _)| pattern.is_match(sub))
            .collect();
        if matched.len() < 2 {
            continue;
        }

        for (other_index, other) in tokens.iter().enumerate() {
            if other_index == index {
                continue;
            }
            for (sub, suffix) in &matched {
                generated.push(format!(
                    "{}.{}",
                    pattern.replace_all(sub, NoExpand(other)),
                    suffix
                ));
            }
        }
    }

    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> BTreeMap<String, usize> {
        names.iter().map(|name| (name.to_string(), 1)).collect()
    }

    fn seeds(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_mine_tokens_prefix_and_suffix() {
        let tokens = mine_tokens(&labels(&["dev-api", "dev-web", "prod-api"]));

        // shared prefix of dev-api and dev-web, found from both labels
        assert_eq!(tokens.get("dev-"), Some(&4));
        // shared suffix of dev-api and prod-api, found from both labels
        assert_eq!(tokens.get("-api"), Some(&4));
        assert_eq!(tokens.get("dev"), Some(&2));
        assert_eq!(tokens.get("api"), Some(&2));
        assert_eq!(tokens.get("dev-api"), Some(&1));
        assert_eq!(tokens.get("web"), Some(&1));
    }

    #[test]
    fn test_mine_tokens_single_label_is_only_itself() {
        let tokens = mine_tokens(&labels(&["www"]));
        assert_eq!(tokens.len(), 1);
        // whole label plus its only alphanumeric piece
        assert_eq!(tokens.get("www"), Some(&2));
    }

    #[test]
    fn test_rank_tokens_breaks_ties_lexicographically() {
        let tokens: BTreeMap<String, usize> = [("zeta", 3), ("alpha", 1), ("beta", 3), ("gamma", 2)]
            .iter()
            .map(|(t, w)| (t.to_string(), *w))
            .collect();
        assert_eq!(rank_tokens(tokens), vec!["beta", "zeta", "gamma", "alpha"]);
    }

    #[test]
    fn test_random_brute_recombines_tokens() {
        let generated = random_brute(&seeds(&[
            "dev-api.example.com",
            "dev-web.example.com",
            "prod-api.example.com",
        ]))
        .unwrap();

        assert!(generated.contains(&"prod-web.example.com".to_string()));
        for name in &generated {
            assert!(name.ends_with(".example.com"), "{}", name);
        }
    }

    #[test]
    fn test_random_brute_needs_two_matching_seeds() {
        assert!(random_brute(&seeds(&["www.example.com"])).unwrap().is_empty());
        assert!(random_brute(&seeds(&["www.example.com", "www.example.com"]))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_random_brute_skips_unusable_seeds() {
        let generated = random_brute(&seeds(&[
            "example.com",
            "com",
            "10.0.0.1",
            "api.dev.example.com",
            "api.prod.example.com",
        ]))
        .unwrap();

        assert!(!generated.is_empty());
        assert!(generated.iter().all(|name| name != "example.com"));
        assert!(generated.contains(&"dev.prod.example.com".to_string()));
        assert!(generated.contains(&"prod.dev.example.com".to_string()));
    }

    #[test]
    fn test_random_brute_is_deterministic() {
        let input = seeds(&[
            "us-east-1.api.example.com",
            "us-west-2.api.example.com",
            "eu-west-1.cdn.example.org",
            "cdn.example.org",
        ]);
        assert_eq!(random_brute(&input).unwrap(), random_brute(&input).unwrap());
    }
}
