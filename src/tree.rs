// src/tree.rs
//! Hierarchical model of registered domains.
//!
//! Every registrable domain (public suffix plus one label) owns one tree.
//! Nodes live in an arena owned by [`DomainRegistry`]; a registry is scoped
//! to one caller, so independent runs never share state.

use crate::error::Result;
use crate::types::RadonError;
use std::collections::BTreeMap;
use std::net::IpAddr;

pub type NodeId = usize;

#[derive(Debug)]
struct DomainNode {
    value: String,
    parent: Option<NodeId>,
    children: BTreeMap<String, NodeId>,
    root: NodeId,
}

#[derive(Debug, Default)]
pub struct DomainRegistry {
    nodes: Vec<DomainNode>,
    roots: BTreeMap<String, NodeId>,
}

/// Returns the registrable domain of `name` according to the public suffix list.
pub fn registrable_domain(name: &str) -> Result<&str> {
    if name.is_empty() || name.parse::<IpAddr>().is_ok() {
        return Err(RadonError::InvalidDomain(name.to_string()));
    }
    psl::domain_str(name).ok_or_else(|| RadonError::InvalidDomain(name.to_string()))
}

/// Splits `name` into its subdomain portion and its registrable domain.
/// The subdomain portion is `None` when `name` is itself registrable.
pub fn split_registrable(name: &str) -> Result<(Option<&str>, &str)> {
    let suffix = registrable_domain(name)?;
    if suffix == name {
        return Ok((None, suffix));
    }
    let sub = name
        .strip_suffix(suffix)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|rest| !rest.is_empty())
        .ok_or_else(|| RadonError::InvalidDomain(name.to_string()))?;
    Ok((Some(sub), suffix))
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `fqdn` into the tree of its registrable domain, creating the
    /// root and any intermediate labels on first sight. Returns the leaf.
    pub fn register_domain(&mut self, fqdn: &str) -> Result<NodeId> {
        let (sub, suffix) = split_registrable(fqdn)?;
        let root = self.root_for(suffix);

        let Some(sub) = sub else {
            return Ok(root);
        };

        let mut current = root;
        for label in sub.rsplit('.') {
            if label.is_empty() {
                return Err(RadonError::InvalidDomain(fqdn.to_string()));
            }
            current = self.child_for(current, label);
        }
        Ok(current)
    }

    fn root_for(&mut self, suffix: &str) -> NodeId {
        if let Some(&id) = self.roots.get(suffix) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(DomainNode {
            value: suffix.to_string(),
            parent: None,
            children: BTreeMap::new(),
            root: id,
        });
        self.roots.insert(suffix.to_string(), id);
        id
    }

    fn child_for(&mut self, parent: NodeId, label: &str) -> NodeId {
        if let Some(&id) = self.nodes[parent].children.get(label) {
            return id;
        }
        let id = self.nodes.len();
        let root = self.nodes[parent].root;
        self.nodes.push(DomainNode {
            value: label.to_string(),
            parent: Some(parent),
            children: BTreeMap::new(),
            root,
        });
        self.nodes[parent].children.insert(label.to_string(), id);
        id
    }

    pub fn value(&self, id: NodeId) -> &str {
        &self.nodes[id].value
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id].children.values().copied()
    }

    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots.values().copied()
    }

    /// Rebuilds the full name by walking up to the root.
    pub fn fqdn(&self, id: NodeId) -> String {
        let mut labels = vec![self.value(id)];
        let mut current = self.parent(id);
        while let Some(parent) = current {
            labels.push(self.value(parent));
            current = self.parent(parent);
        }
        labels.join(".")
    }

    /// Counts every label carried by a descendant of `id`, summed over the
    /// whole subtree. The node's own label is not counted.
    pub fn sub_label_frequency(&self, id: NodeId) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        let mut stack: Vec<NodeId> = self.children(id).collect();
        while let Some(node) = stack.pop() {
            *counts.entry(self.value(node).to_string()).or_insert(0) += 1;
            stack.extend(self.children(node));
        }
        counts
    }

    /// Label frequencies merged across every registered tree.
    pub fn label_frequency(&self) -> BTreeMap<String, usize> {
        let mut merged = BTreeMap::new();
        for root in self.roots() {
            for (label, count) in self.sub_label_frequency(root) {
                *merged.entry(label).or_insert(0) += count;
            }
        }
        merged
    }
}

#[cfg(test)]
impl DomainRegistry {
    /// Root node of the tree `id` belongs to.
    fn registrable(&self, id: NodeId) -> NodeId {
        self.nodes[id].root
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rebuilds_fqdn() {
        let mut registry = DomainRegistry::new();
        let leaf = registry.register_domain("a.b.example.com").unwrap();

        assert_eq!(registry.fqdn(leaf), "a.b.example.com");
        assert_eq!(registry.value(leaf), "a");
        let parent = registry.parent(leaf).unwrap();
        assert_eq!(registry.value(parent), "b");
        assert_eq!(registry.value(registry.registrable(leaf)), "example.com");
    }

    #[test]
    fn test_register_shares_roots_and_paths() {
        let mut registry = DomainRegistry::new();
        let www = registry.register_domain("www.example.com").unwrap();
        let api = registry.register_domain("api.example.com").unwrap();
        let again = registry.register_domain("www.example.com").unwrap();
        registry.register_domain("www.example.org").unwrap();

        assert_eq!(www, again);
        assert_eq!(registry.registrable(www), registry.registrable(api));
        assert_eq!(registry.roots().count(), 2);
        // two roots plus three leaves
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_register_registrable_returns_root() {
        let mut registry = DomainRegistry::new();
        let root = registry.register_domain("example.co.uk").unwrap();

        assert_eq!(registry.parent(root), None);
        assert_eq!(registry.fqdn(root), "example.co.uk");
        assert_eq!(registry.registrable(root), root);
    }

    #[test]
    fn test_register_rejects_unclassifiable() {
        let mut registry = DomainRegistry::new();
        assert!(registry.register_domain("").is_err());
        assert!(registry.register_domain("com").is_err());
        assert!(registry.register_domain("10.0.0.1").is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sub_label_frequency() {
        let mut registry = DomainRegistry::new();
        for name in [
            "dev.api.example.com",
            "prod.api.example.com",
            "dev.web.example.com",
            "api.example.com",
        ] {
            registry.register_domain(name).unwrap();
        }
        let root = registry.roots().next().unwrap();
        let counts = registry.sub_label_frequency(root);

        assert_eq!(counts.get("dev"), Some(&2));
        assert_eq!(counts.get("prod"), Some(&1));
        assert_eq!(counts.get("api"), Some(&1));
        assert_eq!(counts.get("web"), Some(&1));
        assert_eq!(counts.get("example.com"), None);
    }

    #[test]
    fn test_label_frequency_merges_trees() {
        let mut registry = DomainRegistry::new();
        registry.register_domain("dev.example.com").unwrap();
        registry.register_domain("dev.example.net").unwrap();

        assert_eq!(registry.label_frequency().get("dev"), Some(&2));
    }

    #[test]
    fn test_split_registrable() {
        assert_eq!(
            split_registrable("a.b.example.com").unwrap(),
            (Some("a.b"), "example.com")
        );
        assert_eq!(split_registrable("example.com").unwrap(), (None, "example.com"));
    }
}
