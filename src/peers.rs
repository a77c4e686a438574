//! Deduplicated registry of known peer hosts

use std::collections::BTreeSet;

use url::Url;

use crate::error::{ChainError, Result};

/// The set of network hosts this node gossips with.
///
/// Each registered address is parsed as a URL and reduced to its
/// `host[:port]` component; duplicates collapse by construction. Backed by an
/// ordered set so enumeration, and therefore the consensus tie-break, is
/// deterministic.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    hosts: BTreeSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `address` and record its host.
    ///
    /// A malformed address is a recoverable, per-address error: it leaves the
    /// registry unchanged and never affects previously registered hosts.
    pub fn register(&mut self, address: &str) -> Result<()> {
        let parsed = Url::parse(address).map_err(|e| ChainError::InvalidPeerAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })?;

        let host = parsed
            .host_str()
            .ok_or_else(|| ChainError::InvalidPeerAddress {
                address: address.to_string(),
                reason: "no host component".to_string(),
            })?;

        let entry = match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        self.hosts.insert(entry);
        Ok(())
    }

    /// The deduplicated hosts, in sorted order.
    pub fn unique(&self) -> Vec<String> {
        self.hosts.iter().cloned().collect()
    }

    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let mut registry = PeerRegistry::new();
        for address in ["http://a:1", "http://a:1", "http://b:2"] {
            registry.register(address).unwrap();
        }

        assert_eq!(registry.unique(), vec!["a:1".to_string(), "b:2".to_string()]);
    }

    #[test]
    fn test_path_and_scheme_are_stripped() {
        let mut registry = PeerRegistry::new();
        registry.register("http://node.example:8888/chain").unwrap();

        assert_eq!(registry.unique(), vec!["node.example:8888".to_string()]);
    }

    #[test]
    fn test_host_without_port() {
        let mut registry = PeerRegistry::new();
        registry.register("http://node.example").unwrap();

        assert_eq!(registry.unique(), vec!["node.example".to_string()]);
    }

    #[test]
    fn test_malformed_address_is_recoverable() {
        let mut registry = PeerRegistry::new();
        registry.register("http://a:1").unwrap();

        assert!(registry.register("not a url").is_err());
        assert!(registry.register("http://").is_err());

        // The bad addresses changed nothing.
        assert_eq!(registry.unique(), vec!["a:1".to_string()]);
    }

    #[test]
    fn test_enumeration_is_sorted() {
        let mut registry = PeerRegistry::new();
        for address in ["http://c:3", "http://a:1", "http://b:2"] {
            registry.register(address).unwrap();
        }

        assert_eq!(
            registry.unique(),
            vec!["a:1".to_string(), "b:2".to_string(), "c:3".to_string()]
        );
    }
}
