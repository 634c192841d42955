//! In-memory content-addressed node store
//!
//! The store maps a node's digest to its content. It is owned exclusively by
//! one [`Csmt`](crate::Csmt); all mutation goes through the tree so the
//! stored set always equals the nodes reachable from the current root.

use crate::model::Hash;
use crate::tree::Node;
use std::collections::HashMap;

/// Hash → node mapping for a single tree version
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: HashMap<Hash, Node>,
}

impl NodeStore {
    /// Create an empty store
    pub fn new() -> Self {
        NodeStore {
            nodes: HashMap::new(),
        }
    }

    /// Store a node under its digest, replacing any identical content
    pub fn put(&mut self, hash: Hash, node: Node) {
        self.nodes.insert(hash, node);
    }

    /// Look up a node
    pub fn get(&self, hash: &Hash) -> Option<&Node> {
        self.nodes.get(hash)
    }

    /// Remove a node, returning it if it was present
    pub fn remove(&mut self, hash: &Hash) -> Option<Node> {
        self.nodes.remove(hash)
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.nodes.contains_key(hash)
    }

    /// Number of stored nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all stored nodes in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&Hash, &Node)> {
        self.nodes.iter()
    }
}
