//! Tree node types

use crate::model::{Direction, Hash, Key};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a subtree: either nothing, or the digest of a stored node
///
/// `Empty` is the zero sentinel. It is never stored and cannot be produced
/// by any hash function, whatever its width.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<Hash>", into = "Option<Hash>")]
pub enum NodeHash {
    #[default]
    Empty,
    Digest(Hash),
}

impl NodeHash {
    pub fn is_empty(&self) -> bool {
        matches!(self, NodeHash::Empty)
    }

    pub fn digest(&self) -> Option<&Hash> {
        match self {
            NodeHash::Empty => None,
            NodeHash::Digest(hash) => Some(hash),
        }
    }
}

impl From<Hash> for NodeHash {
    fn from(hash: Hash) -> Self {
        NodeHash::Digest(hash)
    }
}

impl From<Option<Hash>> for NodeHash {
    fn from(hash: Option<Hash>) -> Self {
        hash.map_or(NodeHash::Empty, NodeHash::Digest)
    }
}

impl From<NodeHash> for Option<Hash> {
    fn from(node: NodeHash) -> Self {
        node.digest().copied()
    }
}

impl fmt::Display for NodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeHash::Empty => write!(f, "empty"),
            NodeHash::Digest(hash) => write!(f, "{}", hash),
        }
    }
}

impl fmt::Debug for NodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeHash::Empty => write!(f, "Empty"),
            NodeHash::Digest(hash) => write!(f, "{:?}", hash),
        }
    }
}

/// A stored key with the digest of its value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub key: Key,
    pub value: Hash,
}

/// A branching point with exactly two child references
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Internal {
    pub left: NodeHash,
    pub right: NodeHash,
}

impl Internal {
    /// Place `node` on the side given by `direction` and `sibling` opposite it
    pub fn from_sibling(node: NodeHash, sibling: NodeHash, direction: Direction) -> Self {
        match direction {
            Direction::Left => Internal {
                left: node,
                right: sibling,
            },
            Direction::Right => Internal {
                left: sibling,
                right: node,
            },
        }
    }

    /// Split into `(child on direction, sibling)`
    pub fn descend(&self, direction: Direction) -> (NodeHash, NodeHash) {
        match direction {
            Direction::Left => (self.left, self.right),
            Direction::Right => (self.right, self.left),
        }
    }
}

/// Content held by the node store, tagged by kind
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Leaf(Leaf),
    Internal(Internal),
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sibling_orders_children() {
        let a = NodeHash::Digest(Hash::from_bytes([1; 32]));
        let b = NodeHash::Empty;
        let left = Internal::from_sibling(a, b, Direction::Left);
        assert_eq!((left.left, left.right), (a, b));
        let right = Internal::from_sibling(a, b, Direction::Right);
        assert_eq!((right.left, right.right), (b, a));
    }

    #[test]
    fn test_descend_returns_child_and_sibling() {
        let a = NodeHash::Digest(Hash::from_bytes([1; 32]));
        let b = NodeHash::Digest(Hash::from_bytes([2; 32]));
        let node = Internal { left: a, right: b };
        assert_eq!(node.descend(Direction::Left), (a, b));
        assert_eq!(node.descend(Direction::Right), (b, a));
    }

    #[test]
    fn test_empty_serializes_as_null() {
        assert_eq!(serde_json::to_string(&NodeHash::Empty).unwrap(), "null");
        let back: NodeHash = serde_json::from_str("null").unwrap();
        assert!(back.is_empty());
    }
}
