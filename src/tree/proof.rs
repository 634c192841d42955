//! Lookup results and membership / non-membership proofs

use crate::model::{common_prefix_len, Hash, Key, Path, PATH_LEN};
use crate::tree::{Internal, Leaf, NodeHash, TreeHasher};
use serde::{Deserialize, Serialize};

/// The queried key, with its value digest when the key is present
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: Key,
    pub value: Option<Hash>,
}

impl Entry {
    /// An entry for a key with no value
    pub fn absent(key: Key) -> Self {
        Entry { key, value: None }
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// The leaf this entry would occupy, if it carries a value
    pub fn as_leaf(&self) -> Option<Leaf> {
        self.value.map(|value| Leaf {
            key: self.key.clone(),
            value,
        })
    }
}

impl From<Leaf> for Entry {
    fn from(leaf: Leaf) -> Self {
        Entry {
            key: leaf.key,
            value: Some(leaf.value),
        }
    }
}

/// Result of walking the tree along a key's path
///
/// `side_nodes` holds the sibling of every internal node visited, root
/// first. `matching_entry` is set when the walk ended on a leaf belonging to
/// a different key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryResponse {
    pub entry: Entry,
    pub matching_entry: Option<Leaf>,
    pub side_nodes: Vec<NodeHash>,
}

/// A membership (`membership == true`) or non-membership proof for a key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub entry: Entry,
    pub matching_entry: Option<Leaf>,
    pub side_nodes: Vec<NodeHash>,
    pub root: NodeHash,
    pub membership: bool,
}

impl Proof {
    pub fn new(response: EntryResponse, root: NodeHash) -> Self {
        let membership = response.entry.has_value();
        Proof {
            entry: response.entry,
            matching_entry: response.matching_entry,
            side_nodes: response.side_nodes,
            root,
            membership,
        }
    }
}

/// Fold `node` up through `side_nodes` (deepest first) along `path`,
/// reporting every internal node produced on the way.
///
/// Callers guarantee `side_nodes.len() <= PATH_LEN`.
pub(crate) fn fold_path<H: TreeHasher>(
    node: NodeHash,
    path: &Path,
    side_nodes: &[NodeHash],
    mut visit: impl FnMut(Hash, Internal),
) -> NodeHash {
    side_nodes
        .iter()
        .enumerate()
        .rev()
        .fold(node, |current, (depth, sibling)| {
            let internal = Internal::from_sibling(current, *sibling, path.direction(depth));
            let hash = H::hash_internal(&internal);
            visit(hash, internal);
            NodeHash::Digest(hash)
        })
}

/// Root implied by placing `node` at the end of `side_nodes` along `path`
pub fn calculate_root<H: TreeHasher>(node: NodeHash, path: &Path, side_nodes: &[NodeHash]) -> NodeHash {
    fold_path::<H>(node, path, side_nodes, |_, _| {})
}

/// Check a proof against the root it carries.
///
/// Never fails: a malformed or tampered proof is simply `false`.
pub fn verify_proof<H: TreeHasher>(proof: &Proof) -> bool {
    if proof.side_nodes.len() > PATH_LEN || proof.membership != proof.entry.has_value() {
        return false;
    }

    match &proof.matching_entry {
        None => {
            let node = proof
                .entry
                .as_leaf()
                .map_or(NodeHash::Empty, |leaf| NodeHash::Digest(H::hash_leaf(&leaf)));
            let path = Path::from_key(&proof.entry.key);
            calculate_root::<H>(node, &path, &proof.side_nodes) == proof.root
        }
        Some(matching) => {
            // A witness leaf only ever backs a non-membership claim for a different key
            if proof.entry.has_value() || matching.key == proof.entry.key {
                return false;
            }
            let matching_path = Path::from_key(&matching.key);
            let node = NodeHash::Digest(H::hash_leaf(matching));
            if calculate_root::<H>(node, &matching_path, &proof.side_nodes) != proof.root {
                return false;
            }
            let path = Path::from_key(&proof.entry.key);
            proof.side_nodes.len() <= common_prefix_len(&path, &matching_path)
        }
    }
}
