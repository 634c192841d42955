//! The compact sparse Merkle tree engine

use crate::batch::{parse_batch, BatchEntry};
use crate::config::TreeConfig;
use crate::model::{common_prefix_len, Hash, Key, Path, PATH_LEN};
use crate::store::NodeStore;
use crate::tree::proof::{fold_path, verify_proof};
use crate::tree::{Entry, EntryResponse, Leaf, Node, NodeHash, Proof, Sha256Hasher, TreeHasher};
use crate::{Error, Result};
use std::marker::PhantomData;
use tracing::{debug, instrument, warn};

/// A compact sparse Merkle tree over arbitrary byte keys
///
/// Only one version of the tree exists at a time: `add` and `delete` prune
/// every node the new root no longer reaches. The root depends on the key
/// set alone, not on the order in which keys were added or removed.
#[derive(Debug, Clone)]
pub struct Csmt<H = Sha256Hasher> {
    root: NodeHash,
    store: NodeStore,
    leaves: usize,
    config: TreeConfig,
    _hasher: PhantomData<H>,
}

impl<H: TreeHasher> Default for Csmt<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: TreeHasher> Csmt<H> {
    /// Create an empty tree with the default config
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Csmt {
            root: NodeHash::Empty,
            store: NodeStore::new(),
            leaves: 0,
            config,
            _hasher: PhantomData,
        }
    }

    /// The current root commitment
    pub fn root(&self) -> NodeHash {
        self.root
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.leaves
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Number of stored nodes, leaves included
    pub fn node_count(&self) -> usize {
        self.store.len()
    }

    /// All stored nodes in no particular order
    pub fn nodes(&self) -> impl Iterator<Item = (&Hash, &Node)> {
        self.store.iter()
    }

    /// Validate a JSON batch, then add each entry in order
    pub fn insert_json(&mut self, batch: &serde_json::Value) -> Result<()> {
        let entries = parse_batch(batch)?;
        self.insert(entries)
    }

    /// Add each entry in order.
    ///
    /// Unless `atomic_batches` is set, entries applied before a failing one
    /// stay in the tree. With it set, they are deleted again and the root is
    /// back to what it was before the call.
    #[instrument(skip_all, fields(entries = tracing::field::Empty))]
    pub fn insert(&mut self, entries: impl IntoIterator<Item = BatchEntry>) -> Result<()> {
        let entries: Vec<BatchEntry> = entries.into_iter().collect();
        tracing::Span::current().record("entries", entries.len());

        for (applied, entry) in entries.iter().enumerate() {
            if let Err(err) = self.add(entry.id.as_slice(), &entry.value) {
                if self.config.atomic_batches {
                    warn!(applied, error = %err, "Rolling back partially applied batch");
                    for done in entries[..applied].iter().rev() {
                        self.delete(done.id.as_slice())?;
                    }
                }
                return Err(err);
            }
        }

        if self.config.debug_dump {
            self.dump();
        }
        Ok(())
    }

    /// Add a key with a value. Fails with `DuplicateKey` if the key is present.
    pub fn add(&mut self, key: impl Into<Key>, value: impl AsRef<[u8]>) -> Result<()> {
        let value = H::digest_value(value.as_ref());
        self.add_digest(key.into(), value)
    }

    /// Add a key whose value has already been digested
    pub fn add_digest(&mut self, key: Key, value: Hash) -> Result<()> {
        let path = Path::from_key(&key);
        let EntryResponse {
            entry,
            matching_entry,
            mut side_nodes,
        } = self.retrieve_entry(&key)?;

        if entry.has_value() {
            return Err(Error::DuplicateKey(key.to_hex()));
        }

        let anchor = match &matching_entry {
            Some(existing) => {
                if Path::from_key(&existing.key) == path {
                    return Err(Error::PathCollision {
                        key: key.to_hex(),
                        existing: existing.key.to_hex(),
                    });
                }
                NodeHash::Digest(H::hash_leaf(existing))
            }
            None => NodeHash::Empty,
        };

        self.prune(anchor, &path, &side_nodes);

        // Re-materialise the levels the two keys still share, then branch.
        if let Some(existing) = &matching_entry {
            let divergence = common_prefix_len(&path, &Path::from_key(&existing.key));
            side_nodes.resize(divergence, NodeHash::Empty);
            side_nodes.push(anchor);
        }

        let leaf = Leaf { key, value };
        let leaf_hash = H::hash_leaf(&leaf);
        debug!(key = %leaf.key, depth = side_nodes.len(), "Adding leaf");
        self.store.put(leaf_hash, Node::Leaf(leaf));
        self.root = self.rebuild(NodeHash::Digest(leaf_hash), &path, &side_nodes);
        self.leaves += 1;
        debug!(root = %self.root, nodes = self.store.len(), "Root updated");
        Ok(())
    }

    /// Value digest stored for `key`, if any
    pub fn get(&self, key: impl Into<Key>) -> Result<Option<Hash>> {
        Ok(self.retrieve_entry(&key.into())?.entry.value)
    }

    pub fn contains(&self, key: impl Into<Key>) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Remove a key. Fails with `NotFound` if the key is absent.
    pub fn delete(&mut self, key: impl Into<Key>) -> Result<()> {
        let key = key.into();
        let path = Path::from_key(&key);
        let EntryResponse {
            entry,
            mut side_nodes,
            ..
        } = self.retrieve_entry(&key)?;

        let leaf = entry.as_leaf().ok_or_else(|| Error::NotFound(key.to_hex()))?;
        let leaf_hash = H::hash_leaf(&leaf);

        let sibling_is_leaf = match side_nodes.last() {
            None => None,
            Some(NodeHash::Digest(sibling)) => Some(self.node(sibling)?.is_leaf()),
            Some(NodeHash::Empty) => {
                return Err(Error::Corruption(format!(
                    "Leaf {} has an empty sibling",
                    leaf_hash
                )))
            }
        };

        self.store.remove(&leaf_hash);
        self.leaves -= 1;
        debug!(key = %key, depth = side_nodes.len(), "Deleting leaf");

        self.root = match sibling_is_leaf {
            None => NodeHash::Empty,
            Some(false) => {
                self.prune(NodeHash::Digest(leaf_hash), &path, &side_nodes);
                self.rebuild(NodeHash::Empty, &path, &side_nodes)
            }
            Some(true) => {
                self.prune(NodeHash::Digest(leaf_hash), &path, &side_nodes);
                // The lone sibling leaf moves up to just below the deepest
                // remaining branch; the empty levels between are dropped.
                let promoted = side_nodes.pop().unwrap_or_default();
                let keep = side_nodes
                    .iter()
                    .rposition(|node| !node.is_empty())
                    .map_or(0, |i| i + 1);
                side_nodes.truncate(keep);
                self.rebuild(promoted, &path, &side_nodes)
            }
        };
        debug!(root = %self.root, nodes = self.store.len(), "Root updated");
        Ok(())
    }

    /// Build a membership or non-membership proof for `key`
    pub fn create_proof(&self, key: impl Into<Key>) -> Result<Proof> {
        let response = self.retrieve_entry(&key.into())?;
        Ok(Proof::new(response, self.root))
    }

    /// Check a proof against the root it carries. See [`verify_proof`].
    pub fn verify_proof(&self, proof: &Proof) -> bool {
        verify_proof::<H>(proof)
    }

    /// Walk from the root along `key`'s path until a leaf or an empty subtree
    pub fn retrieve_entry(&self, key: &Key) -> Result<EntryResponse> {
        let path = Path::from_key(key);
        let mut side_nodes = Vec::new();
        let mut current = self.root;

        while let NodeHash::Digest(hash) = current {
            match self.node(&hash)? {
                Node::Leaf(leaf) => {
                    let response = if &leaf.key == key {
                        EntryResponse {
                            entry: Entry::from(leaf.clone()),
                            matching_entry: None,
                            side_nodes,
                        }
                    } else {
                        EntryResponse {
                            entry: Entry::absent(key.clone()),
                            matching_entry: Some(leaf.clone()),
                            side_nodes,
                        }
                    };
                    return Ok(response);
                }
                Node::Internal(internal) => {
                    let depth = side_nodes.len();
                    if depth >= PATH_LEN {
                        return Err(Error::Corruption(format!(
                            "Path for key {} exceeds {} levels",
                            key, PATH_LEN
                        )));
                    }
                    let (child, sibling) = internal.descend(path.direction(depth));
                    side_nodes.push(sibling);
                    current = child;
                }
            }
        }

        Ok(EntryResponse {
            entry: Entry::absent(key.clone()),
            matching_entry: None,
            side_nodes,
        })
    }

    /// Log every stored node at debug level
    pub fn dump(&self) {
        for (hash, node) in self.store.iter() {
            match node {
                Node::Leaf(leaf) => {
                    debug!(hash = %hash, key = %leaf.key, value = %leaf.value, "leaf")
                }
                Node::Internal(internal) => {
                    debug!(hash = %hash, left = %internal.left, right = %internal.right, "internal")
                }
            }
        }
    }

    // === Internal helpers ===

    fn node(&self, hash: &Hash) -> Result<&Node> {
        self.store
            .get(hash)
            .ok_or_else(|| Error::Corruption(format!("Missing node {}", hash)))
    }

    /// Remove the ancestors `node` currently has along `path`
    fn prune(&mut self, node: NodeHash, path: &Path, side_nodes: &[NodeHash]) {
        let store = &mut self.store;
        fold_path::<H>(node, path, side_nodes, |hash, _| {
            store.remove(&hash);
        });
    }

    /// Store fresh ancestors for `node` along `path`, returning the new root
    fn rebuild(&mut self, node: NodeHash, path: &Path, side_nodes: &[NodeHash]) -> NodeHash {
        let store = &mut self.store;
        fold_path::<H>(node, path, side_nodes, |hash, internal| {
            store.put(hash, Node::Internal(internal));
        })
    }
}
