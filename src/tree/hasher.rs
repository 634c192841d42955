//! Domain-separated hashing of values, leaves and internal nodes
//!
//! Pre-image layouts:
//!
//! ```text
//! value    = H(value)
//! leaf     = H(0x00 | u64be(len key) | key | u64be(32) | value digest)
//! internal = H(0x01 | child(left) | child(right))
//! child    = 0x00              for an empty subtree
//!          | 0x01 | digest     otherwise
//! ```
//!
//! The tag byte keeps leaf and internal pre-images disjoint, and the length
//! prefixes make each pre-image parse in exactly one way.

use crate::model::{Hash, HASH_LEN};
use crate::tree::{Internal, Leaf, NodeHash};
use sha2::{Digest, Sha256};

const LEAF_TAG: u8 = 0x00;
const INTERNAL_TAG: u8 = 0x01;
const EMPTY_CHILD: u8 = 0x00;
const DIGEST_CHILD: u8 = 0x01;

/// A fixed-output hash function for the tree
///
/// Implementors provide [`TreeHasher::digest_many`]; the node encodings are
/// shared so every hasher gets the same domain separation.
pub trait TreeHasher {
    /// Hash the concatenation of `parts`
    fn digest_many(parts: &[&[u8]]) -> Hash;

    /// Digest of a caller-supplied value
    fn digest_value(value: &[u8]) -> Hash {
        Self::digest_many(&[value])
    }

    fn hash_leaf(leaf: &Leaf) -> Hash {
        let key = leaf.key.as_bytes();
        Self::digest_many(&[
            &[LEAF_TAG],
            &(key.len() as u64).to_be_bytes(),
            key,
            &(HASH_LEN as u64).to_be_bytes(),
            leaf.value.as_bytes(),
        ])
    }

    fn hash_internal(node: &Internal) -> Hash {
        let left = encode_child(&node.left);
        let right = encode_child(&node.right);
        Self::digest_many(&[&[INTERNAL_TAG], &left, &right])
    }
}

fn encode_child(child: &NodeHash) -> Vec<u8> {
    match child {
        NodeHash::Empty => vec![EMPTY_CHILD],
        NodeHash::Digest(hash) => {
            let mut out = Vec::with_capacity(1 + HASH_LEN);
            out.push(DIGEST_CHILD);
            out.extend_from_slice(hash.as_bytes());
            out
        }
    }
}

/// SHA-256, the default hasher
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl TreeHasher for Sha256Hasher {
    fn digest_many(parts: &[&[u8]]) -> Hash {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        Hash::from_bytes(hasher.finalize().into())
    }
}

/// BLAKE3 with 32-byte output
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl TreeHasher for Blake3Hasher {
    fn digest_many(parts: &[&[u8]]) -> Hash {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        Hash::from_bytes(*hasher.finalize().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Key;

    #[test]
    fn test_sha256_value_digest() {
        assert_eq!(
            Sha256Hasher::digest_value(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_blake3_value_digest() {
        assert_eq!(
            Blake3Hasher::digest_value(b"abc").as_bytes(),
            blake3::hash(b"abc").as_bytes()
        );
    }

    #[test]
    fn test_leaf_preimage_layout() {
        let value = Sha256Hasher::digest_value(b"abc");
        let leaf = Leaf {
            key: Key::from([25u8, 35, 239]),
            value,
        };

        let mut preimage = vec![0x00];
        preimage.extend_from_slice(&3u64.to_be_bytes());
        preimage.extend_from_slice(&[25, 35, 239]);
        preimage.extend_from_slice(&32u64.to_be_bytes());
        preimage.extend_from_slice(value.as_bytes());

        let expected: [u8; 32] = Sha256::digest(&preimage).into();
        assert_eq!(Sha256Hasher::hash_leaf(&leaf).as_bytes(), &expected);
    }

    #[test]
    fn test_internal_preimage_layout() {
        let l = Hash::from_bytes([3; 32]);
        let r = Hash::from_bytes([4; 32]);

        let mut both = vec![0x01, 0x01];
        both.extend_from_slice(l.as_bytes());
        both.push(0x01);
        both.extend_from_slice(r.as_bytes());
        let expected: [u8; 32] = Sha256::digest(&both).into();
        let node = Internal {
            left: l.into(),
            right: r.into(),
        };
        assert_eq!(Sha256Hasher::hash_internal(&node).as_bytes(), &expected);

        // empty left child encodes as a single 0x00 byte
        let mut half = vec![0x01, 0x00, 0x01];
        half.extend_from_slice(r.as_bytes());
        let expected: [u8; 32] = Sha256::digest(&half).into();
        let node = Internal {
            left: NodeHash::Empty,
            right: r.into(),
        };
        assert_eq!(Sha256Hasher::hash_internal(&node).as_bytes(), &expected);
    }

    #[test]
    fn test_leaf_hash_depends_on_key_and_value() {
        let value = Sha256Hasher::digest_value(b"v");
        let a = Leaf { key: Key::from([1u8]), value };
        let b = Leaf { key: Key::from([2u8]), value };
        let c = Leaf {
            key: Key::from([1u8]),
            value: Sha256Hasher::digest_value(b"w"),
        };
        assert_ne!(Sha256Hasher::hash_leaf(&a), Sha256Hasher::hash_leaf(&b));
        assert_ne!(Sha256Hasher::hash_leaf(&a), Sha256Hasher::hash_leaf(&c));
    }

    #[test]
    fn test_leaf_and_internal_preimages_are_disjoint() {
        // A 65-byte key whose bytes spell out an internal pre-image body must
        // still hash differently from that internal node.
        let l = Hash::from_bytes([3; 32]);
        let r = Hash::from_bytes([4; 32]);
        let internal = Internal {
            left: l.into(),
            right: r.into(),
        };
        let mut crafted = vec![DIGEST_CHILD];
        crafted.extend_from_slice(l.as_bytes());
        crafted.push(DIGEST_CHILD);
        crafted.extend_from_slice(r.as_bytes());
        let leaf = Leaf {
            key: Key::new(crafted),
            value: Hash::from_bytes([0; 32]),
        };
        assert_ne!(
            Sha256Hasher::hash_leaf(&leaf),
            Sha256Hasher::hash_internal(&internal)
        );
    }

    #[test]
    fn test_empty_child_is_distinct_from_any_digest() {
        let d = Hash::from_bytes([0; 32]);
        let with_empty = Internal {
            left: NodeHash::Empty,
            right: d.into(),
        };
        let with_zero = Internal {
            left: d.into(),
            right: d.into(),
        };
        assert_ne!(
            Sha256Hasher::hash_internal(&with_empty),
            Sha256Hasher::hash_internal(&with_zero)
        );
    }
}
