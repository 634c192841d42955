//! Compact sparse Merkle tree
//!
//! A binary Merkle tree over 256-bit key paths where:
//! - Empty subtrees are the `Empty` sentinel and never stored
//! - A leaf sits directly below the deepest branch it shares with another key
//! - The root hash commits to the whole key set and nothing else

mod csmt;
mod hasher;
mod node;
mod proof;

pub use csmt::Csmt;
pub use hasher::{Blake3Hasher, Sha256Hasher, TreeHasher};
pub use node::{Internal, Leaf, Node, NodeHash};
pub use proof::{calculate_root, verify_proof, Entry, EntryResponse, Proof};
