//! # csmt
//!
//! A compact sparse Merkle tree: an authenticated key/value map that commits
//! its whole key set to a single 32-byte root and proves both membership and
//! non-membership of any key.
//!
//! ## Core Concepts
//!
//! - **Paths**: every key routes along 256 binary directions taken from its bits
//! - **Compaction**: internal nodes exist only down to where keys diverge
//! - **Proofs**: one [`Proof`] shape covers inclusion and exclusion
//! - **History independence**: the root depends on the key set, not on insertion order
//!
//! ## Example
//!
//! ```
//! use csmt::Csmt;
//!
//! let mut tree: Csmt = Csmt::new();
//! tree.add([25u8, 35, 239], "abc")?;
//!
//! let proof = tree.create_proof([26u8, 18, 220])?;
//! assert!(!proof.membership);
//! assert!(tree.verify_proof(&proof));
//! # Ok::<(), csmt::Error>(())
//! ```
//!
//! A tree is single-threaded and single-version: callers that share one
//! across threads must serialise mutation against reads themselves.

pub mod batch;
pub mod config;
pub mod model;
pub mod store;
pub mod tree;

mod error;

pub use batch::{parse_batch, BatchEntry};
pub use config::{HasherKind, TreeConfig};
pub use error::{Error, Result};
pub use model::{Hash, Key, Path, PATH_LEN};
pub use store::NodeStore;
pub use tree::{
    verify_proof, Blake3Hasher, Csmt, Entry, EntryResponse, Leaf, Node, NodeHash, Proof,
    Sha256Hasher, TreeHasher,
};
