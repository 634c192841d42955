//! Content-addressed node storage
//!
//! Nodes are stored by the digest of their encoding. Only live nodes are
//! kept: mutations prune what they supersede.

mod node_store;

pub use node_store::NodeStore;
