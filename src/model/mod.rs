//! Core value types: digests, keys and routing paths

mod hash;
mod key;
mod path;

pub use hash::{Hash, HASH_LEN};
pub use key::Key;
pub use path::{common_prefix_len, Direction, Path, PATH_LEN};
