//! Key → routing path encoding
//!
//! A path is the key read as a big-endian unsigned integer, zero-padded to
//! 256 bits. Direction `i` is bit `i` of that integer, so the root consults
//! the least-significant bit and depth 255 the most-significant one.

use crate::model::Key;
use std::ops::Not;

/// Number of directions in every path
pub const PATH_LEN: usize = 256;

const PATH_BYTES: usize = PATH_LEN / 8;

/// Which child to descend into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Not for Direction {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// The fixed-length routing path of a key
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Path([u8; PATH_BYTES]);

impl Path {
    /// Encode a key. Keys wider than 256 bits route on their trailing 32 bytes.
    pub fn from_key(key: &Key) -> Self {
        let bytes = key.as_bytes();
        let take = bytes.len().min(PATH_BYTES);
        let mut padded = [0u8; PATH_BYTES];
        padded[PATH_BYTES - take..].copy_from_slice(&bytes[bytes.len() - take..]);
        Path(padded)
    }

    /// Direction bit at `depth` (0 or 1). Does NOT perform range checking.
    #[inline]
    pub fn bit(&self, depth: usize) -> u8 {
        (self.0[PATH_BYTES - 1 - depth / 8] >> (depth % 8)) & 1
    }

    #[inline]
    pub fn direction(&self, depth: usize) -> Direction {
        match self.bit(depth) {
            0 => Direction::Left,
            _ => Direction::Right,
        }
    }

    /// All directions as bits, index 0 first
    pub fn bits(&self) -> impl Iterator<Item = u8> + '_ {
        (0..PATH_LEN).map(move |i| self.bit(i))
    }
}

impl std::fmt::Debug for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Path({})", hex::encode(self.0))
    }
}

/// Number of leading directions two paths share, in `0..=PATH_LEN`
pub fn common_prefix_len(a: &Path, b: &Path) -> usize {
    (0..PATH_LEN).take_while(|&i| a.bit(i) == b.bit(i)).count()
}
