//! Content hashing for sprite groups (blake3).
//!
//! A group's hash depends only on the bytes of its images, never on the
//! order the files were listed in.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::asset::name::HASH_FRAGMENT_LEN;
use crate::error::{Result, SpriteError};

/// A 256-bit content hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash raw bytes.
    pub fn of_bytes(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Combine per-file hashes into a group hash.
    ///
    /// The hex digests are sorted before joining, so input order is irrelevant.
    pub fn of_group<I>(hashes: I) -> Self
    where
        I: IntoIterator<Item = ContentHash>,
    {
        let mut digests: Vec<String> = hashes.into_iter().map(|h| h.to_hex()).collect();
        digests.sort();
        Self::of_bytes(digests.join("&").as_bytes())
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Leading hex characters used in sheet file names.
    pub fn fragment(self) -> String {
        self.to_hex()[..HASH_FRAGMENT_LEN].to_string()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fragment())
    }
}

/// Hash the contents of a file.
pub fn hash_file(path: &Path) -> Result<ContentHash> {
    let bytes = fs::read(path).map_err(|e| SpriteError::io(path, "Failed to read image", e))?;
    Ok(ContentHash::of_bytes(&bytes))
}
