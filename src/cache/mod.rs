//! In-memory sprite cache shared across compiles.
//!
//! Two maps behind one lock:
//! - (content hash, group name) → packed artifact
//! - group name → the content hash last stored for it
//!
//! Storing a new hash for a group evicts the artifact of its previous hash,
//! so each group holds at most one live artifact. Groups never share an
//! artifact, even when their bytes are identical. Nothing is persisted.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;

use crate::asset::{Coordinates, SheetProperties};
use crate::hash::ContentHash;

/// The packed output of one group, as cached.
#[derive(Debug, Clone)]
pub struct SpriteArtifact {
    pub hash: ContentHash,
    /// Content hash of every source, keyed by absolute path.
    pub sources: HashMap<PathBuf, ContentHash>,
    /// Encoded sheet bytes.
    pub image: Vec<u8>,
    /// Placement of every image, keyed by absolute source path.
    pub coordinates: HashMap<PathBuf, Coordinates>,
    pub properties: SheetProperties,
}

impl SpriteArtifact {
    /// Whether the artifact was packed from exactly these files with these contents.
    pub fn matches(&self, sources: &HashMap<PathBuf, ContentHash>) -> bool {
        self.sources == *sources
    }
}

type SlotKey = (ContentHash, String);

#[derive(Debug, Default)]
struct CacheState {
    by_hash: HashMap<SlotKey, Arc<SpriteArtifact>>,
    last_hash: HashMap<String, ContentHash>,
}

/// Thread-safe sprite cache.
#[derive(Debug, Default)]
pub struct SpriteCache {
    state: Mutex<CacheState>,
}

/// Process-wide cache instance.
static GLOBAL_CACHE: LazyLock<Arc<SpriteCache>> = LazyLock::new(|| Arc::new(SpriteCache::new()));

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by every pipeline that was not given its own.
    pub fn global() -> Arc<SpriteCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    /// Look up the artifact stored for group `name` under `hash`.
    pub fn get(&self, name: &str, hash: &ContentHash) -> Option<Arc<SpriteArtifact>> {
        self.state
            .lock()
            .by_hash
            .get(&(*hash, name.to_string()))
            .cloned()
    }

    /// Store `artifact` as the current one for group `name`.
    ///
    /// Returns the hash that was evicted, if the group previously pointed at
    /// a different one.
    pub fn put(&self, name: &str, artifact: Arc<SpriteArtifact>) -> Option<ContentHash> {
        let mut state = self.state.lock();
        let hash = artifact.hash;

        let previous = state.last_hash.insert(name.to_string(), hash);
        state.by_hash.insert((hash, name.to_string()), artifact);

        let old = previous.filter(|old| *old != hash)?;
        state.by_hash.remove(&(old, name.to_string()));
        Some(old)
    }

    /// The hash last stored for group `name`.
    pub fn current_hash(&self, name: &str) -> Option<ContentHash> {
        self.state.lock().last_hash.get(name).copied()
    }

    /// Number of live artifacts.
    pub fn len(&self) -> usize {
        self.state.lock().by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.by_hash.clear();
        state.last_hash.clear();
    }
}
