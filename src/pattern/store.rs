//! Pattern persistence.
//!
//! Generated pattern lists are keyed by their exponent. [`PatternStore`]
//! abstracts where they live: [`MemoryStore`] keeps them in the process,
//! [`FileStore`] persists one JSON document per exponent so repeated runs
//! skip regeneration. Store failures are never surfaced; a list that cannot
//! be loaded is simply regenerated.
//!
//! Writes take `&mut self`; a store shared between sorting runs on separate
//! threads goes behind a mutex so fills for the same exponent serialize.

use std::{
    fs,
    path::{Path, PathBuf},
};

use ahash::AHashMap;

use super::{generate, Pattern};

/// Keyed storage for generated pattern lists.
///
/// `load` must return exactly what was `save`d for the same exponent, order
/// and contents preserved, or `None` when the key is unknown.
pub trait PatternStore {
    fn load(&self, k: u32) -> Option<Vec<Pattern>>;
    fn save(&mut self, k: u32, patterns: &[Pattern]);
}

/// Process-local pattern store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lists: AHashMap<u32, Vec<Pattern>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PatternStore for MemoryStore {
    fn load(&self, k: u32) -> Option<Vec<Pattern>> {
        self.lists.get(&k).cloned()
    }

    fn save(&mut self, k: u32, patterns: &[Pattern]) {
        self.lists.insert(k, patterns.to_vec());
    }
}

/// Flat-file pattern store: `<dir>/patterns_<k>.json`.
///
/// Unreadable or undecodable files count as cache misses, and write failures
/// are swallowed; the next call regenerates.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, k: u32) -> PathBuf {
        self.dir.join(format!("patterns_{k}.json"))
    }
}

impl PatternStore for FileStore {
    fn load(&self, k: u32) -> Option<Vec<Pattern>> {
        let data = fs::read_to_string(self.path(k)).ok()?;
        serde_json::from_str(&data).ok()
    }

    fn save(&mut self, k: u32, patterns: &[Pattern]) {
        if fs::create_dir_all(&self.dir).is_err() {
            return;
        }
        let Ok(json) = serde_json::to_string(patterns) else {
            return;
        };
        let _ = fs::write(self.path(k), json);
    }
}

/// Lazily filled front for pattern retrieval.
///
/// # Examples
///
/// ```
/// use mitosort::pattern::PatternLibrary;
///
/// let mut library = PatternLibrary::in_memory();
/// assert_eq!(library.patterns(1).len(), 3);
/// // Served from the store the second time.
/// assert_eq!(library.patterns(1), library.patterns(1));
/// ```
#[derive(Debug)]
pub struct PatternLibrary<S = MemoryStore> {
    store: S,
}

impl PatternLibrary<MemoryStore> {
    pub fn in_memory() -> Self {
        PatternLibrary {
            store: MemoryStore::new(),
        }
    }
}

impl Default for PatternLibrary<MemoryStore> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<S: PatternStore> PatternLibrary<S> {
    pub fn with_store(store: S) -> Self {
        PatternLibrary { store }
    }

    /// The ordered pattern list for exponent `k`, generated and persisted on
    /// a store miss.
    pub fn patterns(&mut self, k: u32) -> Vec<Pattern> {
        if let Some(cached) = self.store.load(k) {
            return cached;
        }
        let generated = generate(k);
        self.store.save(k, &generated);
        generated
    }
}
