use crate::core::Result;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::Mutex;
use tracing::{Level, event};

/// What the cache knows about a key it has looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry<V> {
    Present(V),
    /// Looked up and not in the store.
    Absent,
}

impl<V> CacheEntry<V> {
    pub fn as_option(&self) -> Option<&V> {
        match self {
            CacheEntry::Present(value) => Some(value),
            CacheEntry::Absent => None,
        }
    }

    pub fn into_option(self) -> Option<V> {
        match self {
            CacheEntry::Present(value) => Some(value),
            CacheEntry::Absent => None,
        }
    }
}

impl<V> From<Option<V>> for CacheEntry<V> {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(value) => CacheEntry::Present(value),
            None => CacheEntry::Absent,
        }
    }
}

#[derive(Debug)]
struct KindState<K, V> {
    /// False until the key set of the kind has been enumerated from the store.
    loaded: bool,
    /// Bumped by every invalidation.
    generation: u64,
    /// `None` marks a key that must be re-read.
    entries: HashMap<K, Option<CacheEntry<V>>>,
}

/// Work a context build has to do for one kind, captured under the cache lock.
#[derive(Debug)]
pub struct RefillPlan<K, V> {
    generation: u64,
    full: bool,
    hits: Vec<(K, V)>,
    misses: Vec<K>,
}

impl<K, V> RefillPlan<K, V> {
    /// True when the whole kind must be enumerated from the store.
    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn hits(&self) -> &[(K, V)] {
        &self.hits
    }

    /// Keys that must be re-read. Empty for a full refill.
    pub fn misses(&self) -> &[K] {
        &self.misses
    }
}

/// Cache of one entity kind keyed by id or token.
///
/// A key is unknown when the kind was never loaded or the key was invalidated;
/// otherwise it is present or known absent. Entries never expire.
#[derive(Debug)]
pub struct EntityCache<K, V> {
    kind: &'static str,
    state: Mutex<KindState<K, V>>,
}

impl<K, V> EntityCache<K, V>
where
    K: Clone + Eq + Hash + Ord + std::fmt::Debug,
    V: Clone,
{
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            state: Mutex::new(KindState {
                loaded: false,
                generation: 0,
                entries: HashMap::new(),
            }),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn is_loaded(&self) -> Result<bool> {
        Ok(self.state.lock()?.loaded)
    }

    /// Returns the cached entry, or `None` when `key` has to be read from the store.
    pub fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>> {
        let state = self.state.lock()?;
        if !state.loaded {
            return Ok(None);
        }
        Ok(match state.entries.get(key) {
            Some(entry) => entry.clone(),
            None => Some(CacheEntry::Absent),
        })
    }

    /// Stores an entry for `key`.
    ///
    /// Ignored until the kind is loaded: a single key cannot stand in for the
    /// full key set. Returns whether the entry was stored.
    pub fn put(&self, key: K, entry: CacheEntry<V>) -> Result<bool> {
        let mut state = self.state.lock()?;
        if !state.loaded {
            return Ok(false);
        }
        state.entries.insert(key, Some(entry));
        Ok(true)
    }

    /// Marks `key` unknown so the next build re-reads it. Performs no store I/O.
    pub fn invalidate(&self, key: K) -> Result<()> {
        let mut state = self.state.lock()?;
        state.generation = state.generation.wrapping_add(1);
        if state.loaded {
            event!(Level::DEBUG, kind = self.kind, key = ?key, "cache entry invalidated");
            state.entries.insert(key, None);
        }
        Ok(())
    }

    /// Forgets the whole kind; the next build enumerates it from the store.
    pub fn invalidate_all(&self) -> Result<()> {
        let mut state = self.state.lock()?;
        state.generation = state.generation.wrapping_add(1);
        state.loaded = false;
        state.entries.clear();
        Ok(())
    }

    /// Captures the cached values and the keys that need a store read.
    pub fn plan(&self) -> Result<RefillPlan<K, V>> {
        let state = self.state.lock()?;
        if !state.loaded {
            return Ok(RefillPlan {
                generation: state.generation,
                full: true,
                hits: Vec::new(),
                misses: Vec::new(),
            });
        }

        let mut hits = Vec::new();
        let mut misses = Vec::new();
        for (key, entry) in &state.entries {
            match entry {
                Some(CacheEntry::Present(value)) => hits.push((key.clone(), value.clone())),
                Some(CacheEntry::Absent) => {}
                None => misses.push(key.clone()),
            }
        }
        misses.sort();
        Ok(RefillPlan {
            generation: state.generation,
            full: false,
            hits,
            misses,
        })
    }

    /// Stores what was fetched for `plan` and returns the merged present values.
    ///
    /// If any invalidation happened since `plan` was taken the fetched entries
    /// are not cached, so they can never mask a newer write; the caller still
    /// gets them.
    ///
    /// The check is per kind, not per key: an invalidation of any key drops the
    /// whole refill, and the fetched keys stay unknown. While a kind is
    /// invalidated faster than it can be refilled, every build re-reads those
    /// keys (for an unloaded slot kind, the full slot range).
    pub fn complete(
        &self,
        plan: RefillPlan<K, V>,
        fetched: Vec<(K, CacheEntry<V>)>,
    ) -> Result<BTreeMap<K, V>> {
        {
            let mut state = self.state.lock()?;
            if state.generation == plan.generation {
                if plan.full {
                    state.entries.clear();
                    state.loaded = true;
                }
                for (key, entry) in &fetched {
                    state.entries.insert(key.clone(), Some(entry.clone()));
                }
            } else {
                event!(
                    Level::WARN,
                    kind = self.kind,
                    fetched = fetched.len(),
                    "refill raced an invalidation, result not cached"
                );
            }
        }

        let mut merged: BTreeMap<K, V> = plan.hits.into_iter().collect();
        for (key, entry) in fetched {
            match entry {
                CacheEntry::Present(value) => {
                    merged.insert(key, value);
                }
                CacheEntry::Absent => {
                    merged.remove(&key);
                }
            }
        }
        Ok(merged)
    }
}
