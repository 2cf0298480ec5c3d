//! Regex and validation-result caching
//!
//! Two caches with different lifetimes: a process-wide regex cache shared
//! by every validator, and per-validator LRU result caches for expensive
//! checks applied to repeating values.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lazy_static::lazy_static;
use lru::LruCache;
use regex::Regex;
use serde_json::Value;
use tracing::{error, warn};

use crate::errors::{ValidationError, ValidationResult};

/// Result cache capacity when none is given
pub const DEFAULT_RESULT_CACHE_CAPACITY: usize = 128;

/// Compiled-pattern cache keyed by pattern source
#[derive(Debug, Default)]
pub struct RegexCache {
    entries: Mutex<HashMap<String, Arc<Regex>>>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached regex for `pattern`, compiling on first use.
    ///
    /// Repeated calls with the same pattern return the same `Arc`. A
    /// pattern that fails to compile is not cached, so a later call with
    /// a corrected pattern is unaffected.
    pub fn get_or_compile(&self, pattern: &str) -> ValidationResult<Arc<Regex>> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(regex) = entries.get(pattern) {
            return Ok(Arc::clone(regex));
        }

        let regex = Regex::new(pattern).map_err(|e| {
            error!(pattern = %pattern, "Invalid regex pattern");
            ValidationError::InvalidPattern(e.to_string())
        })?;
        let regex = Arc::new(regex);
        entries.insert(pattern.to_string(), Arc::clone(&regex));
        Ok(regex)
    }

    /// Drop every cached pattern
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

lazy_static! {
    static ref SHARED_REGEX_CACHE: RegexCache = RegexCache::new();
}

/// Process-wide regex cache shared by all validators
pub fn regex_cache() -> &'static RegexCache {
    &SHARED_REGEX_CACHE
}

/// Snapshot of a result cache's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheInfo {
    pub hits: u64,
    pub misses: u64,
    pub capacity: usize,
    pub len: usize,
}

struct CacheState {
    entries: LruCache<String, ValidationResult<()>>,
    hits: u64,
    misses: u64,
}

/// Memoizes an expensive check over the values it has already seen.
///
/// Values are keyed by their canonical JSON serialization, so two
/// structurally equal values share one cache entry. The wrapped check
/// must be deterministic; a check whose outcome varies between calls on
/// the same value will serve stale results.
pub struct CachedValidator {
    check: Box<dyn Fn(&Value) -> ValidationResult<()> + Send + Sync>,
    state: Mutex<CacheState>,
}

impl fmt::Debug for CachedValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap();
        f.debug_struct("CachedValidator")
            .field("capacity", &state.entries.cap().get())
            .field("len", &state.entries.len())
            .field("hits", &state.hits)
            .field("misses", &state.misses)
            .finish()
    }
}

impl CachedValidator {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> ValidationResult<()> + Send + Sync + 'static,
    {
        Self::with_capacity(DEFAULT_RESULT_CACHE_CAPACITY, check)
    }

    pub fn with_capacity<F>(capacity: usize, check: F) -> Self
    where
        F: Fn(&Value) -> ValidationResult<()> + Send + Sync + 'static,
    {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        Self {
            check: Box::new(check),
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Validate `value`, reusing a cached outcome when one exists.
    ///
    /// Values that cannot be serialized bypass the cache and run the
    /// check directly.
    pub fn validate(&self, value: &Value) -> ValidationResult<()> {
        let key = match serde_json::to_string(value) {
            Ok(key) => key,
            Err(_) => {
                warn!("Unserializable value bypasses the result cache");
                return (self.check)(value);
            }
        };

        {
            let mut state = self.state.lock().unwrap();
            if let Some(result) = state.entries.get(&key).cloned() {
                state.hits += 1;
                return result;
            }
            state.misses += 1;
        }

        // Run the check without holding the lock; a concurrent insert for
        // the same key is harmless since the check is deterministic.
        let result = (self.check)(value);
        self.state
            .lock()
            .unwrap()
            .entries
            .put(key, result.clone());
        result
    }

    /// Hit/miss counters and occupancy
    pub fn cache_info(&self) -> CacheInfo {
        let state = self.state.lock().unwrap();
        CacheInfo {
            hits: state.hits,
            misses: state.misses,
            capacity: state.entries.cap().get(),
            len: state.entries.len(),
        }
    }

    /// Drop every cached result and reset the counters
    pub fn cache_clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.entries.clear();
        state.hits = 0;
        state.misses = 0;
    }
}
