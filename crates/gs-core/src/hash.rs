//! Fx-hashed collection aliases.
//!
//! The scanner keeps several sets keyed by canonical paths and directory
//! names (visited directories, literal prune names). Those keys are short
//! strings produced locally, so the Fx hasher from `rustc-hash` is used
//! instead of the default SipHash.
//!
//! ```
//! use gs_core::{FxHashSet, fx_hash_set};
//!
//! let mut seen: FxHashSet<&str> = fx_hash_set();
//! assert!(seen.insert("/home/me/code/app"));
//! assert!(!seen.insert("/home/me/code/app"));
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new empty [`FxHashMap`].
#[inline]
#[must_use]
pub fn fx_hash_map<K, V>() -> FxHashMap<K, V> {
    FxHashMap::default()
}

/// Creates a new empty [`FxHashSet`].
#[inline]
#[must_use]
pub fn fx_hash_set<V>() -> FxHashSet<V> {
    FxHashSet::default()
}

/// Creates a new [`FxHashSet`] able to hold `capacity` elements without
/// reallocating.
#[inline]
#[must_use]
pub fn fx_hash_set_with_capacity<V>(capacity: usize) -> FxHashSet<V> {
    FxHashSet::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_hash_set_dedups_paths() {
        let mut set: FxHashSet<String> = fx_hash_set();
        assert!(set.insert("/a/b".to_owned()));
        assert!(set.insert("/a/c".to_owned()));
        assert!(!set.insert("/a/b".to_owned()));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_fx_hash_map_operations() {
        let mut map: FxHashMap<&str, usize> = fx_hash_map();
        *map.entry("main").or_default() += 1;
        *map.entry("main").or_default() += 1;
        assert_eq!(map.get("main"), Some(&2));
        assert_eq!(map.get("develop"), None);
    }

    #[test]
    fn test_fx_hash_set_with_capacity() {
        let set: FxHashSet<String> = fx_hash_set_with_capacity(64);
        assert!(set.capacity() >= 64);
    }
}
