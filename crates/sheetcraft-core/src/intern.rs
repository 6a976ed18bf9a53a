//! Content-keyed interning with stable insertion order.
//!
//! [`InternTable`] is the building block behind the shared string table and
//! the format interner. Lookup is by content hash; enumeration follows the
//! order in which keys were first inserted, which is the order the
//! serializer must emit records in.

use std::borrow::Borrow;
use std::hash::Hash;

use ahash::RandomState;
use indexmap::map::Entry;
use indexmap::IndexMap;

/// Outcome of [`InternTable::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interned<'a, V> {
    pub value: &'a V,
    /// Position in insertion order
    pub position: usize,
    /// `false` when the key was already present and nothing changed
    pub is_new: bool,
}

/// A hash-indexed map that remembers first-insertion order.
///
/// Values are supplied by the caller; the table never renumbers anything.
#[derive(Debug, Clone)]
pub struct InternTable<K, V> {
    entries: IndexMap<K, V, RandomState>,
}

impl<K, V> Default for InternTable<K, V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::with_hasher(RandomState::new()),
        }
    }
}

impl<K: Hash + Eq, V> InternTable<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an entry by content without allocating an owned key.
    pub fn exists<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get_key_value(key)
    }

    /// Inserts `key` with `value` unless an equal key is already stored, in
    /// which case the stored pair is returned untouched.
    pub fn insert(&mut self, key: K, value: V) -> Interned<'_, V> {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                let position = entry.index();
                Interned {
                    value: entry.into_mut(),
                    position,
                    is_new: false,
                }
            }
            Entry::Vacant(entry) => {
                let position = entry.index();
                Interned {
                    value: entry.insert(value),
                    position,
                    is_new: true,
                }
            }
        }
    }

    pub fn get_index(&self, position: usize) -> Option<(&K, &V)> {
        self.entries.get_index(position)
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_exists() {
        let mut table: InternTable<String, u32> = InternTable::new();
        assert!(table.exists("a").is_none());

        let first = table.insert("a".to_string(), 7);
        assert!(first.is_new);
        assert_eq!(*first.value, 7);
        assert_eq!(first.position, 0);

        assert_eq!(table.exists("a"), Some((&"a".to_string(), &7)));
    }

    #[test]
    fn test_existing_key_keeps_value() {
        let mut table: InternTable<String, u32> = InternTable::new();
        table.insert("a".to_string(), 1);
        let again = table.insert("a".to_string(), 99);
        assert!(!again.is_new);
        assert_eq!(*again.value, 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut table: InternTable<&str, usize> = InternTable::new();
        for (i, key) in ["zeta", "alpha", "mid", "alpha"].into_iter().enumerate() {
            table.insert(key, i);
        }
        let keys: Vec<_> = table.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(keys, vec![("zeta", 0), ("alpha", 1), ("mid", 2)]);
        assert_eq!(table.get_index(2), Some((&"mid", &2)));
        assert!(table.get_index(3).is_none());
    }
}
