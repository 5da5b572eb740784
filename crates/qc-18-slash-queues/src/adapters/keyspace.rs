//! # Keyspace Partitioning
//!
//! Prefixed views over a shared ordered store.
//!
//! A `PrefixStore` is live over the parent store (not a copy): writes through
//! the view land in the parent under `prefix ‖ key`, reads and range scans only
//! ever see keys under the prefix, and keys come back with the prefix
//! stripped. Views implement `KeyValueStore` themselves, so they nest.

use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, StoreCursor};

/// Scope `store` to the keys under `namespace`.
pub fn scope<'a, S>(store: &'a mut S, namespace: &[u8]) -> PrefixStore<'a, S>
where
    S: KeyValueStore + ?Sized,
{
    PrefixStore {
        parent: store,
        prefix: namespace.to_vec(),
    }
}

/// Smallest key greater than every key starting with `prefix`.
///
/// Trailing `0xFF` bytes cannot be incremented and are dropped. `None` means
/// no such key exists (empty or all-`0xFF` prefix) and the range is
/// unbounded above.
pub fn prefix_end_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

fn prefixed(prefix: &[u8], key: &[u8]) -> Vec<u8> {
    let mut full = Vec::with_capacity(prefix.len() + key.len());
    full.extend_from_slice(prefix);
    full.extend_from_slice(key);
    full
}

/// A namespaced view over a parent store.
pub struct PrefixStore<'a, S: ?Sized> {
    parent: &'a mut S,
    prefix: Vec<u8>,
}

impl<S: ?Sized> PrefixStore<'_, S> {
    /// The namespace tag of this view.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for PrefixStore<'_, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.parent.get(&prefixed(&self.prefix, key))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.parent.put(&prefixed(&self.prefix, key), value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.parent.delete(&prefixed(&self.prefix, key))
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let operations = operations
            .into_iter()
            .map(|op| match op {
                BatchOperation::Put { key, value } => {
                    BatchOperation::put(prefixed(&self.prefix, &key), value)
                }
                BatchOperation::Delete { key } => {
                    BatchOperation::delete(prefixed(&self.prefix, &key))
                }
            })
            .collect();
        self.parent.atomic_batch_write(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        self.parent.exists(&prefixed(&self.prefix, key))
    }

    fn iterator<'b>(
        &'b self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<Box<dyn StoreCursor + 'b>, KVStoreError> {
        let cursor = PrefixCursor::open(&*self.parent, &self.prefix, start, end)?;
        Ok(Box::new(cursor))
    }
}

/// Cursor over one namespace of a parent store.
///
/// Bounds are given relative to the namespace; keys are yielded with the
/// namespace stripped.
pub struct PrefixCursor<'a> {
    inner: Box<dyn StoreCursor + 'a>,
    prefix_len: usize,
}

impl<'a> PrefixCursor<'a> {
    /// Open a cursor over `[prefix ‖ start, prefix ‖ end)` in `parent`.
    ///
    /// Missing bounds are clamped to the namespace.
    pub fn open<S>(
        parent: &'a S,
        prefix: &[u8],
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<Self, KVStoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let lower = prefixed(prefix, start.unwrap_or_default());
        let upper = match end {
            Some(end) => Some(prefixed(prefix, end)),
            None => prefix_end_bound(prefix),
        };

        let inner = parent.iterator(Some(lower.as_slice()), upper.as_deref())?;
        Ok(Self {
            inner,
            prefix_len: prefix.len(),
        })
    }
}

impl StoreCursor for PrefixCursor<'_> {
    fn valid(&self) -> bool {
        self.inner.valid()
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        let (key, value) = self.inner.current()?;
        Some((key.get(self.prefix_len..)?, value))
    }

    fn advance(&mut self) -> Result<(), KVStoreError> {
        self.inner.advance()
    }

    fn close(&mut self) {
        self.inner.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryKVStore;

    fn keys_of(store: &dyn KeyValueStore) -> Vec<Vec<u8>> {
        let mut cursor = store.iterator(None, None).unwrap();
        let mut keys = Vec::new();
        while let Some((key, _)) = cursor.current() {
            keys.push(key.to_vec());
            cursor.advance().unwrap();
        }
        keys
    }

    #[test]
    fn test_prefix_end_bound() {
        assert_eq!(prefix_end_bound(b"dsqueue"), Some(b"dsqueuf".to_vec()));
        assert_eq!(prefix_end_bound(&[0x01, 0xFF]), Some(vec![0x02]));
        assert_eq!(prefix_end_bound(&[0xFF, 0xFF]), None);
        assert_eq!(prefix_end_bound(&[]), None);
    }

    #[test]
    fn test_scoped_writes_land_in_parent() {
        let mut store = InMemoryKVStore::new();
        {
            let mut view = scope(&mut store, b"dsqueue");
            view.put(b"k", b"v").unwrap();
            assert_eq!(view.get(b"k").unwrap(), Some(b"v".to_vec()));
            assert_eq!(view.prefix(), b"dsqueue");
        }

        assert_eq!(store.get(b"dsqueuek").unwrap(), Some(b"v".to_vec()));
        assert_eq!(store.get(b"k").unwrap(), None);
    }

    #[test]
    fn test_scoped_iteration_is_isolated() {
        let mut store = InMemoryKVStore::new();
        store.put(b"dsqueue\x01", b"a").unwrap();
        store.put(b"dsqueue\x02", b"b").unwrap();
        store.put(b"dsqueuf", b"neighbour").unwrap();
        store.put(b"livequeue\x01", b"c").unwrap();
        store.put(b"a-before", b"d").unwrap();

        let view = scope(&mut store, b"dsqueue");
        assert_eq!(keys_of(&view), vec![vec![0x01], vec![0x02]]);
    }

    #[test]
    fn test_scoped_bounds_are_relative() {
        let mut store = InMemoryKVStore::new();
        for id in 1u8..=5 {
            store.put(&[b'q', id], &[id]).unwrap();
        }

        let view = scope(&mut store, b"q");
        let mut cursor = view.iterator(Some(&[2u8][..]), Some(&[4u8][..])).unwrap();
        let mut seen = Vec::new();
        while let Some((key, _)) = cursor.current() {
            seen.push(key.to_vec());
            cursor.advance().unwrap();
        }
        assert_eq!(seen, vec![vec![2], vec![3]]);
    }

    #[test]
    fn test_scoped_batch_write_and_delete() {
        let mut store = InMemoryKVStore::new();
        store.put(b"other", b"keep").unwrap();
        {
            let mut view = scope(&mut store, b"ns/");
            view.atomic_batch_write(vec![
                BatchOperation::put(b"a", b"1"),
                BatchOperation::put(b"b", b"2"),
            ])
            .unwrap();
            view.delete(b"a").unwrap();
            view.delete(b"missing").unwrap();
            assert!(!view.exists(b"a").unwrap());
            assert!(view.exists(b"b").unwrap());
        }

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(b"other").unwrap(), Some(b"keep".to_vec()));
    }

    #[test]
    fn test_nested_scopes_concatenate() {
        let mut store = InMemoryKVStore::new();
        {
            let mut outer = scope(&mut store, b"slashing/");
            let mut inner = scope(&mut outer, b"dsqueue/");
            inner.put(b"x", b"1").unwrap();
            assert_eq!(keys_of(&inner), vec![b"x".to_vec()]);
        }

        assert!(store.exists(b"slashing/dsqueue/x").unwrap());
    }
}
