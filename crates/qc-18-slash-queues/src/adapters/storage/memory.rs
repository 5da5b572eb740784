use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, StoreCursor};
use std::collections::btree_map::{BTreeMap, Range};
use std::ops::Bound;

/// In-memory ordered key-value store.
///
/// Backed by a `BTreeMap`, so iteration follows byte-lexicographic key order
/// like the production store. Batch writes are trivially atomic because the
/// store is single-threaded.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKVStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys in the store, across all namespaces.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.data.remove(key);
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    self.data.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    self.data.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }

    fn iterator<'a>(
        &'a self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<Box<dyn StoreCursor + 'a>, KVStoreError> {
        // BTreeMap::range panics on inverted bounds; treat them as empty.
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Ok(Box::new(MemoryCursor::empty()));
            }
        }

        let lower = start.map_or(Bound::Unbounded, Bound::Included);
        let upper = end.map_or(Bound::Unbounded, Bound::Excluded);
        let range = self.data.range::<[u8], _>((lower, upper));

        Ok(Box::new(MemoryCursor::new(range)))
    }
}

/// Lazy cursor over a `BTreeMap` range.
///
/// Borrows the store, so the store cannot be mutated while it is open.
pub struct MemoryCursor<'a> {
    range: Option<Range<'a, Vec<u8>, Vec<u8>>>,
    current: Option<(&'a Vec<u8>, &'a Vec<u8>)>,
}

impl<'a> MemoryCursor<'a> {
    fn new(mut range: Range<'a, Vec<u8>, Vec<u8>>) -> Self {
        let current = range.next();
        Self {
            range: Some(range),
            current,
        }
    }

    fn empty() -> Self {
        Self {
            range: None,
            current: None,
        }
    }
}

impl StoreCursor for MemoryCursor<'_> {
    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        self.current.map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    fn advance(&mut self) -> Result<(), KVStoreError> {
        self.current = self.range.as_mut().and_then(|range| range.next());
        Ok(())
    }

    fn close(&mut self) {
        self.range = None;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_keys(
        store: &InMemoryKVStore,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Vec<Vec<u8>> {
        let mut cursor = store.iterator(start, end).unwrap();
        let mut keys = Vec::new();
        while let Some((key, _)) = cursor.current() {
            keys.push(key.to_vec());
            cursor.advance().unwrap();
        }
        keys
    }

    #[test]
    fn test_in_memory_kv_store() {
        let mut store = InMemoryKVStore::new();

        store.put(b"key1", b"value1").unwrap();
        store.put(b"key2", b"value2").unwrap();

        assert_eq!(store.get(b"key1").unwrap(), Some(b"value1".to_vec()));
        assert_eq!(store.get(b"key2").unwrap(), Some(b"value2".to_vec()));
        assert_eq!(store.get(b"key3").unwrap(), None);

        assert!(store.exists(b"key1").unwrap());
        assert!(!store.exists(b"key3").unwrap());

        store.delete(b"key1").unwrap();
        store.delete(b"key1").unwrap();
        assert!(!store.exists(b"key1").unwrap());
    }

    #[test]
    fn test_in_memory_kv_batch_write() {
        let mut store = InMemoryKVStore::new();
        store.put(b"c", b"old").unwrap();

        let ops = vec![
            BatchOperation::put(b"a", b"1"),
            BatchOperation::put(b"b", b"2"),
            BatchOperation::delete(b"c"),
        ];

        store.atomic_batch_write(ops).unwrap();

        assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.get(b"c").unwrap(), None);
    }

    #[test]
    fn test_iterator_is_ordered_and_bounded() {
        let mut store = InMemoryKVStore::new();
        for key in [b"d", b"a", b"c", b"b", b"e"] {
            store.put(key, b"v").unwrap();
        }

        assert_eq!(
            collect_keys(&store, None, None),
            vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec(), b"d".to_vec(), b"e".to_vec()]
        );
        assert_eq!(
            collect_keys(&store, Some(&b"b"[..]), Some(&b"d"[..])),
            vec![b"b".to_vec(), b"c".to_vec()]
        );
        assert!(collect_keys(&store, Some(&b"d"[..]), Some(&b"b"[..])).is_empty());
        assert!(collect_keys(&store, Some(&b"c"[..]), Some(&b"c"[..])).is_empty());
    }

    #[test]
    fn test_closed_cursor_is_invalid() {
        let mut store = InMemoryKVStore::new();
        store.put(b"a", b"1").unwrap();
        store.put(b"b", b"2").unwrap();

        let mut cursor = store.iterator(None, None).unwrap();
        assert!(cursor.valid());

        cursor.close();
        assert!(!cursor.valid());
        cursor.advance().unwrap();
        assert!(cursor.current().is_none());
    }
}
