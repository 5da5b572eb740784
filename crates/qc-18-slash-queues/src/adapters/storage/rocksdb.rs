//! # RocksDB Storage Adapter
//!
//! Production RocksDB implementation of the KeyValueStore trait.
//!
//! RocksDB's default bytewise comparator matches the order the queues rely
//! on. Cursors are raw iterators with an upper bound read option, so a range
//! scan never reads past the queue namespace.

use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, StoreCursor};
use rocksdb::{DBRawIterator, Options, ReadOptions, WriteBatch, WriteOptions, DB};
use tracing::info;

/// RocksDB configuration.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: String,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/slash-queues".to_string(),
            block_cache_size: 64 * 1024 * 1024,  // 64MB
            write_buffer_size: 16 * 1024 * 1024, // 16MB
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,  // 8MB
            write_buffer_size: 4 * 1024 * 1024, // 4MB
            sync_writes: false,
        }
    }
}

/// RocksDB-backed key-value store.
pub struct RocksDbStore {
    db: DB,
    config: RocksDbConfig,
}

impl RocksDbStore {
    /// Open or create a RocksDB database.
    pub fn open(config: RocksDbConfig) -> Result<Self, KVStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, &config.path).map_err(|e| KVStoreError::IOError {
            message: format!("Failed to open RocksDB: {}", e),
        })?;

        info!("[qc-18] opened RocksDB slash queue store at {}", config.path);

        Ok(Self { db, config })
    }

    fn write_options(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.db.get(key).map_err(|e| KVStoreError::IOError {
            message: format!("RocksDB get failed: {}", e),
        })
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.db
            .put_opt(key, value, &self.write_options())
            .map_err(|e| KVStoreError::IOError {
                message: format!("RocksDB put failed: {}", e),
            })
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.db
            .delete_opt(key, &self.write_options())
            .map_err(|e| KVStoreError::IOError {
                message: format!("RocksDB delete failed: {}", e),
            })
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut batch = WriteBatch::default();

        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    batch.put(&key, &value);
                }
                BatchOperation::Delete { key } => {
                    batch.delete(&key);
                }
            }
        }

        self.db
            .write_opt(batch, &self.write_options())
            .map_err(|e| KVStoreError::IOError {
                message: format!("RocksDB batch write failed: {}", e),
            })
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        self.db
            .get_pinned(key)
            .map(|v| v.is_some())
            .map_err(|e| KVStoreError::IOError {
                message: format!("RocksDB exists check failed: {}", e),
            })
    }

    fn iterator<'a>(
        &'a self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<Box<dyn StoreCursor + 'a>, KVStoreError> {
        let mut read_opts = ReadOptions::default();
        if let Some(end) = end {
            read_opts.set_iterate_upper_bound(end.to_vec());
        }

        let mut raw = self.db.raw_iterator_opt(read_opts);
        match start {
            Some(start) => raw.seek(start),
            None => raw.seek_to_first(),
        }

        let cursor = RocksDbCursor { raw: Some(raw) };
        cursor.status()?;
        Ok(Box::new(cursor))
    }
}

/// Cursor over a RocksDB raw iterator.
///
/// The raw iterator pins an implicit snapshot; dropping it in `close`
/// releases the snapshot.
pub struct RocksDbCursor<'a> {
    raw: Option<DBRawIterator<'a>>,
}

impl RocksDbCursor<'_> {
    fn status(&self) -> Result<(), KVStoreError> {
        match &self.raw {
            Some(raw) => raw.status().map_err(|e| KVStoreError::IOError {
                message: format!("RocksDB iterator failed: {}", e),
            }),
            None => Ok(()),
        }
    }
}

impl StoreCursor for RocksDbCursor<'_> {
    fn valid(&self) -> bool {
        self.raw.as_ref().is_some_and(|raw| raw.valid())
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        let raw = self.raw.as_ref()?;
        if !raw.valid() {
            return None;
        }
        Some((raw.key()?, raw.value()?))
    }

    fn advance(&mut self) -> Result<(), KVStoreError> {
        if let Some(raw) = self.raw.as_mut() {
            if raw.valid() {
                raw.next();
            }
        }
        self.status()
    }

    fn close(&mut self) {
        self.raw = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> RocksDbStore {
        let config = RocksDbConfig::for_testing(dir.path().to_string_lossy().to_string());
        RocksDbStore::open(config).unwrap()
    }

    #[test]
    fn test_rocksdb_basic_operations() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        store.put(b"key1", b"value1").unwrap();
        assert_eq!(store.get(b"key1").unwrap(), Some(b"value1".to_vec()));

        assert!(store.exists(b"key1").unwrap());
        assert!(!store.exists(b"nonexistent").unwrap());

        store.delete(b"key1").unwrap();
        assert!(!store.exists(b"key1").unwrap());
    }

    #[test]
    fn test_rocksdb_default_tuning_syncs_writes() {
        let temp_dir = TempDir::new().unwrap();
        let config = RocksDbConfig {
            path: temp_dir.path().to_string_lossy().to_string(),
            ..RocksDbConfig::default()
        };
        assert!(config.sync_writes);

        let mut store = RocksDbStore::open(config).unwrap();
        store.put(b"dsqueue\x01", b"a").unwrap();
        assert!(store.config.sync_writes);
        assert_eq!(store.get(b"dsqueue\x01").unwrap(), Some(b"a".to_vec()));
    }

    #[test]
    fn test_rocksdb_batch_write() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        let ops = vec![
            BatchOperation::put(b"batch1", b"value1"),
            BatchOperation::put(b"batch2", b"value2"),
            BatchOperation::delete(b"batch1"),
        ];

        store.atomic_batch_write(ops).unwrap();

        assert!(!store.exists(b"batch1").unwrap());
        assert!(store.exists(b"batch2").unwrap());
    }

    #[test]
    fn test_rocksdb_bounded_iterator() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        store.put(b"dsqueue\x02", b"b").unwrap();
        store.put(b"dsqueue\x01", b"a").unwrap();
        store.put(b"dsqueuf", b"outside").unwrap();

        let mut cursor = store
            .iterator(Some(&b"dsqueue"[..]), Some(&b"dsqueuf"[..]))
            .unwrap();
        let mut values = Vec::new();
        while let Some((_, value)) = cursor.current() {
            values.push(value.to_vec());
            cursor.advance().unwrap();
        }
        cursor.close();

        assert_eq!(values, vec![b"a".to_vec(), b"b".to_vec()]);
    }
}
