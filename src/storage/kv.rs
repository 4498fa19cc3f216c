//! redb-backed key-value store
//!
//! All entities live in one flat table keyed by UTF-8 strings. Callers get
//! scoped read-only or read-write transactions; a read-write closure that
//! returns `Err` aborts, so no partial state is ever committed.

use std::path::Path;

use redb::{Database, ReadOnlyTable, ReadableTable, Table, TableDefinition};
use tracing::{debug, warn};

use super::codec;
use crate::errors::{KvLinkerError, Result};

const KV_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

pub struct KvStore {
    db: Database,
}

impl KvStore {
    /// 打开（或创建）数据库文件
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let db = Database::create(path).map_err(|e| {
            KvLinkerError::from(e).with_context(format!("opening store at {}", path.display()))
        })?;

        // 预先建表，之后的只读事务不需要处理 TableDoesNotExist
        let txn = db.begin_write()?;
        {
            txn.open_table(KV_TABLE)?;
        }
        txn.commit()?;

        debug!("Key-value store opened at {}", path.display());
        Ok(Self { db })
    }

    /// Run `f` inside a read-only transaction.
    pub fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ReadTxn) -> Result<T>,
    {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(KV_TABLE)?;
        f(&ReadTxn { table })
    }

    /// Run `f` inside a read-write transaction.
    ///
    /// Commits when `f` returns `Ok`, aborts otherwise.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut WriteTxn<'_>) -> Result<T>,
    {
        let txn = self.db.begin_write()?;
        let outcome = {
            let table = txn.open_table(KV_TABLE)?;
            let mut write = WriteTxn { table };
            f(&mut write)
        };

        match outcome {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort_err) = txn.abort() {
                    warn!("Failed to abort transaction after error ({}): {}", e, abort_err);
                }
                Err(e)
            }
        }
    }
}

/// Typed reads shared by both transaction kinds.
pub trait KvRead {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get_raw(key)?.is_some())
    }

    fn get_u64(&self, key: &str, default: u64) -> Result<u64> {
        match self.get_raw(key)? {
            Some(raw) => codec::decode_u64(&raw).map_err(|e| e.with_context(key)),
            None => Ok(default),
        }
    }

    fn get_string(&self, key: &str) -> Result<Option<String>> {
        self.get_raw(key)?
            .map(|raw| codec::decode_string(&raw).map_err(|e| e.with_context(key)))
            .transpose()
    }

    fn get_u64_list(&self, key: &str) -> Result<Vec<u64>> {
        match self.get_raw(key)? {
            Some(raw) => codec::decode_u64_list(&raw).map_err(|e| e.with_context(key)),
            None => Ok(Vec::new()),
        }
    }
}

pub struct ReadTxn {
    table: ReadOnlyTable<&'static str, &'static [u8]>,
}

impl KvRead for ReadTxn {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.table.get(key)?.map(|guard| guard.value().to_vec()))
    }
}

pub struct WriteTxn<'txn> {
    table: Table<'txn, &'static str, &'static [u8]>,
}

impl WriteTxn<'_> {
    pub fn set_raw(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.table.insert(key, value)?;
        Ok(())
    }

    pub fn set_u64(&mut self, key: &str, value: u64) -> Result<()> {
        self.set_raw(key, &codec::encode_u64(value))
    }

    pub fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_raw(key, codec::encode_string(value))
    }

    pub fn set_u64_list(&mut self, key: &str, values: &[u64]) -> Result<()> {
        self.set_raw(key, &codec::encode_u64_list(values))
    }
}

impl KvRead for WriteTxn<'_> {
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.table.get(key)?.map(|guard| guard.value().to_vec()))
    }
}
