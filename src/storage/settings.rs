//! Cached generator settings
//!
//! The current code length is read from the store once at startup and then
//! served from memory. Only the registrar mutates it, and it does so while
//! holding the cell's lock, after the transaction that persisted the new
//! value has committed.

use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use super::keys::CODE_LENGTH_KEY;
use super::kv::{KvRead, KvStore};
use crate::errors::Result;

#[derive(Debug)]
pub struct CodeLengthCell {
    current: Mutex<u64>,
}

impl CodeLengthCell {
    pub fn new(length: u64) -> Self {
        Self {
            current: Mutex::new(length),
        }
    }

    /// 从存储加载当前长度，不存在时使用 `default`
    pub fn load(store: &KvStore, default: u64) -> Result<Self> {
        let length = store
            .read(|txn| txn.get_u64(CODE_LENGTH_KEY, default))
            .map_err(|e| e.with_context("loading code length"))?;
        debug!("Loaded code length: {}", length);
        Ok(Self::new(length))
    }

    pub fn get(&self) -> u64 {
        *self.current.lock()
    }

    /// Exclusive access for the duration of a length-mutating transaction.
    pub(crate) fn lock(&self) -> MutexGuard<'_, u64> {
        self.current.lock()
    }
}
