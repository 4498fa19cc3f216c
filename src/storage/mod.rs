//! Storage layer
//!
//! - `kv`: redb-backed transactional store
//! - `codec`: value encodings
//! - `keys`: persisted key schema
//! - `settings`: cached code length

pub mod codec;
pub mod keys;
pub mod kv;
pub mod settings;

pub use kv::{KvRead, KvStore, ReadTxn, WriteTxn};
pub use settings::CodeLengthCell;
