//! Durable key-value storage.
//!
//! The session store never talks to a concrete backend directly; it goes
//! through [`KeyValueStore`], which lets tests swap in a disabled or
//! quota-limited store and lets the binary persist to a JSON file.

mod file;
pub mod keys;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::Result;

/// A string-keyed, string-valued durable store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
