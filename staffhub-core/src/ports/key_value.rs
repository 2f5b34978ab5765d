//! Key-value store port - persistence abstraction

use crate::domain::result::Result;

/// String key-value persistence
///
/// The only storage the core needs: whole collections are serialized to
/// JSON strings and written under a key. There is no cross-key atomicity,
/// and concurrent writers get last-write-wins.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored, sorted
    fn keys(&self) -> Result<Vec<String>>;
}
