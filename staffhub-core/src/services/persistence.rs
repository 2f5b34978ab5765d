//! Persistence - maps collections and session keys onto the key-value store

use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::config::StorageLayout;
use crate::domain::result::Result;
use crate::domain::EntityKind;
use crate::ports::KeyValueStore;

/// Key holding the signed-in account's email
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Key holding the email waiting for simulated verification
pub const UNVERIFIED_EMAIL_KEY: &str = "unverified_email";

/// A collection as found in storage
#[derive(Debug, Clone, PartialEq)]
pub enum RawCollection {
    /// Nothing stored for this collection yet
    Missing,
    /// Something is stored but it is not JSON of the expected shape
    Malformed(String),
    /// Parsed JSON, not yet checked against the record type
    Json(JsonValue),
}

/// Whole-collection persistence on top of a key-value store
///
/// Every write replaces the complete serialized collection. With the
/// consolidated layout the blob is read, the collection's field replaced,
/// and the blob written back; other collections are left as stored.
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
    layout: StorageLayout,
    blob_key: String,
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>, layout: StorageLayout, blob_key: impl Into<String>) -> Self {
        Self {
            store,
            layout,
            blob_key: blob_key.into(),
        }
    }

    pub fn layout(&self) -> StorageLayout {
        self.layout
    }

    /// Storage key that holds `kind`
    pub fn key_for(&self, kind: EntityKind) -> &str {
        match self.layout {
            StorageLayout::Consolidated => &self.blob_key,
            StorageLayout::PerEntity => kind.storage_key(),
        }
    }

    /// Every key this persistence layer may write
    pub fn managed_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = match self.layout {
            StorageLayout::Consolidated => vec![self.blob_key.clone()],
            StorageLayout::PerEntity => EntityKind::ALL
                .iter()
                .map(|k| k.storage_key().to_string())
                .collect(),
        };
        keys.push(AUTH_TOKEN_KEY.to_string());
        keys.push(UNVERIFIED_EMAIL_KEY.to_string());
        keys
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Read the stored form of a collection
    pub fn read_collection(&self, kind: EntityKind) -> Result<RawCollection> {
        let Some(raw) = self.store.get(self.key_for(kind))? else {
            return Ok(RawCollection::Missing);
        };

        let value: JsonValue = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => return Ok(RawCollection::Malformed(e.to_string())),
        };

        let collection = match self.layout {
            StorageLayout::PerEntity => value,
            StorageLayout::Consolidated => match value {
                JsonValue::Object(mut blob) => match blob.remove(kind.collection()) {
                    Some(collection) => collection,
                    None => return Ok(RawCollection::Missing),
                },
                other => {
                    return Ok(RawCollection::Malformed(format!(
                        "expected an object, found {}",
                        json_type(&other)
                    )))
                }
            },
        };

        if !collection.is_array() {
            return Ok(RawCollection::Malformed(format!(
                "expected an array of {}, found {}",
                kind,
                json_type(&collection)
            )));
        }
        Ok(RawCollection::Json(collection))
    }

    /// Replace the stored form of a collection
    pub fn write_collection(&self, kind: EntityKind, collection: JsonValue) -> Result<()> {
        match self.layout {
            StorageLayout::PerEntity => {
                self.store.set(kind.storage_key(), &serde_json::to_string(&collection)?)
            }
            StorageLayout::Consolidated => {
                let mut blob = self
                    .store
                    .get(&self.blob_key)?
                    .and_then(|raw| serde_json::from_str::<JsonValue>(&raw).ok())
                    .and_then(|value| match value {
                        JsonValue::Object(map) => Some(map),
                        _ => None,
                    })
                    .unwrap_or_else(Map::new);
                blob.insert(kind.collection().to_string(), collection);
                self.store
                    .set(&self.blob_key, &serde_json::to_string(&JsonValue::Object(blob))?)
            }
        }
    }

    /// Email of the signed-in account from the previous run, if any
    pub fn auth_token(&self) -> Result<Option<String>> {
        self.store.get(AUTH_TOKEN_KEY)
    }

    pub fn save_auth_token(&self, email: &str) -> Result<()> {
        self.store.set(AUTH_TOKEN_KEY, email)
    }

    pub fn clear_auth_token(&self) -> Result<()> {
        self.store.remove(AUTH_TOKEN_KEY)
    }

    pub fn unverified_email(&self) -> Result<Option<String>> {
        self.store.get(UNVERIFIED_EMAIL_KEY)
    }

    pub fn save_unverified_email(&self, email: &str) -> Result<()> {
        self.store.set(UNVERIFIED_EMAIL_KEY, email)
    }

    pub fn clear_unverified_email(&self) -> Result<()> {
        self.store.remove(UNVERIFIED_EMAIL_KEY)
    }

    /// Remove every managed key; the next load reseeds
    pub fn reset(&self) -> Result<()> {
        for key in self.managed_keys() {
            self.store.remove(&key)?;
        }
        Ok(())
    }
}

fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryKeyValueStore;
    use serde_json::json;

    fn persistence(layout: StorageLayout) -> (Arc<InMemoryKeyValueStore>, Persistence) {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let persistence = Persistence::new(store.clone(), layout, "db");
        (store, persistence)
    }

    #[test]
    fn test_consolidated_write_keeps_other_collections() {
        let (store, persistence) = persistence(StorageLayout::Consolidated);
        persistence
            .write_collection(EntityKind::Account, json!([{"email": "a@b.co"}]))
            .unwrap();
        persistence
            .write_collection(EntityKind::Department, json!([]))
            .unwrap();

        let blob: JsonValue = serde_json::from_str(&store.get("db").unwrap().unwrap()).unwrap();
        assert_eq!(blob["accounts"][0]["email"], "a@b.co");
        assert_eq!(blob["departments"], json!([]));
        assert_eq!(
            persistence.read_collection(EntityKind::Employee).unwrap(),
            RawCollection::Missing
        );
    }

    #[test]
    fn test_per_entity_keys() {
        let (store, persistence) = persistence(StorageLayout::PerEntity);
        persistence
            .write_collection(EntityKind::Request, json!([]))
            .unwrap();
        assert_eq!(store.get("myRequests").unwrap().as_deref(), Some("[]"));
        assert_eq!(persistence.key_for(EntityKind::Account), "accounts");
    }

    #[test]
    fn test_malformed_data_is_reported() {
        let (store, persistence) = persistence(StorageLayout::PerEntity);
        store.set("accounts", "{{nope").unwrap();
        assert!(matches!(
            persistence.read_collection(EntityKind::Account).unwrap(),
            RawCollection::Malformed(_)
        ));

        store.set("accounts", "{\"a\": 1}").unwrap();
        assert!(matches!(
            persistence.read_collection(EntityKind::Account).unwrap(),
            RawCollection::Malformed(_)
        ));
    }

    #[test]
    fn test_consolidated_write_over_corrupt_blob() {
        let (store, persistence) = persistence(StorageLayout::Consolidated);
        store.set("db", "garbage").unwrap();
        persistence
            .write_collection(EntityKind::Account, json!([]))
            .unwrap();
        let blob: JsonValue = serde_json::from_str(&store.get("db").unwrap().unwrap()).unwrap();
        assert_eq!(blob, json!({"accounts": []}));
    }

    #[test]
    fn test_session_keys_and_reset() {
        let (store, persistence) = persistence(StorageLayout::Consolidated);
        persistence.save_auth_token("a@b.co").unwrap();
        persistence.save_unverified_email("c@d.co").unwrap();
        persistence.write_collection(EntityKind::Account, json!([])).unwrap();
        store.set("unrelated", "keep").unwrap();

        assert_eq!(persistence.auth_token().unwrap().as_deref(), Some("a@b.co"));
        persistence.reset().unwrap();
        assert_eq!(store.keys().unwrap(), vec!["unrelated"]);
    }
}
