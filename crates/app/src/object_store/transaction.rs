//! Object store transactions.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::{ObjectStoreError, Snapshot, StoreData};

/// Schema changes allowed while a database is being upgraded to a new version.
#[derive(Debug)]
pub struct VersionChange<'a> {
    snapshot: &'a mut Snapshot,
    old_version: u32,
}

impl<'a> VersionChange<'a> {
    pub(super) fn new(snapshot: &'a mut Snapshot, old_version: u32) -> Self {
        Self {
            snapshot,
            old_version,
        }
    }

    /// Version the database had before this upgrade, 0 for a new database.
    #[must_use]
    pub fn old_version(&self) -> u32 {
        self.old_version
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.snapshot.stores.contains_key(name)
    }

    #[must_use]
    pub fn object_store_names(&self) -> Vec<&str> {
        self.snapshot.stores.keys().map(String::as_str).collect()
    }

    /// Create an object store whose records are keyed by an auto-incrementing integer
    /// stored under `key_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError::StoreExists`] if a store with this name already exists.
    pub fn create_object_store(&mut self, name: &str, key_path: &str) -> Result<(), ObjectStoreError> {
        if self.contains(name) {
            return Err(ObjectStoreError::StoreExists(name.to_string()));
        }

        self.snapshot.stores.insert(
            name.to_string(),
            StoreData {
                key_path: key_path.to_string(),
                next_key: 1,
                records: Default::default(),
            },
        );

        Ok(())
    }
}

/// Read access to the committed state of the stores in scope.
#[derive(Debug)]
pub struct ReadTransaction<'a> {
    snapshot: &'a Snapshot,
    scope: Vec<String>,
}

impl<'a> ReadTransaction<'a> {
    pub(super) fn new(snapshot: &'a Snapshot, scope: &[&str]) -> Result<Self, ObjectStoreError> {
        Ok(Self {
            scope: check_scope(snapshot, scope)?,
            snapshot,
        })
    }

    /// All records of a store in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is outside the scope or a record fails to decode.
    pub fn get_all<T: DeserializeOwned>(&self, store: &str) -> Result<Vec<T>, ObjectStoreError> {
        decode_all(scoped_store(self.snapshot, &self.scope, store)?)
    }

    /// A single record by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is outside the scope or the record fails to decode.
    pub fn get<T: DeserializeOwned>(
        &self,
        store: &str,
        key: i64,
    ) -> Result<Option<T>, ObjectStoreError> {
        decode_one(scoped_store(self.snapshot, &self.scope, store)?, key)
    }

    /// Number of records in a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is outside the scope.
    pub fn count(&self, store: &str) -> Result<usize, ObjectStoreError> {
        Ok(scoped_store(self.snapshot, &self.scope, store)?.records.len())
    }
}

/// Read-write access to a staged copy of the stores in scope.
#[derive(Debug)]
pub struct WriteTransaction<'a> {
    snapshot: &'a mut Snapshot,
    scope: Vec<String>,
}

impl<'a> WriteTransaction<'a> {
    pub(super) fn new(snapshot: &'a mut Snapshot, scope: &[&str]) -> Result<Self, ObjectStoreError> {
        let scope = check_scope(snapshot, scope)?;

        Ok(Self { snapshot, scope })
    }

    /// Insert a record, returning its key.
    ///
    /// Records without a value under the key path get the next generated key. A record
    /// that already carries a key keeps it and moves the generator past it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is outside the scope, the record does not serialize to
    /// a JSON object, or the key is invalid or already taken.
    pub fn add<T: Serialize>(&mut self, store: &str, record: &T) -> Result<i64, ObjectStoreError> {
        let Value::Object(mut fields) = serde_json::to_value(record)? else {
            return Err(ObjectStoreError::NotAnObject(store.to_string()));
        };

        let data = self.store_mut(store)?;

        let key = match fields.get(&data.key_path) {
            None | Some(Value::Null) => data.next_key,
            Some(value) => value
                .as_i64()
                .filter(|key| *key > 0)
                .ok_or_else(|| ObjectStoreError::InvalidKey(store.to_string()))?,
        };

        if data.records.contains_key(&key) {
            return Err(ObjectStoreError::KeyExists {
                store: store.to_string(),
                key,
            });
        }

        let following = key
            .checked_add(1)
            .ok_or_else(|| ObjectStoreError::KeyGeneratorExhausted(store.to_string()))?;

        data.next_key = data.next_key.max(following);

        fields.insert(data.key_path.clone(), Value::from(key));
        data.records.insert(key, Value::Object(fields));

        Ok(key)
    }

    /// All records of a store in key order, including writes staged by this transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is outside the scope or a record fails to decode.
    pub fn get_all<T: DeserializeOwned>(&self, store: &str) -> Result<Vec<T>, ObjectStoreError> {
        decode_all(scoped_store(self.snapshot, &self.scope, store)?)
    }

    /// A single record by key, including writes staged by this transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is outside the scope or the record fails to decode.
    pub fn get<T: DeserializeOwned>(
        &self,
        store: &str,
        key: i64,
    ) -> Result<Option<T>, ObjectStoreError> {
        decode_one(scoped_store(self.snapshot, &self.scope, store)?, key)
    }

    fn store_mut(&mut self, name: &str) -> Result<&mut StoreData, ObjectStoreError> {
        if !self.scope.iter().any(|store| store == name) {
            return Err(ObjectStoreError::NotInScope(name.to_string()));
        }

        self.snapshot
            .stores
            .get_mut(name)
            .ok_or_else(|| ObjectStoreError::StoreNotFound(name.to_string()))
    }
}

fn check_scope(snapshot: &Snapshot, scope: &[&str]) -> Result<Vec<String>, ObjectStoreError> {
    scope
        .iter()
        .map(|name| {
            if snapshot.stores.contains_key(*name) {
                Ok((*name).to_string())
            } else {
                Err(ObjectStoreError::StoreNotFound((*name).to_string()))
            }
        })
        .collect()
}

fn scoped_store<'s>(
    snapshot: &'s Snapshot,
    scope: &[String],
    name: &str,
) -> Result<&'s StoreData, ObjectStoreError> {
    if !scope.iter().any(|store| store == name) {
        return Err(ObjectStoreError::NotInScope(name.to_string()));
    }

    snapshot
        .stores
        .get(name)
        .ok_or_else(|| ObjectStoreError::StoreNotFound(name.to_string()))
}

fn decode_all<T: DeserializeOwned>(data: &StoreData) -> Result<Vec<T>, ObjectStoreError> {
    data.records
        .values()
        .map(|value| <T as Deserialize>::deserialize(value).map_err(ObjectStoreError::from))
        .collect()
}

fn decode_one<T: DeserializeOwned>(
    data: &StoreData,
    key: i64,
) -> Result<Option<T>, ObjectStoreError> {
    data.records
        .get(&key)
        .map(|value| <T as Deserialize>::deserialize(value).map_err(ObjectStoreError::from))
        .transpose()
}
