//! Embedded Object Store
//!
//! A small versioned document database persisted as a single JSON file. Records are JSON
//! objects kept in named object stores and keyed by an auto-incrementing integer that is
//! written back into the record under the store's key path.
//!
//! Read-write transactions run against a staged copy of the database. The copy is written
//! to disk and swapped in only after the transaction body returns `Ok`, so a failed
//! transaction leaves neither memory nor disk changed.

use std::{
    collections::BTreeMap,
    ffi::OsString,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, info};

mod errors;
mod transaction;

pub use errors::ObjectStoreError;
pub use transaction::{ReadTransaction, VersionChange, WriteTransaction};

/// Where an object database is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// JSON file on disk, created on first write.
    File(PathBuf),

    /// Process memory only.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Snapshot {
    name: String,
    version: u32,
    stores: BTreeMap<String, StoreData>,
}

impl Snapshot {
    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: 0,
            stores: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    key_path: String,
    next_key: i64,
    records: BTreeMap<i64, Value>,
}

/// An open object database.
#[derive(Debug)]
pub struct ObjectDb {
    name: String,
    location: Location,
    state: Mutex<Snapshot>,
}

impl ObjectDb {
    /// Open the database `name` at `location`, upgrading it to `version` when the stored
    /// version is lower.
    ///
    /// `upgrade` runs at most once, against a staged copy, and may create object stores.
    ///
    /// # Errors
    ///
    /// Returns an error if `version` is zero or lower than the stored version, if the file
    /// cannot be read, belongs to another database or cannot be decoded, or if `upgrade`
    /// fails.
    pub async fn open<F>(
        location: Location,
        name: &str,
        version: u32,
        upgrade: F,
    ) -> Result<Self, ObjectStoreError>
    where
        F: FnOnce(&mut VersionChange<'_>) -> Result<(), ObjectStoreError>,
    {
        if version == 0 {
            return Err(ObjectStoreError::InvalidVersion);
        }

        let mut snapshot = match &location {
            Location::File(path) => load(path, name).await?,
            Location::Memory => Snapshot::empty(name),
        };

        if snapshot.version > version {
            return Err(ObjectStoreError::VersionDowngrade {
                stored: snapshot.version,
                requested: version,
            });
        }

        if snapshot.version < version {
            let old_version = snapshot.version;
            let mut staged = snapshot.clone();

            upgrade(&mut VersionChange::new(&mut staged, old_version))?;
            staged.version = version;

            persist(&location, &staged).await?;
            snapshot = staged;

            info!(database = name, old_version, version, "upgraded object database");
        }

        Ok(Self {
            name: name.to_string(),
            location,
            state: Mutex::new(snapshot),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn version(&self) -> u32 {
        self.state.lock().await.version
    }

    pub async fn object_store_names(&self) -> Vec<String> {
        self.state.lock().await.stores.keys().cloned().collect()
    }

    /// Run `body` with read access to the stores named in `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if a store in `scope` does not exist, or whatever `body` returns.
    pub async fn read<T, F>(&self, scope: &[&str], body: F) -> Result<T, ObjectStoreError>
    where
        F: FnOnce(&ReadTransaction<'_>) -> Result<T, ObjectStoreError>,
    {
        let snapshot = self.state.lock().await;
        let tx = ReadTransaction::new(&snapshot, scope)?;

        body(&tx)
    }

    /// Run `body` with read-write access to the stores named in `scope`, committing its
    /// writes only if it succeeds and the new state reaches disk.
    ///
    /// # Errors
    ///
    /// Returns an error if a store in `scope` does not exist, if `body` fails, or if the
    /// staged state cannot be persisted.
    pub async fn write<T, F>(&self, scope: &[&str], body: F) -> Result<T, ObjectStoreError>
    where
        F: FnOnce(&mut WriteTransaction<'_>) -> Result<T, ObjectStoreError>,
    {
        let mut committed = self.state.lock().await;
        let mut staged = committed.clone();

        let value = {
            let mut tx = WriteTransaction::new(&mut staged, scope)?;

            body(&mut tx)?
        };

        persist(&self.location, &staged).await?;
        *committed = staged;

        Ok(value)
    }
}

async fn load(path: &Path, name: &str) -> Result<Snapshot, ObjectStoreError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "object database file not found, starting empty");

            return Ok(Snapshot::empty(name));
        }
        Err(error) => return Err(error.into()),
    };

    let snapshot: Snapshot = serde_json::from_slice(&bytes)?;

    if snapshot.name != name {
        return Err(ObjectStoreError::NameMismatch {
            expected: name.to_string(),
            found: snapshot.name,
        });
    }

    Ok(snapshot)
}

async fn persist(location: &Location, snapshot: &Snapshot) -> Result<(), ObjectStoreError> {
    let Location::File(path) = location else {
        return Ok(());
    };

    let bytes = serde_json::to_vec_pretty(snapshot)?;
    let staging = staging_path(path);

    let mut file = fs::File::create(&staging).await?;

    file.write_all(&bytes).await?;
    file.sync_all().await?;

    fs::rename(&staging, path).await?;

    debug!(path = %path.display(), bytes = bytes.len(), "persisted object database");

    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut file_name = path.file_name().map(OsString::from).unwrap_or_default();

    file_name.push(".tmp");

    path.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<i64>,
        body: String,
    }

    fn note(body: &str) -> Note {
        Note {
            id: None,
            body: body.to_string(),
        }
    }

    fn create_notes(change: &mut VersionChange<'_>) -> Result<(), ObjectStoreError> {
        if !change.contains("notes") {
            change.create_object_store("notes", "id")?;
        }

        Ok(())
    }

    async fn open_notes(location: Location) -> Result<ObjectDb, ObjectStoreError> {
        ObjectDb::open(location, "notes_db", 1, create_notes).await
    }

    #[tokio::test]
    async fn open_runs_upgrade_for_new_database() -> TestResult {
        let db = open_notes(Location::Memory).await?;

        assert_eq!(db.name(), "notes_db");
        assert_eq!(db.version().await, 1);
        assert_eq!(db.object_store_names().await, ["notes"]);

        Ok(())
    }

    #[tokio::test]
    async fn open_with_version_zero_errors() {
        let result = ObjectDb::open(Location::Memory, "notes_db", 0, create_notes).await;

        assert!(matches!(result, Err(ObjectStoreError::InvalidVersion)));
    }

    #[tokio::test]
    async fn add_generates_keys_starting_at_one() -> TestResult {
        let db = open_notes(Location::Memory).await?;

        let keys = db
            .write(&["notes"], |tx| {
                Ok((tx.add("notes", &note("first"))?, tx.add("notes", &note("second"))?))
            })
            .await?;

        assert_eq!(keys, (1, 2));

        let notes: Vec<Note> = db.read(&["notes"], |tx| tx.get_all("notes")).await?;

        assert_eq!(notes.len(), 2);
        assert_eq!(notes.first().and_then(|n| n.id), Some(1));
        assert_eq!(notes.get(1).map(|n| n.body.as_str()), Some("second"));

        Ok(())
    }

    #[tokio::test]
    async fn add_with_explicit_key_moves_generator_past_it() -> TestResult {
        let db = open_notes(Location::Memory).await?;

        let keys = db
            .write(&["notes"], |tx| {
                let explicit = tx.add(
                    "notes",
                    &Note {
                        id: Some(10),
                        body: "pinned".to_string(),
                    },
                )?;

                Ok((explicit, tx.add("notes", &note("next"))?))
            })
            .await?;

        assert_eq!(keys, (10, 11));

        Ok(())
    }

    #[tokio::test]
    async fn write_transaction_reads_its_own_writes() -> TestResult {
        let db = open_notes(Location::Memory).await?;

        let (staged, single) = db
            .write(&["notes"], |tx| {
                let key = tx.add("notes", &note("draft"))?;
                let staged: Vec<Note> = tx.get_all("notes")?;
                let single: Option<Note> = tx.get("notes", key)?;

                Ok((staged, single))
            })
            .await?;

        assert_eq!(staged.len(), 1);
        assert_eq!(single.map(|n| n.body), Some("draft".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn add_with_taken_key_errors() -> TestResult {
        let db = open_notes(Location::Memory).await?;

        db.write(&["notes"], |tx| tx.add("notes", &note("first")))
            .await?;

        let result = db
            .write(&["notes"], |tx| {
                tx.add(
                    "notes",
                    &Note {
                        id: Some(1),
                        body: "again".to_string(),
                    },
                )
            })
            .await;

        assert!(matches!(
            result,
            Err(ObjectStoreError::KeyExists { key: 1, .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn add_rejects_non_object_records() -> TestResult {
        let db = open_notes(Location::Memory).await?;

        let result = db.write(&["notes"], |tx| tx.add("notes", &42)).await;

        assert!(matches!(result, Err(ObjectStoreError::NotAnObject(_))));

        Ok(())
    }

    #[tokio::test]
    async fn failed_write_discards_staged_records() -> TestResult {
        let db = open_notes(Location::Memory).await?;

        let result: Result<(), _> = db
            .write(&["notes"], |tx| {
                tx.add("notes", &note("lost"))?;

                Err(ObjectStoreError::InvalidKey("notes".to_string()))
            })
            .await;

        assert!(result.is_err());

        let count = db.read(&["notes"], |tx| tx.count("notes")).await?;

        assert_eq!(count, 0);

        let key = db
            .write(&["notes"], |tx| tx.add("notes", &note("kept")))
            .await?;

        assert_eq!(key, 1, "key generator must not advance on rollback");

        Ok(())
    }

    #[tokio::test]
    async fn transaction_scope_is_enforced() -> TestResult {
        let db = ObjectDb::open(Location::Memory, "notes_db", 1, |change| {
            change.create_object_store("notes", "id")?;
            change.create_object_store("tags", "id")
        })
        .await?;

        let result = db.write(&["notes"], |tx| tx.add("tags", &note("x"))).await;

        assert!(matches!(result, Err(ObjectStoreError::NotInScope(store)) if store == "tags"));

        let result = db.read(&["missing"], |tx| tx.count("missing")).await;

        assert!(matches!(result, Err(ObjectStoreError::StoreNotFound(_))));

        Ok(())
    }

    #[tokio::test]
    async fn committed_writes_survive_reopen() -> TestResult {
        let dir = TempDir::new()?;
        let location = Location::File(dir.path().join("notes_db.json"));

        {
            let db = open_notes(location.clone()).await?;

            db.write(&["notes"], |tx| tx.add("notes", &note("durable")))
                .await?;
        }

        let mut upgraded = false;

        let db = ObjectDb::open(location, "notes_db", 1, |_change| {
            upgraded = true;

            Ok(())
        })
        .await?;

        assert!(!upgraded, "upgrade must not run when versions match");

        let stored: Option<Note> = db.read(&["notes"], |tx| tx.get("notes", 1)).await?;

        assert_eq!(
            stored,
            Some(Note {
                id: Some(1),
                body: "durable".to_string(),
            })
        );
        assert!(!dir.path().join("notes_db.json.tmp").exists());

        Ok(())
    }

    #[tokio::test]
    async fn reopening_with_lower_version_errors() -> TestResult {
        let dir = TempDir::new()?;
        let location = Location::File(dir.path().join("notes_db.json"));

        ObjectDb::open(location.clone(), "notes_db", 2, create_notes).await?;

        let result = open_notes(location).await;

        assert!(matches!(
            result,
            Err(ObjectStoreError::VersionDowngrade {
                stored: 2,
                requested: 1
            })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn upgrade_sees_previous_version() -> TestResult {
        let dir = TempDir::new()?;
        let location = Location::File(dir.path().join("notes_db.json"));

        open_notes(location.clone()).await?;

        let mut seen = None;

        let db = ObjectDb::open(location, "notes_db", 2, |change| {
            seen = Some(change.old_version());
            assert_eq!(change.object_store_names(), ["notes"]);
            change.create_object_store("tags", "id")
        })
        .await?;

        assert_eq!(seen, Some(1));
        assert_eq!(db.object_store_names().await, ["notes", "tags"]);

        Ok(())
    }

    #[tokio::test]
    async fn file_from_another_database_errors() -> TestResult {
        let dir = TempDir::new()?;
        let location = Location::File(dir.path().join("shared.json"));

        open_notes(location.clone()).await?;

        let result = ObjectDb::open(location, "other_db", 1, create_notes).await;

        assert!(matches!(result, Err(ObjectStoreError::NameMismatch { .. })));

        Ok(())
    }
}
