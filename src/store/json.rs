//! JSON-file backed person store.
//!
//! The whole row set lives in one document under the data directory; reads
//! load it, writes rewrite it. Plenty for a directory of a few hundred
//! records, and trivially inspectable on disk.

use std::path::PathBuf;

use tracing::debug;

use crate::models::Person;

use super::{PersonStore, StoreError};

/// Store file name under the data directory
const STORE_FILE: &str = "people.json";

pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }

    /// A missing file reads as the empty row set.
    fn load(&self) -> Result<Vec<Person>, StoreError> {
        let path = self.store_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write(&self, people: &[Person]) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(people)?;
        std::fs::write(self.store_path(), contents)?;
        Ok(())
    }
}

impl PersonStore for JsonFileStore {
    fn all_ordered(&self) -> Result<Vec<Person>, StoreError> {
        let mut people = self.load()?;
        people.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Ok(people)
    }

    fn by_id(&self, id: i64) -> Result<Person, StoreError> {
        self.load()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn save_people(&self, people: &[Person]) -> Result<(), StoreError> {
        let mut rows = self.load()?;
        for person in people {
            match rows.iter_mut().find(|row| row.id == person.id) {
                Some(row) => *row = person.clone(),
                None => rows.push(person.clone()),
            }
        }
        debug!(count = rows.len(), "Wrote people to store");
        self.write(&rows)
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        self.write(&[])
    }
}

// ============================================================================
// Tests
// ============================================================================
