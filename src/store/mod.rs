pub mod json;

pub use json::JsonFileStore;

use thiserror::Error;

use crate::models::Person;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No person with id {0}")]
    NotFound(i64),

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persistent tier contract: a keyed store of person rows.
///
/// Reads and writes are blocking; callers run them off the UI thread.
pub trait PersonStore: Send + Sync {
    /// All rows, ordered by last name then first name (absent names first).
    fn all_ordered(&self) -> Result<Vec<Person>, StoreError>;

    /// Single row by primary key. `StoreError::NotFound` when no row matches.
    fn by_id(&self, id: i64) -> Result<Person, StoreError>;

    /// Insert-or-replace the given rows by id.
    fn save_people(&self, people: &[Person]) -> Result<(), StoreError>;

    /// Remove every row.
    fn delete_all(&self) -> Result<(), StoreError>;
}
