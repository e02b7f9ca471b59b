//! Run persistence.
//!
//! [`RunStore`] is the contract the service talks to, used as
//! `Arc<dyn RunStore>`. Two implementations ship:
//!
//! - [`SqliteRunStore`](sqlite::SqliteRunStore): one row per run in the `run`
//!   table, each operation a single statement.
//! - [`InMemoryRunStore`](memory::InMemoryRunStore): an ordered map, used by
//!   tests and throwaway instances.
//!
//! Stores carry no validation logic. Absent rows are reported through
//! `Option`/`bool` return values, never as errors; the only store-level
//! failure a caller should expect is [`Error::DuplicateKey`](crate::Error::DuplicateKey)
//! from [`create`](RunStore::create).

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::Result;
use crate::run::{Location, Run};

pub use memory::InMemoryRunStore;
pub use sqlite::SqliteRunStore;

#[async_trait]
pub trait RunStore: Send + Sync {
    /// Every stored run, ordered by id.
    async fn find_all(&self) -> Result<Vec<Run>>;

    /// Stored runs whose location equals `location`, ordered by id.
    async fn find_all_by_location(&self, location: Location) -> Result<Vec<Run>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Run>>;

    /// Inserts `run` and returns its id.
    ///
    /// When `run.id` is `None` the store assigns one. Fails with
    /// [`Error::DuplicateKey`](crate::Error::DuplicateKey) if the id is taken.
    async fn create(&self, run: &Run) -> Result<i64>;

    /// Replaces every column of the row whose id equals `run.id`.
    ///
    /// Returns `false` when no such row exists; nothing is written then.
    /// A run without an id is rejected as invalid input.
    async fn update(&self, run: &Run) -> Result<bool>;

    /// Removes the row with the given id. Returns `false` if it was absent.
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn count(&self) -> Result<usize>;
}
