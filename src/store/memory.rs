//! In-memory run store.
//!
//! Runs live in a `BTreeMap` keyed by id behind a `parking_lot::RwLock`, so
//! listings come back in id order just like the SQLite store. Assigned ids
//! follow SQLite's rowid rule: one past the largest id currently stored. Once
//! `i64::MAX` is taken, the lowest unused positive id is handed out instead.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::run::{Location, Run};

use super::RunStore;

#[derive(Debug, Default)]
pub struct InMemoryRunStore {
    runs: RwLock<BTreeMap<i64, Run>>,
}

impl InMemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(runs: &BTreeMap<i64, Run>) -> Result<i64> {
    let Some(max) = runs.keys().next_back() else {
        return Ok(1);
    };
    match max.checked_add(1) {
        Some(id) => Ok(id),
        None => (1..i64::MAX)
            .find(|id| !runs.contains_key(id))
            .ok_or_else(|| Error::Storage("run id space exhausted".to_string())),
    }
}

#[async_trait]
impl RunStore for InMemoryRunStore {
    async fn find_all(&self) -> Result<Vec<Run>> {
        Ok(self.runs.read().values().cloned().collect())
    }

    async fn find_all_by_location(&self, location: Location) -> Result<Vec<Run>> {
        Ok(self
            .runs
            .read()
            .values()
            .filter(|run| run.location == location)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Run>> {
        Ok(self.runs.read().get(&id).cloned())
    }

    async fn create(&self, run: &Run) -> Result<i64> {
        let mut runs = self.runs.write();
        let id = match run.id {
            Some(id) if runs.contains_key(&id) => return Err(Error::DuplicateKey { id }),
            Some(id) => id,
            None => next_id(&runs)?,
        };
        runs.insert(id, run.clone().with_id(id));
        Ok(id)
    }

    async fn update(&self, run: &Run) -> Result<bool> {
        let id = run
            .id
            .ok_or_else(|| Error::InvalidInput("cannot update a run without an id".to_string()))?;
        let mut runs = self.runs.write();
        match runs.get_mut(&id) {
            Some(stored) => {
                *stored = run.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.runs.write().remove(&id).is_some())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.runs.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn run(id: Option<i64>, location: Location) -> Run {
        let started = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(6, 30, 0)
            .unwrap();
        Run::new(id, "Tempo", started, None, 4.0, location)
    }

    #[tokio::test]
    async fn test_assigns_next_id_after_largest() {
        let store = InMemoryRunStore::new();
        assert_eq!(store.create(&run(None, Location::Indoor)).await.unwrap(), 1);
        assert_eq!(store.create(&run(Some(10), Location::Indoor)).await.unwrap(), 10);
        assert_eq!(store.create(&run(None, Location::Outdoor)).await.unwrap(), 11);

        let stored = store.find_by_id(11).await.unwrap().unwrap();
        assert_eq!(stored.id, Some(11));
    }

    #[tokio::test]
    async fn test_assigns_free_id_once_largest_id_is_taken() {
        let store = InMemoryRunStore::new();
        let max = store.create(&run(Some(i64::MAX), Location::Indoor)).await.unwrap();
        assert_eq!(max, i64::MAX);
        store.create(&run(Some(1), Location::Indoor)).await.unwrap();

        let id = store.create(&run(None, Location::Outdoor)).await.unwrap();
        assert_eq!(id, 2);
        assert_eq!(store.count().await.unwrap(), 3);
        let stored = store.find_by_id(i64::MAX).await.unwrap().unwrap();
        assert_eq!(stored.location, Location::Indoor);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let store = InMemoryRunStore::new();
        store.create(&run(Some(5), Location::Indoor)).await.unwrap();
        let err = store.create(&run(Some(5), Location::Outdoor)).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { id: 5 }));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_report_absent_rows() {
        let store = InMemoryRunStore::new();
        assert!(!store.update(&run(Some(1), Location::Indoor)).await.unwrap());
        assert!(!store.delete(1).await.unwrap());
        assert!(store.find_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_without_id_is_invalid() {
        let store = InMemoryRunStore::new();
        let err = store.update(&run(None, Location::Indoor)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
