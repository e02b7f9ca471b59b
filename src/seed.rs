//! Startup seeding from a JSON document of the form `{"runs": [Run, ...]}`.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::run::Run;
use crate::service::RunService;

#[derive(Debug, Deserialize)]
struct SeedDocument {
    runs: Vec<Run>,
}

/// Reads and parses a seed document.
pub async fn load_seed_file(path: &Path) -> Result<Vec<Run>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::Storage(format!("failed to read seed file {}: {e}", path.display())))?;
    let document: SeedDocument = serde_json::from_slice(&bytes)
        .map_err(|e| Error::InvalidInput(format!("malformed seed file {}: {e}", path.display())))?;
    Ok(document.runs)
}

/// Creates `runs` in order if the store holds no runs yet.
///
/// Every run is validated before the first one is stored, so a bad entry
/// leaves the store empty. Returns how many runs were created; a non-empty
/// store is left alone and yields `0`.
pub async fn seed_if_empty(service: &RunService, runs: Vec<Run>) -> Result<usize> {
    let existing = service.store().count().await?;
    if existing > 0 {
        info!(existing, "store already holds runs, skipping seed");
        return Ok(0);
    }
    for run in &runs {
        run.validate()?;
    }
    let total = runs.len();
    for run in runs {
        service.create(run).await?;
    }
    info!(total, "seeded runs");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::store::InMemoryRunStore;

    const SEED: &str = r#"{
        "runs": [
            {"id": 1, "title": "Noon Run", "startedOn": "2024-02-20T12:00:00",
             "completedOn": "2024-02-20T12:40:00", "miles": 5, "location": "OUTDOOR"},
            {"id": 2, "title": "Treadmill", "startedOn": "2024-02-21T06:00:00",
             "completedOn": null, "miles": 2.5, "location": "INDOOR", "version": null}
        ]
    }"#;

    #[tokio::test]
    async fn test_seeds_empty_store_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.json");
        std::fs::write(&path, SEED).unwrap();

        let service = RunService::new(Arc::new(InMemoryRunStore::new()));
        let runs = load_seed_file(&path).await.unwrap();
        assert_eq!(runs.len(), 2);

        assert_eq!(seed_if_empty(&service, runs.clone()).await.unwrap(), 2);
        assert_eq!(seed_if_empty(&service, runs).await.unwrap(), 0);
        assert_eq!(service.list_all().await.unwrap().len(), 2);
        assert_eq!(service.get_by_id(2).await.unwrap().title, "Treadmill");
    }

    #[tokio::test]
    async fn test_invalid_entry_seeds_nothing() {
        let service = RunService::new(Arc::new(InMemoryRunStore::new()));
        let mut runs: Vec<Run> = serde_json::from_str::<SeedDocument>(SEED).unwrap().runs;
        runs[1].miles = 0.0;

        let err = seed_if_empty(&service, runs.clone()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(service.store().count().await.unwrap(), 0);

        // A corrected document still seeds on the next attempt
        runs[1].miles = 2.5;
        assert_eq!(seed_if_empty(&service, runs).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_bundled_seed_file_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/runs.json");
        let runs = load_seed_file(&path).await.unwrap();
        assert_eq!(runs.len(), 3);
        assert!(runs.iter().all(|run| run.validate().is_ok()));
    }

    #[tokio::test]
    async fn test_missing_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_seed_file(&dir.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[tokio::test]
    async fn test_malformed_file_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.json");
        std::fs::write(&path, r#"{"runs": [{"title": "no start"}]}"#).unwrap();
        let err = load_seed_file(&path).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
