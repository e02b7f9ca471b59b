//! The run resource service: validation in front of a [`RunStore`].
//!
//! Absent rows, which stores report as `None`/`false`, become
//! [`Error::NotFound`] here so every lookup-by-id operation fails the same way.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::run::{Location, Run};
use crate::store::RunStore;

#[derive(Clone)]
pub struct RunService {
    store: Arc<dyn RunStore>,
}

impl RunService {
    pub fn new(store: Arc<dyn RunStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RunStore> {
        &self.store
    }

    pub async fn list_all(&self) -> Result<Vec<Run>> {
        self.store.find_all().await
    }

    /// Lists runs at `location`, given as its text name (case-insensitive).
    pub async fn list_by_location(&self, location: &str) -> Result<Vec<Run>> {
        let location: Location = location.parse()?;
        self.store.find_all_by_location(location).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Run> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(Error::NotFound { id })
    }

    /// Validates and stores a new run, returning its id.
    pub async fn create(&self, run: Run) -> Result<i64> {
        run.validate()?;
        let id = self.store.create(&run).await?;
        info!(id, title = %run.title, "created run");
        Ok(id)
    }

    /// Replaces the run stored under `id`.
    ///
    /// `id` is authoritative. A body carrying a different id is rejected; a
    /// body without one takes `id`.
    pub async fn update(&self, id: i64, run: Run) -> Result<()> {
        if let Some(body_id) = run.id {
            if body_id != id {
                warn!(id, body_id, "rejected update with mismatched id");
                return Err(Error::InvalidInput(format!(
                    "body id {body_id} does not match path id {id}"
                )));
            }
        }
        run.validate()?;
        if !self.store.update(&run.with_id(id)).await? {
            return Err(Error::NotFound { id });
        }
        info!(id, "updated run");
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(Error::NotFound { id });
        }
        info!(id, "deleted run");
        Ok(())
    }
}
