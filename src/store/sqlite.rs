//! SQLite-backed run store.
//!
//! The connection sits behind a mutex and every statement runs on tokio's
//! blocking pool, so a slow disk never stalls the async workers serving other
//! requests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension, Row, ToSql};
use tracing::debug;

use crate::error::{Error, Result};
use crate::run::{Location, Run};
use crate::sqlite::SqliteConfig;

use super::RunStore;

const SELECT_RUN: &str =
    "SELECT id, title, started_on, completed_on, miles, location, version FROM run";

impl ToSql for Location {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Location {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: Error| FromSqlError::Other(Box::new(e)))
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<Run> {
    Ok(Run {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        started_on: row.get(2)?,
        completed_on: row.get(3)?,
        miles: row.get(4)?,
        location: row.get(5)?,
        version: row.get(6)?,
    })
}

#[derive(Clone)]
pub struct SqliteRunStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRunStore {
    /// Opens the database described by `config` and applies its schema.
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        Ok(Self::from_connection(config.open()?))
    }

    /// Like [`SqliteRunStore::open`], but opens the file and applies the schema
    /// on the blocking pool.
    pub async fn connect(config: SqliteConfig) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::open(&config))
            .await
            .map_err(|e| Error::Storage(format!("sqlite open task failed: {e}")))?
    }

    /// Wraps a connection whose schema is already in place.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| Error::Storage("sqlite connection lock poisoned".to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| Error::Storage(format!("sqlite task failed: {e}")))?
    }
}

#[async_trait]
impl RunStore for SqliteRunStore {
    async fn find_all(&self) -> Result<Vec<Run>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_RUN} ORDER BY id"))?;
            let runs = stmt
                .query_map([], run_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(runs)
        })
        .await
    }

    async fn find_all_by_location(&self, location: Location) -> Result<Vec<Run>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_RUN} WHERE location = ?1 ORDER BY id"))?;
            let runs = stmt
                .query_map([location], run_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(runs)
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Run>> {
        self.with_conn(move |conn| {
            let run = conn
                .query_row(&format!("{SELECT_RUN} WHERE id = ?1"), [id], run_from_row)
                .optional()?;
            Ok(run)
        })
        .await
    }

    async fn create(&self, run: &Run) -> Result<i64> {
        let run = run.clone();
        self.with_conn(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO run (id, title, started_on, completed_on, miles, location, version)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    run.id,
                    run.title,
                    run.started_on,
                    run.completed_on,
                    run.miles,
                    run.location,
                    run.version
                ],
            );
            match inserted {
                Ok(_) => {
                    let id = run.id.unwrap_or_else(|| conn.last_insert_rowid());
                    debug!(id, "inserted run");
                    Ok(id)
                }
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation
                        && err.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
                {
                    Err(Error::DuplicateKey {
                        id: run.id.unwrap_or_default(),
                    })
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn update(&self, run: &Run) -> Result<bool> {
        let id = run
            .id
            .ok_or_else(|| Error::InvalidInput("cannot update a run without an id".to_string()))?;
        let run = run.clone();
        self.with_conn(move |conn| {
            let updated = conn.execute(
                "UPDATE run
                 SET title = ?2, started_on = ?3, completed_on = ?4, miles = ?5,
                     location = ?6, version = ?7
                 WHERE id = ?1",
                params![
                    id,
                    run.title,
                    run.started_on,
                    run.completed_on,
                    run.miles,
                    run.location,
                    run.version
                ],
            )?;
            debug!(id, updated, "updated run");
            Ok(updated > 0)
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.with_conn(move |conn| {
            let deleted = conn.execute("DELETE FROM run WHERE id = ?1", [id])?;
            debug!(id, deleted, "deleted run");
            Ok(deleted > 0)
        })
        .await
    }

    async fn count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM run", [], |row| row.get(0))?;
            Ok(usize::try_from(count).unwrap_or_default())
        })
        .await
    }
}
