//! Run tracking service backed by SQLite.
//!
//! # Intention
//!
//! - Serve a REST resource over recorded runs at `/api/runs`.
//! - Keep persistence behind the [`RunStore`] trait so the service never
//!   depends on a particular engine.
//! - Offer a read-only client for a remote user directory.
//!
//! # Architectural Boundaries
//!
//! - Validation and not-found handling live in [`RunService`]; stores only
//!   translate calls into statements.
//! - SQLite specifics (schema, connection, row mapping) stay in [`sqlite`] and
//!   [`store::sqlite`].
//! - The user client shares nothing with the run modules.

pub mod config;
pub mod error;
pub mod handlers;
pub mod run;
pub mod seed;
pub mod server;
pub mod service;
pub mod sqlite;
pub mod store;
pub mod user;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use run::{Location, Run};
pub use server::{router, RunServer};
pub use service::RunService;
pub use sqlite::{Schema, SqliteConfig};
pub use store::{InMemoryRunStore, RunStore, SqliteRunStore};
pub use user::{User, UserClient};
