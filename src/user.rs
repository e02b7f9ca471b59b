//! Read-only client for a remote user directory.
//!
//! Two GET endpoints, `/users` and `/users/{id}`, each answered with JSON.
//! No caching and no retries; transport and decoding failures surface as
//! [`Error::Remote`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Base URL of the public user directory the client talks to by default.
pub const DEFAULT_USERS_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// A user as published by the remote directory. Extra fields in the payload
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct UserClient {
    base_url: String,
    client: reqwest::Client,
}

impl UserClient {
    /// Create a client targeting the given base URL
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn find_all(&self) -> Result<Vec<User>> {
        let url = format!("{}/users", self.base_url);
        debug!(%url, "fetching users");
        let users = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<User> {
        let url = format!("{}/users/{id}", self.base_url);
        debug!(%url, "fetching user");
        let user = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(user)
    }
}

impl Default for UserClient {
    fn default() -> Self {
        Self::new(DEFAULT_USERS_BASE_URL)
    }
}
