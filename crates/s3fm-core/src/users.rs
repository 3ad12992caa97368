//! Cached user directory.
//!
//! The directory maps usernames to a password and a root folder. It is read
//! from the secret store on first use and kept for the life of the process.
//! An empty table counts as "not loaded" and is fetched again on the next
//! request.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use s3fm_model::FileError;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::secrets::SecretStore;

/// A single user's credentials and storage root.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Plaintext password compared against Basic credentials.
    pub password: String,
    /// Prefix every key of this user lives under (normally ends with `/`).
    pub root_folder: String,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("password", &"<redacted>")
            .field("root_folder", &self.root_folder)
            .finish()
    }
}

/// Username to record.
pub type UserTable = HashMap<String, UserRecord>;

/// Lazily loaded, process-wide user table.
pub struct UserDirectory {
    secrets: Arc<dyn SecretStore>,
    secret_name: String,
    cached: ArcSwapOption<UserTable>,
}

impl fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDirectory")
            .field("secret_name", &self.secret_name)
            .field(
                "cached_users",
                &self.cached.load_full().map(|users| users.len()),
            )
            .finish_non_exhaustive()
    }
}

impl UserDirectory {
    /// Create a directory reading the secret called `secret_name`.
    #[must_use]
    pub fn new(secrets: Arc<dyn SecretStore>, secret_name: impl Into<String>) -> Self {
        Self {
            secrets,
            secret_name: secret_name.into(),
            cached: ArcSwapOption::empty(),
        }
    }

    /// Name of the backing secret.
    #[must_use]
    pub fn secret_name(&self) -> &str {
        &self.secret_name
    }

    /// Return the user table, fetching it when nothing non-empty is cached.
    ///
    /// Concurrent first requests may each fetch; the last write wins.
    ///
    /// # Errors
    ///
    /// Fails when the secret cannot be fetched or is not a valid user table.
    pub async fn users(&self) -> Result<Arc<UserTable>, FileError> {
        if let Some(users) = self.cached.load_full() {
            if !users.is_empty() {
                return Ok(users);
            }
        }
        self.refresh().await
    }

    /// Fetch and parse the secret unconditionally, replacing the cache.
    ///
    /// # Errors
    ///
    /// Fails when the secret cannot be fetched or is not a valid user table.
    pub async fn refresh(&self) -> Result<Arc<UserTable>, FileError> {
        let raw = self.secrets.get_secret_string(&self.secret_name).await?;
        let users: UserTable = serde_json::from_str(&raw).map_err(|e| {
            FileError::internal(format!("Invalid user directory document: {e}")).with_source(e)
        })?;
        let users = Arc::new(users);
        self.cached.store(Some(Arc::clone(&users)));
        info!(secret = %self.secret_name, users = users.len(), "loaded user directory");
        Ok(users)
    }

    /// Drop the cached table so the next lookup fetches again.
    pub fn invalidate(&self) {
        self.cached.store(None);
    }

    /// Whether a table is currently cached.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.cached.load().is_some()
    }
}
