//! Per-component connection handle.
//!
//! Each engine component owns one [`StoreHandle`]. Calls take the handle's
//! lock for their whole duration, so the connection is released on every
//! exit path when the guard drops.

use std::sync::Mutex;
use std::time::Duration;

use crate::config::StoreLocation;
use crate::db::error::DbError;
use crate::db::repository::SqliteRepository;

pub struct StoreHandle {
    component: &'static str,
    repo: Mutex<SqliteRepository>,
}

impl StoreHandle {
    pub fn open(
        component: &'static str,
        location: &StoreLocation,
        busy_timeout: Duration,
    ) -> Result<Self, DbError> {
        let repo = SqliteRepository::open(location, busy_timeout)?;
        tracing::debug!(component, "opened store connection");
        Ok(Self {
            component,
            repo: Mutex::new(repo),
        })
    }

    /// Run `op` against the connection, retrying once on a busy or locked store.
    pub fn with<T>(&self, op: impl Fn(&SqliteRepository) -> Result<T, DbError>) -> Result<T, DbError> {
        let repo = self
            .repo
            .lock()
            .map_err(|_| DbError::Poisoned(self.component))?;
        match op(&*repo) {
            Err(e) if e.is_transient() => {
                tracing::warn!(component = self.component, error = %e, "store busy, retrying once");
                op(&*repo)
            }
            other => other,
        }
    }

    /// Like [`with`](Self::with), with `op` wrapped in a single transaction.
    pub fn transaction<T>(
        &self,
        op: impl Fn(&SqliteRepository) -> Result<T, DbError>,
    ) -> Result<T, DbError> {
        self.with(|repo| repo.transaction(&op))
    }
}
