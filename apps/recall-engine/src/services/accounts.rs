//! User accounts and login.

use recall_core::credential::{hash_password, verify_password};
use recall_core::types::{require_text, User, UserId, UserTotals};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, StoreHandle, UserRepository};
use crate::error::{Result, StudyError};
use crate::services::existing_user;

/// Requested account changes. Missing or blank fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub struct Accounts {
    store: StoreHandle,
}

impl Accounts {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    pub fn create_user(&self, username: &str, email: &str, password: &str) -> Result<UserId> {
        require_text("username", username)?;
        require_text("email", email)?;
        require_text("password", password)?;
        let username = username.trim();
        let email = email.trim();
        let credential = hash_password(password)?;

        let user_id = self
            .store
            .with(|repo| repo.create_user(username, email, &credential))?;
        tracing::info!(user_id, username, "created user");
        Ok(user_id)
    }

    pub fn get_user(&self, user_id: UserId) -> Result<User> {
        self.store
            .with(|repo| repo.get_user(user_id))?
            .ok_or_else(|| StudyError::not_found("user", user_id))
    }

    /// Check a username/password pair. Unknown users and wrong passwords fail alike.
    pub fn verify_login(&self, username: &str, password: &str) -> Result<UserId> {
        let user = self
            .store
            .with(|repo| repo.find_user_by_username(username.trim()))?;
        match user {
            Some(user) if verify_password(password, &user.credential) => {
                tracing::debug!(user_id = user.user_id, "login accepted");
                Ok(user.user_id)
            }
            _ => {
                tracing::warn!(username, "login rejected");
                Err(StudyError::AuthFailure)
            }
        }
    }

    pub fn update_user(&self, user_id: UserId, update: &UserUpdate) -> Result<User> {
        let credential = provided(&update.password).map(hash_password).transpose()?;

        let user = self.store.transaction(|repo| {
            let mut user = repo
                .get_user(user_id)?
                .ok_or_else(|| DbError::not_found("user", user_id))?;
            if let Some(username) = provided(&update.username) {
                user.username = username.to_string();
            }
            if let Some(email) = provided(&update.email) {
                user.email = email.to_string();
            }
            if let Some(credential) = &credential {
                user.credential = credential.clone();
            }
            repo.update_user(&user)?;
            Ok(user)
        })?;
        tracing::info!(user_id, "updated user");
        Ok(user)
    }

    /// Delete a user with every deck, card, schedule row and session they own.
    pub fn delete_user(&self, user_id: UserId) -> Result<()> {
        if !self.store.with(|repo| repo.delete_user(user_id))? {
            return Err(StudyError::not_found("user", user_id));
        }
        tracing::info!(user_id, "deleted user");
        Ok(())
    }

    pub fn user_totals(&self, user_id: UserId) -> Result<UserTotals> {
        self.store
            .transaction(|repo| {
                existing_user(repo, user_id)?;
                repo.user_totals(user_id)
            })
            .map_err(Into::into)
    }
}
