//! Account management: registration, lookup, update, delete.

use crate::auth;
use crate::db::{Account, Database};
use crate::error::{AppError, Result};

/// Maximum username length in characters.
pub const MAX_USERNAME_LEN: usize = 32;
/// Maximum password length in characters.
pub const MAX_PASSWORD_LEN: usize = 128;
/// Maximum email length in characters.
pub const MAX_EMAIL_LEN: usize = 64;

/// Parse a numeric id surfaced to callers as a string.
pub fn parse_id(id: &str) -> Result<i64> {
    id.parse()
        .map_err(|_| AppError::Validation(format!("Invalid id: {}", id)))
}

/// Account manager with uniqueness-constrained creation and mutation.
pub struct AccountService {
    db: Database,
}

impl AccountService {
    /// Create a new account service.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn validate_lengths(username: &str, password: &str, email: &str) -> Result<()> {
        if username.chars().count() > MAX_USERNAME_LEN
            || password.chars().count() > MAX_PASSWORD_LEN
            || email.chars().count() > MAX_EMAIL_LEN
        {
            return Err(AppError::Validation(
                "Too long username, password or email".to_string(),
            ));
        }
        Ok(())
    }

    /// Reconcile the path id with an optional caller-supplied body id.
    ///
    /// A body id that disagrees with the path is rejected; an omitted one
    /// defaults to the path id.
    fn reconcile_id(path_id: i64, body_id: Option<&str>) -> Result<i64> {
        match body_id {
            Some(id) if !id.is_empty() => {
                let id = parse_id(id)?;
                if id != path_id {
                    return Err(AppError::Validation(
                        "Path id and body id are different".to_string(),
                    ));
                }
                Ok(id)
            }
            _ => Ok(path_id),
        }
    }

    /// Register a new account and return it read back from storage.
    ///
    /// The credential is hashed before it reaches storage and is never
    /// echoed back.
    pub fn register(&self, username: &str, password: &str, email: &str) -> Result<Account> {
        Self::validate_lengths(username, password, email)?;

        if self.db.username_or_email_taken(username, email, None)? {
            return Err(AppError::Conflict(
                "Username or email already taken".to_string(),
            ));
        }

        let password_hash = auth::hash_password(password)?;
        let id = self.db.insert_account(username, &password_hash, email)?;

        self.db
            .find_account_by_id(id)?
            .ok_or_else(|| AppError::Storage("Account vanished after insert".to_string()))
    }

    /// Get an account by id (username and email only).
    ///
    /// Probes existence first so an absent id is reported as not-found
    /// rather than a generic read failure.
    pub fn get(&self, id: i64) -> Result<Account> {
        if !self.db.account_exists(id)? {
            return Err(AppError::NotFound("Account not found".to_string()));
        }

        self.db
            .find_account_by_id(id)?
            .ok_or_else(|| AppError::Storage("Account vanished after probe".to_string()))
    }

    /// Overwrite all mutable fields of an account, password included, even
    /// when the caller sent an empty string.
    pub fn replace(
        &self,
        path_id: i64,
        body_id: Option<&str>,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<()> {
        let id = Self::reconcile_id(path_id, body_id)?;

        if !self.db.account_exists(id)? {
            return Err(AppError::NotFound("Account not found".to_string()));
        }

        Self::validate_lengths(username, password, email)?;

        if self.db.username_or_email_taken(username, email, Some(id))? {
            return Err(AppError::Conflict(
                "Username or email already taken".to_string(),
            ));
        }

        let password_hash = auth::hash_password(password)?;
        self.db.update_account(id, username, &password_hash, email)
    }

    /// Partially update an account.
    ///
    /// Empty username/email fall back to the stored values; the password is
    /// only overwritten when the caller supplied a non-empty one, issued as
    /// a separate update statement.
    pub fn update(
        &self,
        path_id: i64,
        body_id: Option<&str>,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<()> {
        let id = Self::reconcile_id(path_id, body_id)?;

        if !self.db.account_exists(id)? {
            return Err(AppError::NotFound("Account not found".to_string()));
        }

        Self::validate_lengths(username, password, email)?;

        if self.db.username_or_email_taken(username, email, Some(id))? {
            return Err(AppError::Conflict(
                "Username or email already taken".to_string(),
            ));
        }

        let current = self
            .db
            .find_account_by_id(id)?
            .ok_or_else(|| AppError::Storage("Account vanished after probe".to_string()))?;

        let username = if username.is_empty() {
            current.username.as_str()
        } else {
            username
        };
        let email = if email.is_empty() {
            current.email.as_str()
        } else {
            email
        };

        self.db.update_account_profile(id, username, email)?;

        if !password.is_empty() {
            let password_hash = auth::hash_password(password)?;
            self.db.update_account_password(id, &password_hash)?;
        }

        Ok(())
    }

    /// Delete an account. Immediate and irreversible.
    pub fn delete(&self, id: i64) -> Result<()> {
        if !self.db.account_exists(id)? {
            return Err(AppError::NotFound("Account not found".to_string()));
        }

        self.db.delete_account(id)
    }
}
