//! Application state shared across handlers.

use crate::account::AccountService;
use crate::auth::AuthService;
use crate::config::Config;
use crate::db::Database;
use crate::library::LibraryService;
use std::sync::Arc;

/// Shared application state.
///
/// The services receive their configuration and database handle explicitly
/// at construction; nothing here is process-global.
#[derive(Clone)]
pub struct AppState {
    /// Account manager.
    pub accounts: Arc<AccountService>,
    /// Session issuer.
    pub auth: Arc<AuthService>,
    /// Library tracker.
    pub library: Arc<LibraryService>,
}

impl AppState {
    /// Create new application state with database.
    pub fn new(config: &Config, db: Database) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(db.clone())),
            auth: Arc::new(AuthService::new(
                db.clone(),
                config.auth.secret_key.clone(),
                config.auth.token_days,
            )),
            library: Arc::new(LibraryService::new(db)),
        }
    }
}
