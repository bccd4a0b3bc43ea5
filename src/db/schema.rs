use crate::db::{Account, AccountCredentials, Book};
use crate::error::{AppError, Result};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Arc;

/// Database wrapper for thread-safe access.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

/// Map a rusqlite error onto the application taxonomy.
///
/// A racing insert can pass the uniqueness pre-check and still hit the
/// UNIQUE constraint; that must surface as a conflict, not a storage fault.
fn storage_err(e: rusqlite::Error) -> AppError {
    if e.to_string().contains("UNIQUE constraint") {
        AppError::Conflict("Username or email already taken".to_string())
    } else {
        AppError::Storage(e.to_string())
    }
}

impl Database {
    /// Open or create database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| AppError::Storage(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.initialize_schema()?;
        Ok(db)
    }

    /// Open in-memory database (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Storage(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- Users table
            CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL
            );

            -- Books table
            CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                cover_image_url TEXT NOT NULL DEFAULT '',
                date_added TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                is_read INTEGER NOT NULL DEFAULT 0,
                rating INTEGER,
                comment TEXT,
                FOREIGN KEY (user_id) REFERENCES users(user_id) ON DELETE CASCADE
            );

            -- Indexes
            CREATE INDEX IF NOT EXISTS idx_books_user ON books(user_id, is_read);
            "#,
        )
        .map_err(|e| AppError::Storage(format!("Failed to initialize schema: {}", e)))?;

        Ok(())
    }

    // ========== ACCOUNT OPERATIONS ==========

    /// Check whether an account with the given id exists.
    pub fn account_exists(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM users WHERE user_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .map_err(storage_err)?;
        Ok(count > 0)
    }

    /// Get account by id (username and email only).
    pub fn find_account_by_id(&self, id: i64) -> Result<Option<Account>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT user_id, username, email FROM users WHERE user_id = ?1",
            params![id],
            |row| {
                Ok(Account {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    email: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(storage_err)
    }

    /// Get account credentials by email, for login.
    pub fn find_account_by_email(&self, email: &str) -> Result<Option<AccountCredentials>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT user_id, username, password_hash FROM users WHERE email = ?1",
            params![email],
            |row| {
                Ok(AccountCredentials {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password_hash: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(storage_err)
    }

    /// Check whether any row matches the username OR the email.
    ///
    /// `exclude` skips one row, so that an account updated to its own
    /// unchanged username or email does not collide with itself.
    pub fn username_or_email_taken(
        &self,
        username: &str,
        email: &str,
        exclude: Option<i64>,
    ) -> Result<bool> {
        let conn = self.conn.lock();
        let count: i64 = match exclude {
            Some(id) => conn.query_row(
                "SELECT COUNT(*) FROM users WHERE (username = ?1 OR email = ?2) AND user_id != ?3",
                params![username, email, id],
                |row| row.get(0),
            ),
            None => conn.query_row(
                "SELECT COUNT(*) FROM users WHERE username = ?1 OR email = ?2",
                params![username, email],
                |row| row.get(0),
            ),
        }
        .map_err(storage_err)?;
        Ok(count > 0)
    }

    /// Insert a new account and return its id.
    pub fn insert_account(&self, username: &str, password_hash: &str, email: &str) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO users (username, password_hash, email) VALUES (?1, ?2, ?3)",
            params![username, password_hash, email],
        )
        .map_err(storage_err)?;
        Ok(conn.last_insert_rowid())
    }

    /// Overwrite all mutable account fields.
    pub fn update_account(
        &self,
        id: i64,
        username: &str,
        password_hash: &str,
        email: &str,
    ) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE users SET username = ?1, password_hash = ?2, email = ?3 WHERE user_id = ?4",
            params![username, password_hash, email, id],
        )
        .map_err(storage_err)?;
        Ok(())
    }

    /// Update username and email, leaving the credential untouched.
    pub fn update_account_profile(&self, id: i64, username: &str, email: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE users SET username = ?1, email = ?2 WHERE user_id = ?3",
            params![username, email, id],
        )
        .map_err(storage_err)?;
        Ok(())
    }

    /// Update the stored credential only.
    pub fn update_account_password(&self, id: i64, password_hash: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE users SET password_hash = ?1 WHERE user_id = ?2",
            params![password_hash, id],
        )
        .map_err(storage_err)?;
        Ok(())
    }

    /// Delete an account.
    pub fn delete_account(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM users WHERE user_id = ?1", params![id])
            .map_err(storage_err)?;
        Ok(())
    }

    // ========== BOOK OPERATIONS ==========

    /// Insert a book row and return its id.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_book(
        &self,
        owner_id: i64,
        title: &str,
        author: &str,
        cover_image_url: &str,
        date_added: &str,
        is_read: bool,
        rating: Option<i64>,
        comment: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO books (title, author, cover_image_url, date_added, user_id, is_read, rating, comment)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                title,
                author,
                cover_image_url,
                date_added,
                owner_id,
                is_read,
                rating,
                comment,
            ],
        )
        .map_err(storage_err)?;
        Ok(conn.last_insert_rowid())
    }

    /// List one shelf for an owner, oldest first.
    pub fn list_books(&self, owner_id: i64, is_read: bool) -> Result<Vec<Book>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, title, author, cover_image_url, date_added, user_id, is_read, rating, comment
                 FROM books WHERE user_id = ?1 AND is_read = ?2 ORDER BY id",
            )
            .map_err(storage_err)?;

        let rows = stmt
            .query_map(params![owner_id, is_read], |row| {
                Ok(Book {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    author: row.get(2)?,
                    cover_image_url: row.get(3)?,
                    date_added: row.get(4)?,
                    owner_id: row.get(5)?,
                    is_read: row.get(6)?,
                    rating: row.get(7)?,
                    comment: row.get(8)?,
                })
            })
            .map_err(storage_err)?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage_err)
    }

    /// Get the owning account id of a book, or `None` if the book is absent.
    ///
    /// Doubles as the existence probe for the finish transition.
    pub fn book_owner(&self, book_id: i64) -> Result<Option<i64>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT user_id FROM books WHERE id = ?1",
            params![book_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(storage_err)
    }

    /// Move a book to the finished shelf, overwriting rating and comment.
    pub fn mark_book_finished(&self, book_id: i64, rating: i64, comment: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE books SET is_read = 1, rating = ?1, comment = ?2 WHERE id = ?3",
            params![rating, comment, book_id],
        )
        .map_err(storage_err)?;
        Ok(())
    }
}
