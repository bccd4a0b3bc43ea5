//! Library tracker: per-account wishlist and finished shelves.

use crate::db::{Book, Database};
use crate::error::{AppError, Result};

/// Target shelf for a new book, selected explicitly by the caller's intent.
#[derive(Debug, Clone)]
pub enum Shelf {
    /// Not yet read; rating and comment stay unpopulated.
    Wishlist,
    /// Already read, with rating and comment attached.
    Finished {
        /// Rating given by the owner.
        rating: i64,
        /// Free-text comment.
        comment: String,
    },
}

/// A book to add to an account's library.
#[derive(Debug, Clone)]
pub struct NewBook {
    /// Book title.
    pub title: String,
    /// Book author.
    pub author: String,
    /// Cover image URL; defaults to empty string when absent.
    pub cover_image: Option<String>,
    /// Which shelf the book lands on.
    pub shelf: Shelf,
}

/// Library tracker for one relational store.
pub struct LibraryService {
    db: Database,
}

impl LibraryService {
    /// Create a new library service.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Append a book to an account's library.
    ///
    /// The add-date is service-assigned: the current calendar date, no time
    /// component.
    pub fn add_book(&self, owner_id: i64, book: NewBook) -> Result<i64> {
        let date_added = chrono::Local::now().format("%Y-%m-%d").to_string();
        let cover = book.cover_image.unwrap_or_default();

        let (is_read, rating, comment) = match &book.shelf {
            Shelf::Wishlist => (false, None, None),
            Shelf::Finished { rating, comment } => (true, Some(*rating), Some(comment.as_str())),
        };

        self.db.insert_book(
            owner_id,
            &book.title,
            &book.author,
            &cover,
            &date_added,
            is_read,
            rating,
            comment,
        )
    }

    /// List an account's wishlist. Empty is a valid result.
    pub fn wishlist(&self, owner_id: i64) -> Result<Vec<Book>> {
        self.db.list_books(owner_id, false)
    }

    /// List an account's finished shelf, ratings and comments included.
    pub fn finished(&self, owner_id: i64) -> Result<Vec<Book>> {
        self.db.list_books(owner_id, true)
    }

    /// Move a book to the finished shelf, attaching rating and comment.
    ///
    /// Idempotent: finishing an already-finished book overwrites its rating
    /// and comment again. A book owned by a different account is reported
    /// as not-found rather than revealed.
    pub fn complete_book(
        &self,
        owner_id: i64,
        book_id: i64,
        rating: i64,
        comment: &str,
    ) -> Result<()> {
        match self.db.book_owner(book_id)? {
            Some(owner) if owner == owner_id => {
                self.db.mark_book_finished(book_id, rating, comment)
            }
            _ => Err(AppError::NotFound("Book not found".to_string())),
        }
    }
}
