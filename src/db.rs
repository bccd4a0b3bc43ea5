mod schema;

pub use schema::Database;

/// User account as surfaced to callers.
///
/// The stored credential never leaves the persistence layer through this
/// type; login flows use [`AccountCredentials`] instead.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique numeric account id.
    pub id: i64,
    /// Username for login (unique).
    pub username: String,
    /// Email address (unique).
    pub email: String,
}

/// Account row with its stored credential, for password verification only.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    /// Unique numeric account id.
    pub id: i64,
    /// Username for login.
    pub username: String,
    /// Argon2 password hash.
    pub password_hash: String,
}

/// Tracked book belonging to one account.
///
/// `is_read` is the sole discriminator between the wishlist and finished
/// shelves; rating and comment are only populated on finished rows.
#[derive(Debug, Clone)]
pub struct Book {
    /// Unique numeric book id.
    pub id: i64,
    /// Book title.
    pub title: String,
    /// Book author.
    pub author: String,
    /// Cover image URL (empty string when none was supplied).
    pub cover_image_url: String,
    /// Calendar date the book was added, `YYYY-MM-DD`.
    pub date_added: String,
    /// Owning account id.
    pub owner_id: i64,
    /// Whether the book has been read (finished shelf).
    pub is_read: bool,
    /// Rating, finished books only.
    pub rating: Option<i64>,
    /// Free-text comment, finished books only.
    pub comment: Option<String>,
}
