//! HTTP request handlers.

use crate::account::parse_id;
use crate::db::{Account, Book};
use crate::error::Result;
use crate::library::{NewBook, Shelf};
use crate::server::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// ACCOUNTS
// ============================================================================

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    username: String,
    password: String,
    email: String,
}

/// Account response. The credential is never part of it.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    user_id: String,
    username: String,
    email: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            user_id: account.id.to_string(),
            username: account.username,
            email: account.email,
        }
    }
}

/// Account update request, for both full and partial updates.
#[derive(Debug, Deserialize)]
pub struct AccountUpdateRequest {
    user_id: Option<String>,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    email: String,
}

/// Register a new account.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>)> {
    let account = state
        .accounts
        .register(&req.username, &req.password, &req.email)?;

    tracing::info!(user_id = account.id, "Account registered");
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Get an account by id.
pub async fn account_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>> {
    let account = state.accounts.get(parse_id(&id)?)?;
    Ok(Json(account.into()))
}

/// Fully replace an account.
pub async fn account_replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AccountUpdateRequest>,
) -> Result<StatusCode> {
    state.accounts.replace(
        parse_id(&id)?,
        req.user_id.as_deref(),
        &req.username,
        &req.password,
        &req.email,
    )?;
    Ok(StatusCode::OK)
}

/// Partially update an account.
pub async fn account_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AccountUpdateRequest>,
) -> Result<StatusCode> {
    state.accounts.update(
        parse_id(&id)?,
        req.user_id.as_deref(),
        &req.username,
        &req.password,
        &req.email,
    )?;
    Ok(StatusCode::OK)
}

/// Delete an account.
pub async fn account_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    state.accounts.delete(id)?;

    tracing::info!(user_id = id, "Account deleted");
    Ok(StatusCode::OK)
}

// ============================================================================
// AUTH
// ============================================================================

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    access_token: String,
}

/// Verify credentials and issue an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let access_token = state.auth.login(&req.email, &req.password)?;
    Ok(Json(LoginResponse { access_token }))
}

// ============================================================================
// BOOKS
// ============================================================================

/// Add-book request. Rating and comment only apply to the finished shelf.
#[derive(Debug, Deserialize)]
pub struct AddBookRequest {
    title: String,
    author: String,
    cover_image_url: Option<String>,
    #[serde(default)]
    rating: i64,
    #[serde(default)]
    comment: String,
}

/// Book response. Rating and comment are omitted for wishlist rows.
#[derive(Debug, Serialize)]
pub struct BookResponse {
    id: String,
    title: String,
    author: String,
    cover_image_url: String,
    date_added: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title,
            author: book.author,
            cover_image_url: book.cover_image_url,
            date_added: book.date_added,
            rating: book.rating,
            comment: book.comment,
        }
    }
}

/// Wishlist -> finished transition request.
#[derive(Debug, Deserialize)]
pub struct CompleteBookRequest {
    id: String,
    #[serde(default)]
    rating: i64,
    #[serde(default)]
    comment: String,
}

/// Add a book to an account's wishlist.
pub async fn wishlist_add(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddBookRequest>,
) -> Result<StatusCode> {
    state.library.add_book(
        parse_id(&id)?,
        NewBook {
            title: req.title,
            author: req.author,
            cover_image: req.cover_image_url,
            shelf: Shelf::Wishlist,
        },
    )?;
    Ok(StatusCode::CREATED)
}

/// Add an already-read book to an account's finished shelf.
pub async fn finished_add(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddBookRequest>,
) -> Result<StatusCode> {
    state.library.add_book(
        parse_id(&id)?,
        NewBook {
            title: req.title,
            author: req.author,
            cover_image: req.cover_image_url,
            shelf: Shelf::Finished {
                rating: req.rating,
                comment: req.comment,
            },
        },
    )?;
    Ok(StatusCode::CREATED)
}

/// List an account's wishlist.
pub async fn wishlist_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<BookResponse>>> {
    let books = state.library.wishlist(parse_id(&id)?)?;
    Ok(Json(books.into_iter().map(Into::into).collect()))
}

/// List an account's finished shelf.
pub async fn finished_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<BookResponse>>> {
    let books = state.library.finished(parse_id(&id)?)?;
    Ok(Json(books.into_iter().map(Into::into).collect()))
}

/// Move a book from the wishlist to the finished shelf.
pub async fn book_complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CompleteBookRequest>,
) -> Result<StatusCode> {
    state
        .library
        .complete_book(parse_id(&id)?, parse_id(&req.id)?, req.rating, &req.comment)?;
    Ok(StatusCode::OK)
}
