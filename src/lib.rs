//! bookshelf-rs: a personal library tracker with wishlist and finished shelves.
//!
//! This crate provides a small HTTP service that manages user accounts and
//! tracks each account's reading list, split into a wishlist (not yet read)
//! and a finished shelf (read, optionally rated and commented).
//!
//! # Features
//!
//! - Account registration, lookup, full/partial update and delete
//! - Username and email uniqueness enforcement
//! - Login with Argon2 password verification and signed access tokens
//! - Per-account wishlist and finished shelves
//! - Wishlist to finished transition with rating and comment

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Account management.
pub mod account;
/// Authentication and token issuance.
pub mod auth;
/// Configuration and CLI.
pub mod config;
/// Database operations.
pub mod db;
/// Error types.
pub mod error;
/// Wishlist and finished shelves.
pub mod library;
/// HTTP server.
pub mod server;

#[cfg(test)]
mod tests;

pub use config::{Cli, Command, Config};
pub use db::Database;
pub use error::{AppError, Result};
pub use server::AppState;
