//! Authentication module.

use crate::db::Database;
use crate::error::{AppError, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Hash a password using Argon2.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Claims embedded in issued access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Standard JWT subject, set to the account's email.
    pub sub: String,
    /// Expiry (unix timestamp, seconds).
    pub exp: i64,
}

/// Session issuer: verifies credentials and signs bearer tokens.
///
/// Stateless by design; a token's validity after issuance is solely a
/// function of its signature and expiry.
pub struct AuthService {
    db: Database,
    secret_key: String,
    token_days: u32,
}

impl AuthService {
    /// Create a new auth service.
    pub fn new(db: Database, secret_key: String, token_days: u32) -> Self {
        Self {
            db,
            secret_key,
            token_days,
        }
    }

    /// Verify a credential pair and issue a signed token.
    ///
    /// An unknown email is reported as not-found; a known email with the
    /// wrong password as unauthorized.
    pub fn login(&self, email: &str, password: &str) -> Result<String> {
        let account = self
            .db
            .find_account_by_email(email)?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        if !verify_password(password, &account.password_hash)? {
            return Err(AppError::Unauthorized("Incorrect password".to_string()));
        }

        let claims = TokenClaims {
            sub: email.to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::days(self.token_days as i64)).timestamp(),
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_key.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Decode and verify a token issued by [`login`](Self::login).
    pub fn decode_token(&self, token: &str) -> Result<TokenClaims> {
        jsonwebtoken::decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret_key.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }
}
