//! User accounts: registration, login, directory, profile updates.
//!
//! Passwords are stored as Argon2id PHC strings; plaintext never
//! reaches a row.

use super::{Database, now_ms};
use crate::error::ApiError;
use crate::types::{User, UserProfile};
use anyhow::{Result, anyhow};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;
use rusqlite::{Row, params};

fn parse_user_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        email: row.get("email")?,
        name: row.get("name")?,
        password_hash: row.get("password_hash")?,
        initials: row.get("initials")?,
        avatar_url: row.get("avatar_url")?,
    })
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Initials shown on avatars: first two characters of the name, uppercased.
fn initials_of(name: &str) -> String {
    name.chars().take(2).collect::<String>().to_uppercase()
}

impl Database {
    /// Register a new account.
    pub fn register_user(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let now = now_ms();
        let password_hash = hash_password(password)?;

        self.with_conn(|conn| {
            let taken: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
                params![email],
                |row| row.get(0),
            )?;
            if taken {
                return Err(ApiError::email_taken(email).into());
            }

            let user = User {
                id: format!("user-{}", now),
                email: email.to_string(),
                name: name.to_string(),
                password_hash,
                initials: initials_of(name),
                avatar_url: None,
            };

            conn.execute(
                "INSERT INTO users (id, email, name, password_hash, initials, avatar_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    user.id,
                    user.email,
                    user.name,
                    user.password_hash,
                    user.initials,
                    user.avatar_url,
                    now
                ],
            )?;

            Ok(user)
        })
    }

    /// Verify login credentials. Returns the account on success, `None` on
    /// an unknown email or a wrong password; the caller reports both the
    /// same way.
    pub fn verify_login(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM users WHERE email = ?1")?;
            match stmt.query_row(params![email], parse_user_row) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })?;

        Ok(user.filter(|u| verify_password(password, &u.password_hash)))
    }

    /// List all users (public profiles only).
    pub fn list_users(&self) -> Result<Vec<UserProfile>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM users ORDER BY name")?;
            let users = stmt
                .query_map([], parse_user_row)?
                .filter_map(|r| r.ok())
                .map(UserProfile::from)
                .collect();
            Ok(users)
        })
    }

    /// Look up a user by email.
    pub fn lookup_user(&self, email: &str) -> Result<Option<UserProfile>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM users WHERE email = ?1")?;
            match stmt.query_row(params![email], parse_user_row) {
                Ok(user) => Ok(Some(user.into())),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Update profile fields. A new password, when supplied, is re-hashed;
    /// the avatar is replaced as given (including clearing it).
    pub fn update_user(
        &self,
        user_id: &str,
        name: Option<String>,
        password: Option<String>,
        avatar_url: Option<Option<String>>,
    ) -> Result<UserProfile> {
        let password_hash = password.as_deref().map(hash_password).transpose()?;

        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;
            let user = match stmt.query_row(params![user_id], parse_user_row) {
                Ok(user) => user,
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    return Err(ApiError::user_not_found().into());
                }
                Err(e) => return Err(e.into()),
            };

            let name = name.unwrap_or(user.name);
            let initials = initials_of(&name);
            let password_hash = password_hash.unwrap_or(user.password_hash);
            let avatar_url = avatar_url.unwrap_or(user.avatar_url);

            conn.execute(
                "UPDATE users SET name = ?1, password_hash = ?2, initials = ?3, avatar_url = ?4
                 WHERE id = ?5",
                params![name, password_hash, initials, avatar_url, user_id],
            )?;

            Ok(UserProfile {
                id: user.id,
                email: user.email,
                name,
                initials,
                avatar_url,
            })
        })
    }
}
