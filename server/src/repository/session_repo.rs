//! Session Repository
//!
//! Sessions are minted by the login flow and resolved on every request.
//! Only a blake3 hash of each bearer token is stored.

use base64::Engine;
use rand::Rng;
use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainResult, UserIdentity};
use super::db::{not_initialized, now_millis, SharedConnection};

pub struct SessionRepository {
    conn: SharedConnection,
    ttl_secs: u64,
}

/// Hex blake3 digest of a bearer token
pub fn hash_token(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

impl SessionRepository {
    /// Sessions created through this repository live for `ttl_secs`
    pub fn new(conn: SharedConnection, ttl_secs: u64) -> Self {
        Self { conn, ttl_secs }
    }

    /// Start a session for `user`; returns the bearer token
    pub async fn create(&self, user: &UserIdentity) -> DomainResult<String> {
        let token = generate_token();
        let ttl_ms = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX).saturating_mul(1000);
        let expires_at = now_millis().saturating_add(ttl_ms);

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            "INSERT INTO sessions (token_hash, user_id, user_name, expires_at) VALUES (?, ?, ?, ?)",
            params![hash_token(&token), user.id, user.name, expires_at],
        )?;
        Ok(token)
    }

    /// The user behind `token`, if the session exists and has not expired
    pub async fn resolve(&self, token: &str) -> DomainResult<Option<UserIdentity>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let user = conn
            .query_row(
                "SELECT user_id, user_name FROM sessions WHERE token_hash = ? AND expires_at > ?",
                params![hash_token(token), now_millis()],
                |row| Ok(UserIdentity::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(user)
    }

    pub async fn revoke(&self, token: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute("DELETE FROM sessions WHERE token_hash = ?", params![hash_token(token)])?;
        Ok(())
    }

    /// Drop expired sessions; returns how many were removed
    pub async fn purge_expired(&self) -> DomainResult<u32> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let removed = conn.execute("DELETE FROM sessions WHERE expires_at <= ?", params![now_millis()])?;
        Ok(removed as u32)
    }
}
