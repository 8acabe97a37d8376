use super::Admin;
use super::Attempt;
use ghl_pg::*;
use std::sync::Arc;
use tokio_postgres::Client;

/// Repository trait for credential store operations.
/// Abstracts SQL from the gate.
#[allow(async_fn_in_trait)]
pub trait AuthRepository {
    /// Stored Argon2 hash for a username, if the account exists.
    async fn hashword(&self, username: &str) -> Result<Option<String>, PgErr>;
    /// Creates an admin account. Out-of-band tooling only.
    async fn create(&self, admin: &Admin, hashword: &str) -> Result<(), PgErr>;
    /// Current ledger entry for a username.
    async fn attempt(&self, username: &str) -> Result<Option<Attempt>, PgErr>;
    /// Replaces a username's ledger entry.
    async fn record(&self, username: &str, attempt: &Attempt) -> Result<(), PgErr>;
    /// Clears a username's ledger entry.
    async fn clear(&self, username: &str) -> Result<(), PgErr>;
}

impl AuthRepository for Arc<Client> {
    async fn hashword(&self, username: &str) -> Result<Option<String>, PgErr> {
        self.query_opt(
            const_format::concatcp!("SELECT hashword FROM ", ADMINS, " WHERE username = $1"),
            &[&username],
        )
        .await
        .map(|opt| opt.map(|row| row.get(0)))
    }

    async fn create(&self, admin: &Admin, hashword: &str) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                ADMINS,
                " (username, hashword) VALUES ($1, $2)"
            ),
            &[&admin.username(), &hashword],
        )
        .await
        .map(|_| ())
    }

    async fn attempt(&self, username: &str) -> Result<Option<Attempt>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT attempts, last_attempt FROM ",
                ATTEMPTS,
                " WHERE username = $1"
            ),
            &[&username],
        )
        .await
        .map(|opt| opt.map(|row| Attempt::new(row.get(0), row.get(1))))
    }

    async fn record(&self, username: &str, attempt: &Attempt) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                ATTEMPTS,
                " (username, attempts, last_attempt) VALUES ($1, $2, $3)
                 ON CONFLICT (username) DO UPDATE
                 SET attempts = EXCLUDED.attempts, last_attempt = EXCLUDED.last_attempt"
            ),
            &[&username, &attempt.attempts(), &attempt.last()],
        )
        .await
        .map(|_| ())
    }

    async fn clear(&self, username: &str) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", ATTEMPTS, " WHERE username = $1"),
            &[&username],
        )
        .await
        .map(|_| ())
    }
}
