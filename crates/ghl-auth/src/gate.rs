use super::Attempt;
use super::AuthRepository;
use super::password;
use ghl_pg::PgErr;
use serde::Serialize;
use std::time::SystemTime;

/// Terminal outcome of one authentication attempt.
///
/// Rejections never reveal whether the username exists: unknown accounts
/// and wrong passwords are indistinguishable to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateOutcome {
    Success,
    ChallengeMismatch,
    LockedOut,
    InvalidCredentials,
}

impl GateOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "welcome",
            Self::ChallengeMismatch => "invalid captcha",
            Self::LockedOut => "too many login attempts, try again later",
            Self::InvalidCredentials => "invalid credentials",
        }
    }
}

impl std::fmt::Display for GateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// The authentication state machine.
///
/// `AWAITING_CHALLENGE → CHALLENGE_ISSUED → (VERIFIED | REJECTED)`; the
/// caller mints a fresh challenge into the session after any rejection.
pub struct Gate;

impl Gate {
    /// Runs one authentication attempt.
    ///
    /// Ordering is load-bearing:
    /// 1. challenge mismatch rejects without touching the ledger;
    /// 2. a locked username rejects without the password comparison, so a
    ///    guess during lockout neither costs a hash nor restarts the
    ///    window;
    /// 3. only then is the password verified — success clears the ledger,
    ///    failure increments it and restarts the window from `now`.
    pub async fn authenticate<R>(
        db: &R,
        username: &str,
        password: &str,
        answer: &str,
        challenge: &str,
        now: SystemTime,
    ) -> Result<GateOutcome, PgErr>
    where
        R: AuthRepository,
    {
        if answer != challenge {
            return Ok(GateOutcome::ChallengeMismatch);
        }
        let ledger = db.attempt(username).await?;
        if ledger.as_ref().is_some_and(|entry| entry.locked(now)) {
            log::warn!("[gate] locked out attempt for {}", username);
            return Ok(GateOutcome::LockedOut);
        }
        let verified = db
            .hashword(username)
            .await?
            .map(|hashword| password::verify(password, &hashword))
            .unwrap_or(false);
        if verified {
            db.clear(username).await?;
            log::info!("[gate] {} authenticated", username);
            Ok(GateOutcome::Success)
        } else {
            let ref entry = ledger
                .map(|entry| entry.next(now))
                .unwrap_or_else(|| Attempt::first(now));
            db.record(username, entry).await?;
            log::warn!(
                "[gate] failed attempt {} for {}",
                entry.attempts(),
                username
            );
            Ok(GateOutcome::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::Mutex;

    /// In-memory credential store standing in for the database.
    #[derive(Default)]
    struct Fake {
        admins: HashMap<String, String>,
        ledger: Mutex<HashMap<String, Attempt>>,
    }

    impl Fake {
        fn with_admin(username: &str, pass: &str) -> Self {
            let mut fake = Self::default();
            fake.admins
                .insert(username.to_string(), password::hash(pass).unwrap());
            fake
        }
    }

    impl AuthRepository for Fake {
        async fn hashword(&self, username: &str) -> Result<Option<String>, PgErr> {
            Ok(self.admins.get(username).cloned())
        }
        async fn create(&self, _: &crate::Admin, _: &str) -> Result<(), PgErr> {
            unreachable!("gate never creates accounts")
        }
        async fn attempt(&self, username: &str) -> Result<Option<Attempt>, PgErr> {
            Ok(self.ledger.lock().await.get(username).copied())
        }
        async fn record(&self, username: &str, attempt: &Attempt) -> Result<(), PgErr> {
            self.ledger
                .lock()
                .await
                .insert(username.to_string(), *attempt);
            Ok(())
        }
        async fn clear(&self, username: &str) -> Result<(), PgErr> {
            self.ledger.lock().await.remove(username);
            Ok(())
        }
    }

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    async fn fail(db: &Fake, username: &str, now: SystemTime) -> GateOutcome {
        Gate::authenticate(db, username, "wrong", "ABC123", "ABC123", now)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn correct_credentials_succeed() {
        let db = Fake::with_admin("alice", "hunter22");
        let outcome = Gate::authenticate(&db, "alice", "hunter22", "ABC123", "ABC123", at(0))
            .await
            .unwrap();
        assert!(outcome == GateOutcome::Success);
    }

    #[tokio::test]
    async fn challenge_mismatch_beats_correct_password_and_skips_ledger() {
        let db = Fake::with_admin("alice", "hunter22");
        let outcome = Gate::authenticate(&db, "alice", "hunter22", "WRONG1", "ABC123", at(0))
            .await
            .unwrap();
        assert!(outcome == GateOutcome::ChallengeMismatch);
        assert!(db.attempt("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sixth_attempt_with_correct_password_is_locked_out() {
        let db = Fake::with_admin("alice", "hunter22");
        for i in 0..5 {
            assert!(fail(&db, "alice", at(i)).await == GateOutcome::InvalidCredentials);
        }
        let outcome = Gate::authenticate(&db, "alice", "hunter22", "ABC123", "ABC123", at(10))
            .await
            .unwrap();
        assert!(outcome == GateOutcome::LockedOut);
    }

    #[tokio::test]
    async fn lockout_expires_from_the_latest_failure() {
        let db = Fake::with_admin("alice", "hunter22");
        for i in 0..5 {
            fail(&db, "alice", at(i)).await;
        }
        // fifth failure at t=4; window closes at t=304
        let outcome = Gate::authenticate(&db, "alice", "hunter22", "ABC123", "ABC123", at(304))
            .await
            .unwrap();
        assert!(outcome == GateOutcome::Success);
    }

    #[tokio::test]
    async fn lockout_rejection_does_not_restart_the_window() {
        let db = Fake::with_admin("alice", "hunter22");
        for i in 0..5 {
            fail(&db, "alice", at(i)).await;
        }
        assert!(fail(&db, "alice", at(100)).await == GateOutcome::LockedOut);
        let entry = db.attempt("alice").await.unwrap().unwrap();
        assert!(entry.attempts() == 5);
        assert!(entry.last() == at(4));
    }

    #[tokio::test]
    async fn success_clears_ledger_and_next_failure_starts_at_one() {
        let db = Fake::with_admin("alice", "hunter22");
        for i in 0..3 {
            fail(&db, "alice", at(i)).await;
        }
        Gate::authenticate(&db, "alice", "hunter22", "ABC123", "ABC123", at(5))
            .await
            .unwrap();
        assert!(db.attempt("alice").await.unwrap().is_none());
        fail(&db, "alice", at(6)).await;
        assert!(db.attempt("alice").await.unwrap().unwrap().attempts() == 1);
    }

    #[tokio::test]
    async fn unknown_usernames_fail_indistinguishably_and_are_ledgered() {
        let db = Fake::with_admin("alice", "hunter22");
        let outcome = fail(&db, "mallory", at(0)).await;
        assert!(outcome == GateOutcome::InvalidCredentials);
        assert!(db.attempt("mallory").await.unwrap().unwrap().attempts() == 1);
    }
}
