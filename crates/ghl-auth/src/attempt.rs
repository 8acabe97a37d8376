use ghl_core::LOCKOUT_ATTEMPTS;
use ghl_core::LOCKOUT_WINDOW;
use std::time::SystemTime;

/// One login-attempt ledger entry: failures since the last success, and
/// when the latest one happened.
///
/// The lockout window slides: it is measured from the most recent
/// failure, so every failure past the threshold restarts the clock, while
/// a quiet offender unlocks [`LOCKOUT_WINDOW`] after their last failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    attempts: i32,
    last: SystemTime,
}

impl Attempt {
    pub fn new(attempts: i32, last: SystemTime) -> Self {
        Self { attempts, last }
    }

    /// The entry created by a username's first failure.
    pub fn first(now: SystemTime) -> Self {
        Self::new(1, now)
    }

    /// The entry after one more failure: count incremented, window
    /// restarted.
    pub fn next(&self, now: SystemTime) -> Self {
        Self::new(self.attempts + 1, now)
    }

    /// Whether this entry locks its username out at `now`.
    pub fn locked(&self, now: SystemTime) -> bool {
        self.attempts >= LOCKOUT_ATTEMPTS
            && now
                .duration_since(self.last)
                .map(|elapsed| elapsed < LOCKOUT_WINDOW)
                .unwrap_or(true)
    }

    pub fn attempts(&self) -> i32 {
        self.attempts
    }

    pub fn last(&self) -> SystemTime {
        self.last
    }
}

mod schema {
    use super::*;
    use ghl_pg::*;

    impl Schema for Attempt {
        fn name() -> &'static str {
            ATTEMPTS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                ATTEMPTS,
                " (
                    username      TEXT PRIMARY KEY,
                    attempts      INTEGER NOT NULL,
                    last_attempt  TIMESTAMPTZ NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn below_threshold_is_never_locked() {
        let entry = Attempt::new(4, at(1000));
        assert!(!entry.locked(at(1000)));
    }

    #[test]
    fn at_threshold_locks_inside_window() {
        let entry = Attempt::new(5, at(1000));
        assert!(entry.locked(at(1000 + 299)));
        assert!(!entry.locked(at(1000 + 300)));
    }

    #[test]
    fn window_slides_from_latest_failure() {
        let entry = Attempt::new(5, at(1000)).next(at(1250));
        assert!(entry.attempts() == 6);
        // 1000 + 300 has passed, but 1250 + 300 has not
        assert!(entry.locked(at(1350)));
        assert!(!entry.locked(at(1250 + 300)));
    }

    #[test]
    fn clock_skew_stays_locked() {
        let entry = Attempt::new(5, at(1000));
        assert!(entry.locked(at(900)));
    }
}
