//! Failed-login counting and temporary account locks

use chrono::{DateTime, Duration, Utc};

use crate::model::{User, UserStatus};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_LOCK_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Consecutive failures that trigger a lock
    pub max_attempts: u32,
    pub lock_minutes: i64,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            lock_minutes: DEFAULT_LOCK_MINUTES,
        }
    }
}

/// Lock state of a user at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Open,
    /// Temporarily locked; sign-in refused until the instant given
    Locked(DateTime<Utc>),
    /// The temporary lock has run out and should be cleared
    Expired,
    /// `Locked` with no expiry, set by an administrator
    Indefinite,
}

/// What a wrong password does to the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    Retry { attempts: u32, remaining: u32 },
    Lock { attempts: u32, until: DateTime<Utc> },
}

impl LockoutPolicy {
    pub fn lock_state(&self, user: &User, now: DateTime<Utc>) -> LockState {
        if user.status != UserStatus::Locked {
            return LockState::Open;
        }
        match user.locked_until {
            Some(until) if until > now => LockState::Locked(until),
            Some(_) => LockState::Expired,
            None => LockState::Indefinite,
        }
    }

    /// Apply one failed attempt on top of `prior_attempts`.
    pub fn register_failure(&self, prior_attempts: u32, now: DateTime<Utc>) -> FailureOutcome {
        let attempts = prior_attempts.saturating_add(1);
        let max = self.max_attempts.max(1);
        if attempts >= max {
            FailureOutcome::Lock {
                attempts,
                until: now + Duration::minutes(self.lock_minutes),
            }
        } else {
            FailureOutcome::Retry {
                attempts,
                remaining: max - attempts,
            }
        }
    }
}
