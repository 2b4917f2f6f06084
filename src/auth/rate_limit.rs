//! Sliding-window login throttling over the attempt log.
//!
//! The count and the subsequent record are separate store calls, so two
//! concurrent attempts at the boundary can both be allowed. The limit is soft.

use crate::store::AttemptStore;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited,
}

#[derive(Clone)]
pub struct LoginRateLimiter {
    attempts: Arc<dyn AttemptStore>,
    limit: u32,
    window: Duration,
}

impl std::fmt::Debug for LoginRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRateLimiter")
            .field("limit", &self.limit)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl LoginRateLimiter {
    #[must_use]
    pub fn new(attempts: Arc<dyn AttemptStore>, limit: u32, window_seconds: i64) -> Self {
        Self {
            attempts,
            limit,
            // Out-of-range windows saturate instead of panicking.
            window: Duration::try_seconds(window_seconds).unwrap_or(Duration::MAX),
        }
    }

    /// Attempts strictly newer than `now - window` count against `email`.
    ///
    /// # Errors
    /// Propagates attempt store failures.
    pub async fn check(&self, email: &str, now: DateTime<Utc>) -> Result<RateLimitDecision> {
        let since = self.window_start(now);
        let recent = self.attempts.count_since(email, since).await?;
        if recent >= u64::from(self.limit) {
            Ok(RateLimitDecision::Limited)
        } else {
            Ok(RateLimitDecision::Allowed)
        }
    }

    /// # Errors
    /// Propagates attempt store failures.
    pub async fn record_attempt(&self, email: &str, now: DateTime<Utc>) -> Result<()> {
        self.attempts.insert(email, now).await
    }

    /// Drop attempts that can no longer count against any email.
    ///
    /// # Errors
    /// Propagates attempt store failures.
    pub async fn prune(&self, now: DateTime<Utc>) -> Result<u64> {
        self.attempts.delete_before(self.window_start(now)).await
    }

    fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        // No attempt predates the epoch, so it is a safe floor for huge windows.
        now.checked_sub_signed(self.window)
            .map_or(DateTime::UNIX_EPOCH, |since| since.max(DateTime::UNIX_EPOCH))
    }

    /// Forget every attempt for `email`.
    ///
    /// # Errors
    /// Propagates attempt store failures.
    pub async fn clear(&self, email: &str) -> Result<()> {
        self.attempts.delete_all_for_email(email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn limiter(store: &Arc<MemoryStore>) -> LoginRateLimiter {
        let attempts: Arc<dyn AttemptStore> = store.clone();
        LoginRateLimiter::new(attempts, 3, 900)
    }

    #[tokio::test]
    async fn limits_once_count_reaches_limit() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        let limiter = limiter(&store);
        let now = Utc::now();

        for _ in 0..2 {
            limiter.record_attempt("a@x.com", now).await?;
        }
        assert_eq!(
            limiter.check("a@x.com", now).await?,
            RateLimitDecision::Allowed
        );

        limiter.record_attempt("a@x.com", now).await?;
        assert_eq!(
            limiter.check("a@x.com", now).await?,
            RateLimitDecision::Limited
        );
        assert_eq!(
            limiter.check("b@x.com", now).await?,
            RateLimitDecision::Allowed
        );
        Ok(())
    }

    #[tokio::test]
    async fn attempts_outside_window_are_ignored() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        let limiter = limiter(&store);
        let now = Utc::now();

        // Exactly at the window start does not count.
        let edge = now - Duration::seconds(900);
        for _ in 0..3 {
            limiter.record_attempt("a@x.com", edge).await?;
        }
        assert_eq!(
            limiter.check("a@x.com", now).await?,
            RateLimitDecision::Allowed
        );

        let later = now + Duration::seconds(1);
        assert_eq!(
            limiter.check("a@x.com", edge + Duration::seconds(1)).await?,
            RateLimitDecision::Limited
        );
        assert_eq!(
            limiter.check("a@x.com", later).await?,
            RateLimitDecision::Allowed
        );
        Ok(())
    }

    #[tokio::test]
    async fn clear_resets_the_window() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        let limiter = limiter(&store);
        let now = Utc::now();

        for _ in 0..3 {
            limiter.record_attempt("a@x.com", now).await?;
        }
        limiter.clear("a@x.com").await?;
        assert_eq!(
            limiter.check("a@x.com", now).await?,
            RateLimitDecision::Allowed
        );
        assert_eq!(store.attempt_count("a@x.com").await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn zero_limit_blocks_everything() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        let attempts: Arc<dyn AttemptStore> = store.clone();
        let limiter = LoginRateLimiter::new(attempts, 0, 900);
        assert_eq!(
            limiter.check("a@x.com", Utc::now()).await?,
            RateLimitDecision::Limited
        );
        Ok(())
    }

    #[tokio::test]
    async fn oversized_window_saturates() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        let attempts: Arc<dyn AttemptStore> = store.clone();
        let limiter = LoginRateLimiter::new(attempts, 1, 10_i64.pow(13));
        let now = Utc::now();

        assert_eq!(
            limiter.check("a@x.com", now).await?,
            RateLimitDecision::Allowed
        );
        limiter
            .record_attempt("a@x.com", now - Duration::days(3650))
            .await?;
        assert_eq!(
            limiter.check("a@x.com", now).await?,
            RateLimitDecision::Limited
        );

        let limiter = LoginRateLimiter::new(store.clone(), 1, i64::MAX);
        assert_eq!(
            limiter.check("a@x.com", now).await?,
            RateLimitDecision::Limited
        );
        Ok(())
    }

    #[tokio::test]
    async fn prune_keeps_attempts_inside_the_window() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        let limiter = limiter(&store);
        let now = Utc::now();

        limiter
            .record_attempt("a@x.com", now - Duration::seconds(900))
            .await?;
        limiter
            .record_attempt("b@x.com", now - Duration::hours(5))
            .await?;
        limiter
            .record_attempt("b@x.com", now - Duration::seconds(899))
            .await?;

        assert_eq!(limiter.prune(now).await?, 2);
        assert_eq!(store.attempt_count("a@x.com").await, 0);
        assert_eq!(store.attempt_count("b@x.com").await, 1);
        Ok(())
    }
}
