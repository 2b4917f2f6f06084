//! Engine configuration: token lifetimes, login throttling and hashing cost.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

const DEFAULT_ACCESS_TTL_SECONDS: i64 = 30 * 60;
const DEFAULT_REFRESH_TTL_SECONDS: i64 = 720 * 60 * 60;
const DEFAULT_LOGIN_LIMIT: u32 = 5;
const DEFAULT_LOGIN_WINDOW_SECONDS: i64 = 15 * 60;
const DEFAULT_CLEANUP_INTERVAL_SECONDS: u64 = 24 * 60 * 60;

/// Minimum accepted signing secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Argon2id cost parameters used when hashing new passwords.
///
/// Verification always uses the parameters embedded in the stored digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordCost {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    signing_secret: SecretString,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    login_limit: u32,
    login_window_seconds: i64,
    cleanup_interval_seconds: u64,
    password_cost: PasswordCost,
}

impl AuthConfig {
    #[must_use]
    pub fn new(signing_secret: SecretString) -> Self {
        Self {
            signing_secret,
            access_ttl_seconds: DEFAULT_ACCESS_TTL_SECONDS,
            refresh_ttl_seconds: DEFAULT_REFRESH_TTL_SECONDS,
            login_limit: DEFAULT_LOGIN_LIMIT,
            login_window_seconds: DEFAULT_LOGIN_WINDOW_SECONDS,
            cleanup_interval_seconds: DEFAULT_CLEANUP_INTERVAL_SECONDS,
            password_cost: PasswordCost::default(),
        }
    }

    #[must_use]
    pub fn with_access_ttl_seconds(mut self, seconds: i64) -> Self {
        self.access_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_refresh_ttl_seconds(mut self, seconds: i64) -> Self {
        self.refresh_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_login_limit(mut self, limit: u32) -> Self {
        self.login_limit = limit;
        self
    }

    #[must_use]
    pub fn with_login_window_seconds(mut self, seconds: i64) -> Self {
        self.login_window_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_cleanup_interval_seconds(mut self, seconds: u64) -> Self {
        self.cleanup_interval_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_password_cost(mut self, cost: PasswordCost) -> Self {
        self.password_cost = cost;
        self
    }

    pub(crate) fn signing_key(&self) -> &[u8] {
        self.signing_secret.expose_secret().as_bytes()
    }

    #[must_use]
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }

    #[must_use]
    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }

    #[must_use]
    pub fn login_limit(&self) -> u32 {
        self.login_limit
    }

    #[must_use]
    pub fn login_window_seconds(&self) -> i64 {
        self.login_window_seconds
    }

    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        // A zero period would spin the reaper.
        Duration::from_secs(self.cleanup_interval_seconds.max(1))
    }

    #[must_use]
    pub fn password_cost(&self) -> PasswordCost {
        self.password_cost
    }
}
