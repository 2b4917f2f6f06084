//! Persistence contracts consumed by the authentication engine.
//!
//! Every invariant the engine enforces (attempt counts, refresh token
//! liveness, the single identity) is re-read from these stores on each call.
//! Implementations must serialize individual row writes; no operation here
//! spans more than one statement.

use crate::auth::models::{CreateOutcome, CredentialRecord, RefreshTokenRecord};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CredentialRecord>>;

    /// Persist a new identity. Reports [`CreateOutcome::Conflict`] when the
    /// store already holds one.
    async fn create(&self, record: &CredentialRecord) -> Result<CreateOutcome>;

    async fn exists_any(&self) -> Result<bool>;

    /// Cheap liveness probe used by the health endpoint.
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
pub trait TokenLedger: Send + Sync {
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<()>;

    /// Look up a refresh token by its literal string, expired or not.
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>>;

    /// Deleting an absent token is not an error.
    async fn delete_by_token(&self, token: &str) -> Result<()>;

    /// Delete every record with `expires_at <= now`, returning how many went.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

#[async_trait]
pub trait AttemptStore: Send + Sync {
    async fn insert(&self, email: &str, attempted_at: DateTime<Utc>) -> Result<()>;

    /// Count attempts for `email` strictly after `since`.
    async fn count_since(&self, email: &str, since: DateTime<Utc>) -> Result<u64>;

    async fn delete_all_for_email(&self, email: &str) -> Result<()>;

    /// Delete every attempt at or before `cutoff`, returning how many went.
    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}
