//! In-process store, selected with the `memory://` DSN and used by tests.
//!
//! State lives behind a single async mutex; each trait call holds it for one
//! read or write, mirroring the per-statement guarantees of the Postgres store.

use super::{AttemptStore, CredentialStore, TokenLedger};
use crate::auth::models::{
    CreateOutcome, CredentialRecord, LoginAttemptRecord, RefreshTokenRecord,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct State {
    identity: Option<CredentialRecord>,
    refresh_tokens: HashMap<String, RefreshTokenRecord>,
    login_attempts: Vec<LoginAttemptRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the persisted refresh tokens, unordered.
    pub async fn refresh_tokens(&self) -> Vec<RefreshTokenRecord> {
        self.state.lock().await.refresh_tokens.values().cloned().collect()
    }

    /// Number of recorded login attempts for `email`, regardless of age.
    pub async fn attempt_count(&self, email: &str) -> usize {
        self.state
            .lock()
            .await
            .login_attempts
            .iter()
            .filter(|attempt| attempt.email == email)
            .count()
    }

    /// Drop the identity row, leaving its refresh tokens dangling.
    pub async fn remove_identity(&self) {
        self.state.lock().await.identity = None;
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .identity
            .as_ref()
            .filter(|record| record.identity.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CredentialRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .identity
            .as_ref()
            .filter(|record| record.identity.id == id)
            .cloned())
    }

    async fn create(&self, record: &CredentialRecord) -> Result<CreateOutcome> {
        let mut state = self.state.lock().await;
        if state.identity.is_some() {
            return Ok(CreateOutcome::Conflict);
        }
        state.identity = Some(record.clone());
        Ok(CreateOutcome::Created)
    }

    async fn exists_any(&self) -> Result<bool> {
        Ok(self.state.lock().await.identity.is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl TokenLedger for MemoryStore {
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.refresh_tokens.contains_key(&record.token) {
            anyhow::bail!("refresh token already stored");
        }
        state
            .refresh_tokens
            .insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>> {
        Ok(self.state.lock().await.refresh_tokens.get(token).cloned())
    }

    async fn delete_by_token(&self, token: &str) -> Result<()> {
        self.state.lock().await.refresh_tokens.remove(token);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut state = self.state.lock().await;
        let before = state.refresh_tokens.len();
        state
            .refresh_tokens
            .retain(|_, record| !record.is_expired_at(now));
        let removed = before - state.refresh_tokens.len();
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl AttemptStore for MemoryStore {
    async fn insert(&self, email: &str, attempted_at: DateTime<Utc>) -> Result<()> {
        self.state.lock().await.login_attempts.push(LoginAttemptRecord {
            email: email.to_string(),
            attempted_at,
        });
        Ok(())
    }

    async fn count_since(&self, email: &str, since: DateTime<Utc>) -> Result<u64> {
        let state = self.state.lock().await;
        let count = state
            .login_attempts
            .iter()
            .filter(|attempt| attempt.email == email && attempt.attempted_at > since)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn delete_all_for_email(&self, email: &str) -> Result<()> {
        self.state
            .lock()
            .await
            .login_attempts
            .retain(|attempt| attempt.email != email);
        Ok(())
    }

    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut state = self.state.lock().await;
        let before = state.login_attempts.len();
        state
            .login_attempts
            .retain(|attempt| attempt.attempted_at > cutoff);
        let removed = before - state.login_attempts.len();
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}
