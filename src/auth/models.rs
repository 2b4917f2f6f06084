//! Records owned by the credential store and the token ledger, plus the
//! inputs and outcomes of the engine operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The single administrative account. Carries no password material, so it
/// is always safe to serialize outward.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity row as persisted, including the password digest.
#[derive(Clone)]
pub struct CredentialRecord {
    pub identity: Identity,
    pub password_hash: String,
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("identity", &self.identity)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Persisted refresh token. `token` is the literal bearer string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// A record is dead once its own expiry is at or before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginAttemptRecord {
    pub email: String,
    pub attempted_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct BootstrapInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct LoginOutcome {
    pub identity: Identity,
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

#[derive(Clone, Debug)]
pub struct RefreshOutcome {
    pub access_token: String,
    pub expires_in: i64,
}

/// Result of creating the identity row.
#[derive(Debug)]
pub enum CreateOutcome {
    Created,
    /// The store refused a second identity.
    Conflict,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::Duration;

    fn identity() -> Identity {
        let now = Utc::now();
        Identity {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            name: "Admin".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn identity_serializes_without_password_fields() -> Result<()> {
        let value = serde_json::to_value(identity())?;
        let object = value.as_object().map(|o| o.keys().cloned().collect::<Vec<_>>());
        let keys = object.unwrap_or_default();
        assert!(keys.contains(&"email".to_string()));
        assert!(!keys.iter().any(|key| key.contains("password")));
        Ok(())
    }

    #[test]
    fn credential_record_debug_redacts_hash() {
        let record = CredentialRecord {
            identity: identity(),
            password_hash: "$argon2id$v=19$secret".to_string(),
        };
        let debug = format!("{record:?}");
        assert!(!debug.contains("$argon2id"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn refresh_record_expiry_is_inclusive_of_now() {
        let now = Utc::now();
        let record = RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token: "t".to_string(),
            expires_at: now,
            created_at: now - Duration::hours(1),
        };
        assert!(record.is_expired_at(now));
        assert!(!record.is_expired_at(now - Duration::seconds(1)));
    }
}
