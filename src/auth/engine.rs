//! Authentication engine: bootstrap, login, refresh, logout, access
//! validation and expired-token cleanup.
//!
//! The engine keeps no mutable state of its own. Attempt counts and refresh
//! token liveness are re-read from the stores on every call, so one engine can
//! be shared freely across request tasks.

use std::sync::Arc;

use anyhow::{Context, anyhow};
use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    config::{AuthConfig, MIN_SECRET_LEN},
    error::{AuthError, AuthResult},
    models::{
        BootstrapInput, CreateOutcome, CredentialRecord, Identity, LoginInput, LoginOutcome,
        RefreshOutcome, RefreshTokenRecord,
    },
    password::{PasswordCheck, PasswordHasher},
    rate_limit::{LoginRateLimiter, RateLimitDecision},
    token::{TokenCodec, TokenError, TokenKind},
    validation::{validate_bootstrap, validate_login},
};
use crate::store::{AttemptStore, CredentialStore, TokenLedger};

pub struct AuthEngine {
    credentials: Arc<dyn CredentialStore>,
    ledger: Arc<dyn TokenLedger>,
    limiter: LoginRateLimiter,
    hasher: PasswordHasher,
    codec: TokenCodec,
    config: AuthConfig,
}

impl std::fmt::Debug for AuthEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEngine")
            .field("limiter", &self.limiter)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AuthEngine {
    /// Build an engine whose three collaborators are served by one store.
    ///
    /// # Errors
    /// Returns an error if the signing secret is too short or the password
    /// cost is out of range.
    pub fn new<S>(store: Arc<S>, config: AuthConfig) -> anyhow::Result<Self>
    where
        S: CredentialStore + TokenLedger + AttemptStore + 'static,
    {
        let credentials: Arc<dyn CredentialStore> = store.clone();
        let ledger: Arc<dyn TokenLedger> = store.clone();
        let attempts: Arc<dyn AttemptStore> = store;
        Self::from_parts(credentials, ledger, attempts, config)
    }

    /// # Errors
    /// Same as [`AuthEngine::new`].
    pub fn from_parts(
        credentials: Arc<dyn CredentialStore>,
        ledger: Arc<dyn TokenLedger>,
        attempts: Arc<dyn AttemptStore>,
        config: AuthConfig,
    ) -> anyhow::Result<Self> {
        if config.signing_key().len() < MIN_SECRET_LEN {
            return Err(anyhow!(
                "signing secret must be at least {MIN_SECRET_LEN} bytes"
            ));
        }
        let codec = TokenCodec::new(config.signing_key()).context("invalid signing secret")?;
        let hasher = PasswordHasher::new(config.password_cost())?;
        let limiter = LoginRateLimiter::new(
            attempts,
            config.login_limit(),
            config.login_window_seconds(),
        );
        Ok(Self {
            credentials,
            ledger,
            limiter,
            hasher,
            codec,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Create the single administrative identity.
    ///
    /// # Errors
    /// `AdminAlreadyExists` once any identity exists, `InvalidInput` for a bad
    /// email, a short password or a missing name.
    #[instrument(skip_all)]
    pub async fn bootstrap(&self, input: BootstrapInput) -> AuthResult<Identity> {
        // Two concurrent bootstraps can both pass this check; the store's own
        // uniqueness guard turns the loser into a conflict.
        if self.credentials.exists_any().await? {
            return Err(AuthError::AdminAlreadyExists);
        }
        validate_bootstrap(&input)?;

        let password_hash = self.hash_password(input.password).await?;
        let now = Utc::now();
        let identity = Identity {
            id: Uuid::new_v4(),
            email: input.email,
            name: input.name.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        let record = CredentialRecord {
            identity,
            password_hash,
        };

        match self.credentials.create(&record).await? {
            CreateOutcome::Created => {
                info!(identity_id = %record.identity.id, "Admin identity created");
                Ok(record.identity)
            }
            CreateOutcome::Conflict => Err(AuthError::AdminAlreadyExists),
        }
    }

    /// Verify credentials and open a session.
    ///
    /// # Errors
    /// `TooManyRequests` when the attempt window is full (the password is not
    /// checked), `InvalidCredentials` for an unknown email or wrong password.
    #[instrument(skip_all)]
    pub async fn login(&self, input: LoginInput) -> AuthResult<LoginOutcome> {
        validate_login(&input)?;

        let now = Utc::now();
        if self.limiter.check(&input.email, now).await? == RateLimitDecision::Limited {
            warn!("Login rate limited");
            return Err(AuthError::TooManyRequests);
        }
        self.limiter.record_attempt(&input.email, now).await?;

        let Some(record) = self.credentials.find_by_email(&input.email).await? else {
            warn!("Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        let check = self
            .verify_password(record.password_hash.clone(), input.password)
            .await?;
        if check == PasswordCheck::Mismatch {
            warn!(identity_id = %record.identity.id, "Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        self.limiter.clear(&input.email).await?;

        let identity = record.identity;
        let access = self
            .codec
            .issue(identity.id, TokenKind::Access, self.config.access_ttl_seconds(), now)
            .context("failed to issue access token")?;
        let refresh = self
            .codec
            .issue(identity.id, TokenKind::Refresh, self.config.refresh_ttl_seconds(), now)
            .context("failed to issue refresh token")?;

        self.ledger
            .insert(&RefreshTokenRecord {
                id: Uuid::new_v4(),
                user_id: identity.id,
                token: refresh.token.clone(),
                expires_at: refresh.expires_at,
                created_at: now,
            })
            .await?;

        info!(identity_id = %identity.id, "Login succeeded");
        Ok(LoginOutcome {
            identity,
            access_token: access.token,
            refresh_token: refresh.token,
            expires_in: self.config.access_ttl_seconds(),
        })
    }

    /// Exchange a live refresh token for a new access token. The refresh
    /// token itself is not rotated.
    ///
    /// # Errors
    /// `InvalidToken` for a forged, malformed, revoked or unknown token,
    /// `TokenExpired` once a token still present in the ledger has expired.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<RefreshOutcome> {
        let now = Utc::now();
        let claims = match self.codec.verify(refresh_token, TokenKind::Refresh, now) {
            Ok(claims) => Some(claims),
            // Expiry is only reported for tokens the ledger still holds.
            Err(TokenError::Expired) => None,
            Err(_) => return Err(AuthError::InvalidToken),
        };

        // The stored row is authoritative: revoked or reaped tokens are
        // invalid, whatever their own expiry says.
        let Some(record) = self.ledger.find_by_token(refresh_token).await? else {
            return Err(AuthError::InvalidToken);
        };
        let Some(claims) = claims.filter(|_| !record.is_expired_at(now)) else {
            return Err(AuthError::TokenExpired);
        };

        let identity = self
            .credentials
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                anyhow!(
                    "refresh token {} references missing identity {}",
                    record.id,
                    claims.sub
                )
            })?
            .identity;

        let access = self
            .codec
            .issue(identity.id, TokenKind::Access, self.config.access_ttl_seconds(), now)
            .context("failed to issue access token")?;

        Ok(RefreshOutcome {
            access_token: access.token,
            expires_in: self.config.access_ttl_seconds(),
        })
    }

    /// Drop the stored refresh token. Unknown tokens are ignored.
    ///
    /// # Errors
    /// Only storage failures.
    #[instrument(skip_all)]
    pub async fn logout(&self, refresh_token: &str) -> AuthResult<()> {
        self.ledger.delete_by_token(refresh_token).await?;
        Ok(())
    }

    /// Resolve an access bearer to its identity id without touching storage.
    ///
    /// # Errors
    /// `TokenExpired` or `InvalidToken`.
    pub fn validate_access(&self, bearer: &str) -> AuthResult<Uuid> {
        self.codec
            .verify(bearer, TokenKind::Access, Utc::now())
            .map(|claims| claims.sub)
            .map_err(token_failure)
    }

    /// Delete every refresh token record whose expiry has passed.
    ///
    /// # Errors
    /// Only storage failures.
    #[instrument(skip_all)]
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let removed = self.ledger.delete_expired(Utc::now()).await?;
        Ok(removed)
    }

    /// Delete login attempts older than the rate-limit window. Emails that
    /// never log in successfully would otherwise keep theirs forever.
    ///
    /// # Errors
    /// Only storage failures.
    #[instrument(skip_all)]
    pub async fn prune_attempts(&self) -> AuthResult<u64> {
        let removed = self.limiter.prune(Utc::now()).await?;
        Ok(removed)
    }

    /// # Errors
    /// Returns an error if the credential store is unreachable.
    pub async fn ping_store(&self) -> anyhow::Result<()> {
        self.credentials.ping().await
    }

    async fn hash_password(&self, password: String) -> anyhow::Result<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .context("password hashing task failed")?
    }

    async fn verify_password(
        &self,
        digest: String,
        password: String,
    ) -> anyhow::Result<PasswordCheck> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&digest, &password))
            .await
            .context("password verification task failed")?
    }
}

fn token_failure(err: TokenError) -> AuthError {
    match err {
        TokenError::Expired => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    }
}
