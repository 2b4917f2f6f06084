use crate::{api, auth::AuthConfig};
use anyhow::Result;
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub jwt_secret: SecretString,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
    pub login_rate_limit: u32,
    pub login_rate_window_seconds: i64,
    pub token_cleanup_interval_seconds: u64,
    pub allowed_origins: Vec<String>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the store is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let auth_config = AuthConfig::new(args.jwt_secret)
        .with_access_ttl_seconds(args.access_token_ttl_seconds)
        .with_refresh_ttl_seconds(args.refresh_token_ttl_seconds)
        .with_login_limit(args.login_rate_limit)
        .with_login_window_seconds(args.login_rate_window_seconds)
        .with_cleanup_interval_seconds(args.token_cleanup_interval_seconds);

    debug!("Auth config: {:?}", auth_config);

    api::new(args.port, args.dsn, auth_config, args.allowed_origins).await
}
