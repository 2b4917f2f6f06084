use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

use crate::auth::MIN_SECRET_LEN;

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_ACCESS_TOKEN_TTL_SECONDS: &str = "access-token-ttl-seconds";
pub const ARG_REFRESH_TOKEN_TTL_SECONDS: &str = "refresh-token-ttl-seconds";
pub const ARG_LOGIN_RATE_LIMIT: &str = "login-rate-limit";
pub const ARG_LOGIN_RATE_WINDOW_SECONDS: &str = "login-rate-window-seconds";
pub const ARG_TOKEN_CLEANUP_INTERVAL_SECONDS: &str = "token-cleanup-interval-seconds";
pub const ARG_ALLOWED_ORIGINS: &str = "allowed-origins";

#[derive(Debug)]
pub struct Options {
    pub jwt_secret: SecretString,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
    pub login_rate_limit: u32,
    pub login_rate_window_seconds: i64,
    pub token_cleanup_interval_seconds: u64,
    pub allowed_origins: Vec<String>,
}

impl Options {
    /// Parse auth arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the signing secret is missing or too short, or a
    /// lifetime is not positive.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let secret = matches
            .get_one::<String>(ARG_JWT_SECRET)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_JWT_SECRET}"))?;
        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("--{ARG_JWT_SECRET} must be at least {MIN_SECRET_LEN} bytes");
        }

        let read_positive = |id: &str| -> anyhow::Result<i64> {
            let value = matches.get_one::<i64>(id).copied().unwrap_or_default();
            if value <= 0 {
                anyhow::bail!("--{id} must be greater than zero");
            }
            Ok(value)
        };

        let allowed_origins = matches
            .get_one::<String>(ARG_ALLOWED_ORIGINS)
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            jwt_secret: SecretString::from(secret),
            access_token_ttl_seconds: read_positive(ARG_ACCESS_TOKEN_TTL_SECONDS)?,
            refresh_token_ttl_seconds: read_positive(ARG_REFRESH_TOKEN_TTL_SECONDS)?,
            login_rate_limit: matches
                .get_one::<u32>(ARG_LOGIN_RATE_LIMIT)
                .copied()
                .unwrap_or(5),
            login_rate_window_seconds: read_positive(ARG_LOGIN_RATE_WINDOW_SECONDS)?,
            token_cleanup_interval_seconds: matches
                .get_one::<u64>(ARG_TOKEN_CLEANUP_INTERVAL_SECONDS)
                .copied()
                .unwrap_or(86_400),
            allowed_origins,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_token_args(command);
    let command = with_login_args(command);
    command.arg(
        Arg::new(ARG_ALLOWED_ORIGINS)
            .long(ARG_ALLOWED_ORIGINS)
            .help("Comma separated list of origins allowed by CORS")
            .env("CUSTODIAN_ALLOWED_ORIGINS")
            .default_value("http://localhost:5173"),
    )
}

fn with_token_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Token signing secret (at least 32 bytes)")
                .env("CUSTODIAN_JWT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_ACCESS_TOKEN_TTL_SECONDS)
                .long(ARG_ACCESS_TOKEN_TTL_SECONDS)
                .help("Access token TTL in seconds")
                .env("CUSTODIAN_ACCESS_TOKEN_TTL_SECONDS")
                .default_value("1800")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_REFRESH_TOKEN_TTL_SECONDS)
                .long(ARG_REFRESH_TOKEN_TTL_SECONDS)
                .help("Refresh token TTL in seconds")
                .env("CUSTODIAN_REFRESH_TOKEN_TTL_SECONDS")
                .default_value("2592000")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_TOKEN_CLEANUP_INTERVAL_SECONDS)
                .long(ARG_TOKEN_CLEANUP_INTERVAL_SECONDS)
                .help("Interval between expired refresh token cleanups in seconds")
                .env("CUSTODIAN_TOKEN_CLEANUP_INTERVAL_SECONDS")
                .default_value("86400")
                .value_parser(clap::value_parser!(u64)),
        )
}

fn with_login_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_LOGIN_RATE_LIMIT)
                .long(ARG_LOGIN_RATE_LIMIT)
                .help("Login attempts allowed per email within the rate window")
                .env("CUSTODIAN_LOGIN_RATE_LIMIT")
                .default_value("5")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_LOGIN_RATE_WINDOW_SECONDS)
                .long(ARG_LOGIN_RATE_WINDOW_SECONDS)
                .help("Login rate window in seconds")
                .env("CUSTODIAN_LOGIN_RATE_WINDOW_SECONDS")
                .default_value("900")
                .value_parser(clap::value_parser!(i64)),
        )
}
