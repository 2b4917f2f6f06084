//! Command-line argument dispatch.
//!
//! Maps validated CLI arguments to the action to run, currently always the
//! API server with its full auth configuration.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::auth;
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .filter(|v| !v.trim().is_empty())
        .context("missing required argument: --dsn")?;

    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        jwt_secret: auth_opts.jwt_secret,
        access_token_ttl_seconds: auth_opts.access_token_ttl_seconds,
        refresh_token_ttl_seconds: auth_opts.refresh_token_ttl_seconds,
        login_rate_limit: auth_opts.login_rate_limit,
        login_rate_window_seconds: auth_opts.login_rate_window_seconds,
        token_cleanup_interval_seconds: auth_opts.token_cleanup_interval_seconds,
        allowed_origins: auth_opts.allowed_origins,
    }))
}
