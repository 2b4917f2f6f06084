//! Input shape checks for bootstrap and login.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{
    error::{AuthError, AuthResult},
    models::{BootstrapInput, LoginInput},
};

const BOOTSTRAP_MIN_PASSWORD_LEN: usize = 8;
const LOGIN_MIN_PASSWORD_LEN: usize = 6;
const NAME_MIN_LEN: usize = 2;
const NAME_MAX_LEN: usize = 255;

// `local@domain.tld`, no whitespace and a single `@`.
static EMAIL_SHAPE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Emails are compared exactly as stored, so nothing is normalized here.
pub(crate) fn valid_email(email: &str) -> bool {
    EMAIL_SHAPE
        .as_ref()
        .is_some_and(|shape| shape.is_match(email))
}

pub(crate) fn validate_bootstrap(input: &BootstrapInput) -> AuthResult<()> {
    if !valid_email(&input.email) {
        return Err(AuthError::invalid_input("email must be a valid address"));
    }
    if input.password.chars().count() < BOOTSTRAP_MIN_PASSWORD_LEN {
        return Err(AuthError::invalid_input(format!(
            "password must be at least {BOOTSTRAP_MIN_PASSWORD_LEN} characters"
        )));
    }
    let name_len = input.name.trim().chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&name_len) {
        return Err(AuthError::invalid_input(format!(
            "name must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters"
        )));
    }
    Ok(())
}

pub(crate) fn validate_login(input: &LoginInput) -> AuthResult<()> {
    if !valid_email(&input.email) {
        return Err(AuthError::invalid_input("email must be a valid address"));
    }
    if input.password.chars().count() < LOGIN_MIN_PASSWORD_LEN {
        return Err(AuthError::invalid_input(format!(
            "password must be at least {LOGIN_MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
