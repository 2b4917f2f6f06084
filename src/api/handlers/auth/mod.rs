//! Auth handlers.
//!
//! Handlers only translate between JSON and the engine. Status codes are
//! chosen from [`crate::auth::AuthErrorKind`] in `errors`.

mod errors;
pub(crate) mod login;
pub(crate) mod principal;
pub(crate) mod refresh;
pub(crate) mod setup;
pub(crate) mod types;

pub use errors::{error_response, status_for};
pub use principal::{Principal, require_auth};
