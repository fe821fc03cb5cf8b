use thiserror::Error;

/// Errors from the credential store.
///
/// Authentication deliberately collapses wrong password, unknown user, and
/// missing store into a single `InvalidCredentials` so the login screen
/// shows one generic message for every failure cause.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username '{0}' is already registered")]
    DuplicateUsername(String),

    #[error("Username must not be empty or contain commas or control characters")]
    InvalidUsername,

    #[error("Credential store error: {0}")]
    Io(#[from] std::io::Error),
}
