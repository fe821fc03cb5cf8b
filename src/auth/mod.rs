//! Authentication module for accounts and login sessions.
//!
//! This module provides:
//! - `CredentialStore` / `FileCredentialStore`: flat-file account storage
//!   with SHA-256 password digests
//! - `Session`: file-backed login session keyed by a generated token
//!
//! Sessions persist to disk and never expire; sign-out removes them.

pub mod credentials;
pub mod error;
pub mod session;

pub use credentials::{digest, CredentialStore, FileCredentialStore};
pub use error::AuthError;
pub use session::{Session, SessionData};
