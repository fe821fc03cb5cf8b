use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::models::{Role, UserRecord};

use super::error::AuthError;

/// Credential file name in the data directory
const CREDENTIALS_FILE: &str = "users.csv";

/// Compute the hex-encoded SHA-256 digest of a password.
pub fn digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Capability interface over credential storage, so the flat-file backend
/// can be swapped without touching the login flow.
pub trait CredentialStore {
    /// Add an account. Usernames are unique; duplicates are rejected.
    fn register(&self, username: &str, password: &str, role: Role) -> Result<(), AuthError>;

    /// Check a username/password pair, returning the account role on match.
    fn authenticate(&self, username: &str, password: &str) -> Result<Role, AuthError>;
}

/// Flat-file credential store: append-only UTF-8 rows of
/// `username,hex-digest,role`, no header.
///
/// The format has no escaping, so `register` rejects usernames that would
/// corrupt it (commas, newlines, control characters). A missing file is
/// treated as an empty store, never as an error.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(data_dir: &Path) -> Self {
        FileCredentialStore {
            path: data_dir.join(CREDENTIALS_FILE),
        }
    }

    #[cfg(test)]
    pub fn with_path(path: PathBuf) -> Self {
        FileCredentialStore { path }
    }

    /// Read all well-formed records. Malformed rows are logged and skipped
    /// rather than failing the whole scan.
    fn records(&self) -> Result<Vec<UserRecord>, AuthError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let mut records = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            match UserRecord::parse_line(line) {
                Some(record) => records.push(record),
                None => warn!(line = line_no + 1, "Skipping malformed credential row"),
            }
        }
        Ok(records)
    }

    fn has_user(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.records()?.iter().any(|r| r.username == username))
    }
}

fn is_valid_username(username: &str) -> bool {
    !username.is_empty() && !username.chars().any(|c| c == ',' || c.is_control())
}

impl CredentialStore for FileCredentialStore {
    fn register(&self, username: &str, password: &str, role: Role) -> Result<(), AuthError> {
        if !is_valid_username(username) {
            return Err(AuthError::InvalidUsername);
        }
        if self.has_user(username)? {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }

        let record = UserRecord {
            username: username.to_string(),
            password_digest: digest(password),
            role,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", record.to_line())?;

        debug!(username, %role, "Registered new account");
        Ok(())
    }

    fn authenticate(&self, username: &str, password: &str) -> Result<Role, AuthError> {
        let wanted = digest(password);
        // Linear scan, first exact match wins
        self.records()?
            .iter()
            .find(|r| r.username == username && r.password_digest == wanted)
            .map(|r| r.role)
            .ok_or(AuthError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileCredentialStore) {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_register_then_authenticate_returns_role() {
        let (_dir, store) = store();
        store.register("alice", "pw1", Role::Patient).unwrap();
        store.register("bob", "pw2", Role::HealthWorker).unwrap();

        assert_eq!(store.authenticate("alice", "pw1").unwrap(), Role::Patient);
        assert_eq!(store.authenticate("bob", "pw2").unwrap(), Role::HealthWorker);
    }

    #[test]
    fn test_authenticate_failure_cases_are_uniform() {
        let (_dir, store) = store();
        store.register("alice", "pw1", Role::Patient).unwrap();

        // Wrong password, unknown user, and a password registered to
        // someone else all fail the same way.
        assert!(matches!(
            store.authenticate("alice", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            store.authenticate("bob", "pw1"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_missing_store_is_no_such_user() {
        let (_dir, store) = store();
        assert!(matches!(
            store.authenticate("alice", "pw1"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (_dir, store) = store();
        store.register("alice", "pw1", Role::Patient).unwrap();
        assert!(matches!(
            store.register("alice", "pw2", Role::HealthWorker),
            Err(AuthError::DuplicateUsername(_))
        ));
        // Original registration is untouched
        assert_eq!(store.authenticate("alice", "pw1").unwrap(), Role::Patient);
    }

    #[test]
    fn test_invalid_usernames_rejected() {
        let (_dir, store) = store();
        assert!(matches!(
            store.register("", "pw", Role::Patient),
            Err(AuthError::InvalidUsername)
        ));
        assert!(matches!(
            store.register("a,b", "pw", Role::Patient),
            Err(AuthError::InvalidUsername)
        ));
        assert!(matches!(
            store.register("a\nb", "pw", Role::Patient),
            Err(AuthError::InvalidUsername)
        ));
    }

    #[test]
    fn test_digest_is_deterministic_and_distinct() {
        assert_eq!(digest("pw1"), digest("pw1"));
        assert_eq!(digest("pw1").len(), 64);

        let passwords = ["pw1", "pw2", "password", "p@ssw0rd", ""];
        for a in &passwords {
            for b in &passwords {
                if a != b {
                    assert_ne!(digest(a), digest(b));
                }
            }
        }
    }

    #[test]
    fn test_first_match_wins_on_externally_written_duplicates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "alice,{},Patient", digest("pw1")).unwrap();
        writeln!(file, "alice,{},Health Worker", digest("pw1")).unwrap();

        let store = FileCredentialStore::with_path(path);
        assert_eq!(store.authenticate("alice", "pw1").unwrap(), Role::Patient);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "not a record at all").unwrap();
        writeln!(file, "alice,{},Patient", digest("pw1")).unwrap();

        let store = FileCredentialStore::with_path(path);
        assert_eq!(store.authenticate("alice", "pw1").unwrap(), Role::Patient);
    }
}
