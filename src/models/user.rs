use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account role, stored in the credential file and matched exhaustively
/// everywhere a screen branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Patient,
    HealthWorker,
}

impl Role {
    /// Tag written to the credential file.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Role::Patient => "Patient",
            Role::HealthWorker => "Health Worker",
        }
    }

    /// Toggle between the two roles (used by the sign-up role selector).
    pub fn toggle(&self) -> Self {
        match self {
            Role::Patient => Role::HealthWorker,
            Role::HealthWorker => Role::Patient,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "health worker" | "healthworker" | "health_worker" => Ok(Role::HealthWorker),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// One row of the credential file: `username,hex-digest,role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub password_digest: String,
    pub role: Role,
}

impl UserRecord {
    /// Parse a credential file row. Returns `None` for rows that do not
    /// have exactly three fields or carry an unknown role tag.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.split(',');
        let username = fields.next()?;
        let digest = fields.next()?;
        let role = fields.next()?;
        if fields.next().is_some() || username.is_empty() || digest.is_empty() {
            return None;
        }
        Some(UserRecord {
            username: username.to_string(),
            password_digest: digest.to_string(),
            role: role.parse().ok()?,
        })
    }

    /// Serialize back to a credential file row (no trailing newline).
    pub fn to_line(&self) -> String {
        format!("{},{},{}", self.username, self.password_digest, self.role.as_tag())
    }
}
