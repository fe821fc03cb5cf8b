//! Data models for the triage demo.
//!
//! This module contains the data structures shared across the app:
//!
//! - `Role`, `UserRecord`: account types backing the credential file
//! - `TriageCase`, `CaseStatus`, `Urgency`: the mock caseload shown to
//!   health workers, plus its filter/sort helpers

pub mod case;
pub mod user;

pub use case::{seed_cases, visible_case_indices, CaseStatus, StatusFilter, TriageCase, Urgency};
pub use user::{Role, UserRecord};
