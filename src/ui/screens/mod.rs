//! Role-specific screen rendering.

pub mod patient;
pub mod triage;
