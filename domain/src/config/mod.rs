//! Configuration value objects for the domain layer
//!
//! Shared by the application and infrastructure layers when validating
//! user-supplied configuration.

pub mod validation;

pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
