//! Use cases (application services)
//!
//! [`process_input::Orchestrator`] is the entry point; the other use cases
//! are its building blocks and can be used on their own.

pub mod collaborate;
pub mod fallback;
pub mod generate_thoughts;
pub mod optimize_response;
pub mod process_input;

#[cfg(test)]
pub(crate) mod test_support;
