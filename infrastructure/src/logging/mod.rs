//! Request event log
//!
//! Provides [`JsonlEventLogger`], a JSONL file writer that implements
//! the [`RequestEventLogger`](thinktank_application::RequestEventLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlEventLogger;
