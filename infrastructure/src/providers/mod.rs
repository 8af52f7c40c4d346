//! AI service adapters
//!
//! - [`OfflineAiService`]: deterministic local generation, no network
//! - [`HttpAiService`]: OpenAI-compatible chat endpoint (feature `http-provider`)

pub mod offline;
pub mod parsing;

#[cfg(feature = "http-provider")]
pub mod http;

pub use offline::OfflineAiService;

#[cfg(feature = "http-provider")]
pub use http::{HttpAiService, HttpProviderSettings};
