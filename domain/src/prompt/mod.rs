//! Prompt domain
//!
//! Templates for generating prompts at each stage of a request.

mod template;

pub use template::PromptTemplate;
