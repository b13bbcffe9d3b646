//! # Archgen Generator
//!
//! Turns an architecture description into a candidate `diagrams` script:
//! build the prompt, ask a [`TextGenerator`], pull the code out of the
//! answer and record token usage.
//!
//! The Bedrock backend is the production generator; [`CannedGenerator`]
//! replays a recorded answer for offline runs.

mod bedrock;
mod error;
mod generator;
mod prompt;
mod response;
mod usage;

pub use bedrock::{
    BedrockConfig, BedrockGenerator, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_REGION,
    DEFAULT_TEMPERATURE,
};
pub use error::{GenerationError, Result};
pub use generator::{CannedGenerator, Generation, TextGenerator};
pub use prompt::build_prompt;
pub use response::extract_code;
pub use usage::{append_usage_log, TokenUsage};
