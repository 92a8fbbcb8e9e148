//! Detailed analysis text for a detected skin condition.
//!
//! An OpenAI-compatible chat service writes the five sections when a key is
//! configured. Anything short of a clean structured reply falls back to the
//! section parser, then to canned templates, so callers always get complete
//! text.

pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod prompt;
pub mod sections;

pub use client::{ChatBackend, ChatCompletionClient, ChatRequest};
pub use config::AnalysisConfig;
pub use error::AnalysisServiceError;
pub use fallback::canned_analysis;
pub use generator::AnalysisGenerator;
pub use prompt::{build_messages, build_prompt, ChatMessage, SYSTEM_PROMPT};
pub use sections::parse_sections;
