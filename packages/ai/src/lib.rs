#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analysis gateway with LLM provider abstraction.
//!
//! Supports Anthropic Claude and `OpenAI` GPT via a common trait. Each
//! analysis task (clip classification, uploaded-video analysis, incident
//! chat, summarization) is rendered into a provider-neutral prompt, sent
//! through the configured provider, and parsed back into a typed result.
//! Video payloads arrive as data URIs and are validated before any
//! provider request is built.

pub mod gateway;
pub mod media;
pub mod prompts;
pub mod providers;

use thiserror::Error;

/// Errors that can occur during analysis operations.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// HTTP request to LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// Model output did not match the expected shape.
    #[error("Schema error: {message}")]
    Schema {
        /// Description of the mismatch.
        message: String,
    },

    /// Rejected media payload.
    #[error("Media error: {message}")]
    Media {
        /// Why the payload was rejected.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}
