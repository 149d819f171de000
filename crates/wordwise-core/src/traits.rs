//! Trait definition for generative text backends.
//!
//! Implemented by the `wordwise-providers` crate. Nothing in the scheduling
//! core depends on a backend being reachable; see [`crate::blurb`] for the
//! offline fallback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Text generator trait
// ---------------------------------------------------------------------------

/// A backend that writes short learner-facing texts.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend name (e.g. "openai").
    fn name(&self) -> &str;

    /// Write a blurb for the request.
    async fn generate(&self, request: &BlurbRequest) -> anyhow::Result<GeneratedText>;
}

/// Request for a short text restricted to a vocabulary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlurbRequest {
    /// Words the learner already knows.
    #[serde(default)]
    pub known_words: Vec<String>,
    /// New (L+1) words to introduce.
    #[serde(default)]
    pub new_words: Vec<String>,
    /// Desired length in words.
    pub length: usize,
}

/// Text returned by a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedText {
    /// The cleaned text.
    pub text: String,
    /// Model that produced it.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

// ---------------------------------------------------------------------------
// Prompting
// ---------------------------------------------------------------------------

/// Default system prompt for blurb generation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You write very short texts for language learners. Use ONLY the words you are given, in lowercase, without punctuation. Respond with the text alone.";

/// User prompt describing the vocabulary constraint.
pub fn build_blurb_prompt(request: &BlurbRequest) -> String {
    format!(
        "Write about {} words using only these words.\nNew words (use each at least once): {}\nKnown words: {}",
        request.length,
        request.new_words.join(", "),
        request.known_words.join(", "),
    )
}

/// Strip markdown fences and surrounding quotes from a backend reply.
pub fn clean_generated_text(response: &str) -> String {
    let body: Vec<&str> = response
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect();
    body.join(" ")
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}
