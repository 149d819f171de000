//! Deterministic generator that needs no network.

use async_trait::async_trait;

use wordwise_core::blurb::generate_blurb;
use wordwise_core::traits::{BlurbRequest, GeneratedText, TextGenerator};

/// Returns the template blurb for every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

impl OfflineGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextGenerator for OfflineGenerator {
    fn name(&self) -> &str {
        "offline"
    }

    async fn generate(&self, request: &BlurbRequest) -> anyhow::Result<GeneratedText> {
        Ok(GeneratedText {
            text: generate_blurb(&request.known_words, &request.new_words, request.length),
            model: "template".into(),
            latency_ms: 0,
        })
    }
}
