//! Mock generator for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use wordwise_core::traits::{BlurbRequest, GeneratedText, TextGenerator};

/// A generator with a canned reply (or failure) that records its calls.
pub struct MockGenerator {
    reply: Result<String, String>,
    call_count: AtomicU32,
    last_request: Mutex<Option<BlurbRequest>>,
}

impl MockGenerator {
    /// A mock that always returns `text`.
    pub fn with_fixed_response(text: &str) -> Self {
        Self::with_reply(Ok(text.to_string()))
    }

    /// A mock whose every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self::with_reply(Err(message.to_string()))
    }

    fn with_reply(reply: Result<String, String>) -> Self {
        Self {
            reply,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this generator.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this generator.
    pub fn last_request(&self) -> Option<BlurbRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &BlurbRequest) -> anyhow::Result<GeneratedText> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request.clone());

        match &self.reply {
            Ok(text) => Ok(GeneratedText {
                text: text.clone(),
                model: "mock-model".into(),
                latency_ms: 1,
            }),
            Err(message) => Err(anyhow::anyhow!("{message}")),
        }
    }
}
