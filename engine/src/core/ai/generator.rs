//! Text Generator Trait
//!
//! Defines the seam to the external text-generation provider.

use std::time::Duration;

use async_trait::async_trait;

use crate::core::{CoreError, CoreResult};

// =============================================================================
// Text Generator Trait
// =============================================================================

/// External text-generation provider
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the provider name
    fn name(&self) -> &str;

    /// Generates text for a prompt with the given model.
    ///
    /// An empty string is a valid (if useless) answer; transport or
    /// credential failures are `AIRequestFailed`.
    async fn generate(&self, model: &str, prompt: &str) -> CoreResult<String>;

    /// Checks if the provider is configured and reachable
    fn is_available(&self) -> bool {
        true
    }
}

// =============================================================================
// Mock Generator (for testing and offline use)
// =============================================================================

/// Generator returning a canned response
#[derive(Clone, Debug)]
pub struct MockTextGenerator {
    name: String,
    response: String,
    available: bool,
    delay: Option<Duration>,
}

impl MockTextGenerator {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            response: "Mock response".to_string(),
            available: true,
            delay: None,
        }
    }

    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Makes every request wait before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, _model: &str, _prompt: &str) -> CoreResult<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if !self.available {
            return Err(CoreError::AIRequestFailed(
                "Provider not available".to_string(),
            ));
        }
        Ok(self.response.clone())
    }

    fn is_available(&self) -> bool {
        self.available
    }
}
