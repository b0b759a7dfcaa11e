//! Text Service
//!
//! Builds prompts for subtitle and edit-suggestion requests, enforces the
//! request timeout, and delivers results for clip-bound requests as events.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::core::{
    ai::TextGenerator, new_id, settings::AISettings, ClipId, CoreError, CoreResult,
};

/// Shown when the subtitle request returned nothing
pub const NO_SUBTITLES_PLACEHOLDER: &str = "No subtitles generated.";
/// Shown when the subtitle request failed
pub const SUBTITLE_ERROR_PLACEHOLDER: &str = "Error generating subtitles. Please check API Key.";
/// Shown when the suggestion request returned nothing
pub const NO_SUGGESTIONS_PLACEHOLDER: &str = "No suggestions available.";
/// Shown when the suggestion request failed
pub const SUGGESTION_ERROR_PLACEHOLDER: &str = "Could not fetch suggestions.";

/// Request identifier (ULID)
pub type RequestId = String;

// =============================================================================
// Request Kinds
// =============================================================================

/// What is being generated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationKind {
    /// Timed subtitles from a transcript snippet
    Subtitles,
    /// Creative edit ideas from a scene description
    EditSuggestions,
}

impl GenerationKind {
    pub fn prompt(&self, context: &str) -> String {
        match self {
            GenerationKind::Subtitles => format!(
                "Generate synchronized subtitles for a video with the following context/transcript snippet. \
                 Format as SRT or JSON with timestamps. Context: {}",
                context
            ),
            GenerationKind::EditSuggestions => format!(
                "I am editing a video. Here is the scene description: \"{}\". \
                 Suggest 3 creative edit ideas (cuts, effects, or transitions) to make it more engaging for social media.",
                context
            ),
        }
    }

    fn empty_placeholder(&self) -> &'static str {
        match self {
            GenerationKind::Subtitles => NO_SUBTITLES_PLACEHOLDER,
            GenerationKind::EditSuggestions => NO_SUGGESTIONS_PLACEHOLDER,
        }
    }

    fn error_placeholder(&self) -> &'static str {
        match self {
            GenerationKind::Subtitles => SUBTITLE_ERROR_PLACEHOLDER,
            GenerationKind::EditSuggestions => SUGGESTION_ERROR_PLACEHOLDER,
        }
    }
}

/// Text to show for a generation result; failures and empty answers become
/// fixed placeholder strings.
pub fn display_text(kind: GenerationKind, result: &CoreResult<String>) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text.clone(),
        Ok(_) => kind.empty_placeholder().to_string(),
        Err(_) => kind.error_placeholder().to_string(),
    }
}

// =============================================================================
// Events
// =============================================================================

/// Completion of a clip-bound generation request
#[derive(Debug)]
pub struct GenerationEvent {
    pub request_id: RequestId,
    /// Clip the result is meant for; it may have been deleted meanwhile
    pub clip_id: ClipId,
    pub kind: GenerationKind,
    pub result: CoreResult<String>,
}

// =============================================================================
// Text Service
// =============================================================================

/// Front end to a [`TextGenerator`]
pub struct TextService {
    generator: Arc<dyn TextGenerator>,
    model: String,
    timeout: Duration,
    event_tx: mpsc::UnboundedSender<GenerationEvent>,
    event_rx: Option<mpsc::UnboundedReceiver<GenerationEvent>>,
}

impl fmt::Debug for TextService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextService")
            .field("generator", &self.generator.name())
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TextService {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: &AISettings) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            generator,
            model: settings.model.clone(),
            timeout: Duration::from_secs(settings.request_timeout_secs),
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Takes the receiver for clip-bound results. Only the first call gets it.
    pub fn take_event_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<GenerationEvent>> {
        self.event_rx.take()
    }

    /// Generates subtitles for a transcript snippet
    pub async fn generate_subtitles(&self, context: &str) -> CoreResult<String> {
        self.generate(GenerationKind::Subtitles, context).await
    }

    /// Asks for edit ideas for a scene description
    pub async fn suggest_edits(&self, description: &str) -> CoreResult<String> {
        self.generate(GenerationKind::EditSuggestions, description)
            .await
    }

    pub async fn generate(&self, kind: GenerationKind, context: &str) -> CoreResult<String> {
        run_request(
            Arc::clone(&self.generator),
            self.model.clone(),
            self.timeout,
            kind,
            context.to_string(),
        )
        .await
    }

    /// Starts a request whose result is meant for `clip_id`.
    ///
    /// Returns immediately; the outcome arrives as a [`GenerationEvent`].
    /// Must be called from within a tokio runtime.
    pub fn request_for_clip(
        &self,
        clip_id: &str,
        kind: GenerationKind,
        context: &str,
    ) -> CoreResult<RequestId> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| CoreError::AIRequestFailed(format!("No async runtime: {}", e)))?;

        let request_id = new_id();
        let event_request_id = request_id.clone();
        let event_clip_id = clip_id.to_string();
        let generator = Arc::clone(&self.generator);
        let model = self.model.clone();
        let timeout = self.timeout;
        let context = context.to_string();
        let tx = self.event_tx.clone();

        handle.spawn(async move {
            let result = run_request(generator, model, timeout, kind, context).await;
            let event = GenerationEvent {
                request_id: event_request_id,
                clip_id: event_clip_id,
                kind,
                result,
            };
            if tx.send(event).is_err() {
                debug!("Generation result dropped: receiver closed");
            }
        });

        debug!("Started {:?} request {} for clip {}", kind, request_id, clip_id);
        Ok(request_id)
    }
}

async fn run_request(
    generator: Arc<dyn TextGenerator>,
    model: String,
    timeout: Duration,
    kind: GenerationKind,
    context: String,
) -> CoreResult<String> {
    let prompt = kind.prompt(&context);
    match tokio::time::timeout(timeout, generator.generate(&model, &prompt)).await {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            warn!("{} request to {} failed: {}", model, generator.name(), e);
            Err(e)
        }
        Err(_) => {
            warn!("{} request to {} timed out", model, generator.name());
            Err(CoreError::AIRequestFailed(format!(
                "Request timed out after {}s",
                timeout.as_secs_f64()
            )))
        }
    }
}
