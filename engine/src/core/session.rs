//! Editor Session
//!
//! Owns the Timeline Model for one open project together with the tool
//! registry, the interaction controller and the pointer-event queue. All
//! mutations happen synchronously on the thread driving the session; text
//! generation results arrive over a channel and are applied when drained.

use std::collections::VecDeque;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::core::{
    ai::{GenerationEvent, GenerationKind, RequestId, TextService},
    assets::AssetRecord,
    commands::{AddClipCommand, CommandExecutor, CommandPayload, CommandResult},
    export::ExportManifest,
    interaction::{EventOutcome, InteractionController, PointerEvent},
    settings::AppSettings,
    timeline::{MediaKind, Timeline},
    tools::ToolRegistry,
    CoreError, CoreResult, TimeSec,
};

/// One open project
#[derive(Debug)]
pub struct EditorSession {
    timeline: Timeline,
    tools: ToolRegistry,
    controller: InteractionController,
    executor: CommandExecutor,
    settings: AppSettings,
    pending_events: VecDeque<PointerEvent>,
    text_service: Option<TextService>,
    generation_rx: Option<mpsc::UnboundedReceiver<GenerationEvent>>,
}

impl EditorSession {
    /// Starts a new project with the default lanes
    pub fn new(settings: AppSettings) -> Self {
        let timeline = Timeline::with_default_tracks(settings.initial_viewport());
        Self::open(timeline, settings)
    }

    /// Opens an existing timeline. Selection and viewport are reset; they are
    /// not part of the project.
    pub fn open(mut timeline: Timeline, settings: AppSettings) -> Self {
        timeline.reset_view_state(settings.initial_viewport());
        info!(
            "Opened timeline: {} track(s), {} clip(s), {:.2}s",
            timeline.tracks().len(),
            timeline.clips().count(),
            timeline.duration()
        );
        Self {
            timeline,
            tools: ToolRegistry::new(),
            controller: InteractionController::from_settings(&settings.editor),
            executor: CommandExecutor::new(),
            settings,
            pending_events: VecDeque::new(),
            text_service: None,
            generation_rx: None,
        }
    }

    /// Parses and opens a timeline document
    pub fn open_json(json: &str, settings: AppSettings) -> CoreResult<Self> {
        Ok(Self::open(Timeline::from_json(json)?, settings))
    }

    /// Attaches the text-generation service and takes its result channel
    pub fn with_text_service(mut self, mut service: TextService) -> Self {
        self.generation_rx = service.take_event_receiver();
        self.text_service = Some(service);
        self
    }

    /// Restores a saved palette configuration
    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Direct access to the model operations
    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolRegistry {
        &mut self.tools
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn text_service(&self) -> Option<&TextService> {
        self.text_service.as_ref()
    }

    // =========================================================================
    // Pointer Events
    // =========================================================================

    /// Queues a pointer message for the next [`EditorSession::process_events`]
    pub fn push_event(&mut self, event: PointerEvent) {
        self.pending_events.push_back(event);
    }

    pub fn pending_event_count(&self) -> usize {
        self.pending_events.len()
    }

    /// Feeds every queued pointer message to the controller, in order
    pub fn process_events(&mut self) -> Vec<EventOutcome> {
        let mut outcomes = Vec::with_capacity(self.pending_events.len());
        while let Some(event) = self.pending_events.pop_front() {
            outcomes.push(
                self.controller
                    .handle(&event, &mut self.timeline, &mut self.tools),
            );
        }
        outcomes
    }

    // =========================================================================
    // Commands
    // =========================================================================

    pub fn execute(&mut self, payload: CommandPayload) -> CoreResult<CommandResult> {
        self.executor.execute_payload(payload, &mut self.timeline)
    }

    /// Runs a command script; the timeline changes only if every command succeeds
    pub fn run_script(&mut self, payloads: Vec<CommandPayload>) -> CoreResult<Vec<CommandResult>> {
        self.executor.run_script(payloads, &mut self.timeline)
    }

    /// Drops a library asset onto a track, logged like any other command
    pub fn drop_asset(
        &mut self,
        asset: &AssetRecord,
        track_id: &str,
        start_time: TimeSec,
    ) -> CoreResult<CommandResult> {
        let clip = asset.clip_template(start_time).ok_or_else(|| {
            CoreError::ValidationError(format!("asset {} cannot be placed as a clip", asset.id))
        })?;
        let command = AddClipCommand::from_clip(track_id, &clip);
        self.executor.execute(Box::new(command), &mut self.timeline)
    }

    /// The "Split" button: splits selected clips under the playhead
    pub fn split_at_playhead(&mut self) -> usize {
        self.timeline.split_selected_at_playhead().len()
    }

    pub fn export_manifest(&self) -> ExportManifest {
        ExportManifest::from_timeline(&self.timeline, &self.settings.export)
    }

    // =========================================================================
    // Text Generation
    // =========================================================================

    /// Requests subtitles for a text clip; the result lands in the clip's text
    pub fn request_subtitles(&self, clip_id: &str, context: &str) -> CoreResult<RequestId> {
        let (_, clip) = self
            .timeline
            .find_clip(clip_id)
            .ok_or_else(|| CoreError::ClipNotFound(clip_id.to_string()))?;
        if clip.kind != MediaKind::Text {
            return Err(CoreError::ValidationError(format!(
                "subtitles target a text clip, {} is a {} clip",
                clip_id, clip.kind
            )));
        }
        let service = self
            .text_service
            .as_ref()
            .ok_or_else(|| CoreError::AIRequestFailed("No text service configured".to_string()))?;
        service.request_for_clip(clip_id, GenerationKind::Subtitles, context)
    }

    /// Applies every generation result that has already arrived
    pub fn apply_generation_events(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let event = match self.generation_rx.as_mut() {
                Some(rx) => match rx.try_recv() {
                    Ok(event) => event,
                    Err(_) => break,
                },
                None => break,
            };
            if self.apply_generation_event(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next generation result and applies it.
    ///
    /// Returns `None` when no service is attached or the channel closed,
    /// otherwise whether the result was applied.
    pub async fn apply_next_generation_event(&mut self) -> Option<bool> {
        let event = self.generation_rx.as_mut()?.recv().await?;
        Some(self.apply_generation_event(event))
    }

    fn apply_generation_event(&mut self, event: GenerationEvent) -> bool {
        if !self.timeline.contains_clip(&event.clip_id) {
            debug!(
                "Discarding stale result {} for deleted clip {}",
                event.request_id, event.clip_id
            );
            return false;
        }
        let text = match event.result {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                debug!("Empty {:?} result {}", event.kind, event.request_id);
                return false;
            }
            Err(e) => {
                warn!("{:?} request {} failed: {}", event.kind, event.request_id, e);
                return false;
            }
        };
        match self.timeline.set_clip_text(&event.clip_id, &text) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not apply result {}: {}", event.request_id, e);
                false
            }
        }
    }
}
