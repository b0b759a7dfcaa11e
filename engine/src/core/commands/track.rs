//! Track Commands Module

use serde::{Deserialize, Serialize};

use crate::core::{
    commands::{Command, CommandResult, StateChange},
    new_id,
    timeline::{MediaKind, Timeline, Track},
    CoreResult, TrackId,
};

/// Command to append a new, empty track
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackCommand {
    pub name: String,
    pub kind: MediaKind,
    #[serde(skip)]
    created_track_id: Option<TrackId>,
}

impl AddTrackCommand {
    pub fn new(name: &str, kind: MediaKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            created_track_id: None,
        }
    }

    pub fn created_track_id(&self) -> Option<&str> {
        self.created_track_id.as_deref()
    }
}

impl Command for AddTrackCommand {
    fn execute(&mut self, timeline: &mut Timeline) -> CoreResult<CommandResult> {
        let track_id = timeline.add_track(Track::new(&self.name, self.kind))?;
        self.created_track_id = Some(track_id.clone());

        let op_id = new_id();
        Ok(CommandResult::new(&op_id)
            .with_change(StateChange::TrackCreated {
                track_id: track_id.clone(),
            })
            .with_created_id(&track_id))
    }

    fn type_name(&self) -> &'static str {
        "AddTrack"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}
