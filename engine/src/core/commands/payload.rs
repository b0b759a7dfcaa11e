//! Command Payloads
//!
//! Wire form of commands: `{ "commandType": "...", "payload": { ... } }`.

use serde::{Deserialize, Serialize};

use crate::core::{
    commands::{
        AddClipCommand, AddTrackCommand, Command, DeleteClipCommand, MoveClipCommand,
        SelectCommand, SetPlayheadCommand, SetZoomCommand, SplitClipCommand,
    },
    CoreError, CoreResult,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "commandType", content = "payload", rename_all = "camelCase")]
pub enum CommandPayload {
    #[serde(alias = "AddClip", alias = "insertClip", alias = "InsertClip")]
    AddClip(AddClipCommand),
    #[serde(alias = "MoveClip")]
    MoveClip(MoveClipCommand),
    #[serde(alias = "SplitClip")]
    SplitClip(SplitClipCommand),
    #[serde(
        alias = "DeleteClip",
        alias = "removeClip",
        alias = "RemoveClip"
    )]
    DeleteClip(DeleteClipCommand),
    #[serde(alias = "AddTrack")]
    AddTrack(AddTrackCommand),
    #[serde(alias = "SetPlayhead")]
    SetPlayhead(SetPlayheadCommand),
    #[serde(alias = "SetZoom")]
    SetZoom(SetZoomCommand),
    #[serde(alias = "Select")]
    Select(SelectCommand),
}

impl CommandPayload {
    /// Parses one command from its type name and JSON payload
    pub fn parse(command_type: &str, payload: serde_json::Value) -> CoreResult<Self> {
        let raw_request = serde_json::json!({
            "commandType": command_type,
            "payload": payload
        });
        serde_json::from_value(raw_request)
            .map_err(|e| CoreError::InvalidCommand(format!("Invalid command payload: {}", e)))
    }

    /// Parses a script: a JSON array of `{ commandType, payload }` objects
    pub fn parse_script(json: &str) -> CoreResult<Vec<Self>> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::InvalidCommand(format!("Invalid command script: {}", e)))
    }

    pub fn into_command(self) -> Box<dyn Command> {
        match self {
            CommandPayload::AddClip(cmd) => Box::new(cmd),
            CommandPayload::MoveClip(cmd) => Box::new(cmd),
            CommandPayload::SplitClip(cmd) => Box::new(cmd),
            CommandPayload::DeleteClip(cmd) => Box::new(cmd),
            CommandPayload::AddTrack(cmd) => Box::new(cmd),
            CommandPayload::SetPlayhead(cmd) => Box::new(cmd),
            CommandPayload::SetZoom(cmd) => Box::new(cmd),
            CommandPayload::Select(cmd) => Box::new(cmd),
        }
    }
}
