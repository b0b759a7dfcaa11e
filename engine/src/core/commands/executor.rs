//! Command Executor Module
//!
//! Runs commands against the timeline and keeps an in-memory operation log.
//! There is no undo history.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{
    commands::{Command, CommandPayload, CommandResult},
    timeline::Timeline,
    CoreResult, OpId,
};

/// Default number of operations kept in the log
pub const DEFAULT_MAX_LOG_SIZE: usize = 100;

// =============================================================================
// Operation Record
// =============================================================================

/// One executed command, as kept in the operation log
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    pub op_id: OpId,
    pub command_type: String,
    pub payload: serde_json::Value,
    /// RFC 3339 execution time
    pub timestamp: String,
}

// =============================================================================
// Command Executor
// =============================================================================

/// Executes commands and records successful ones
#[derive(Debug)]
pub struct CommandExecutor {
    log: VecDeque<OperationRecord>,
    max_log_size: usize,
    op_count: u64,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self {
            log: VecDeque::new(),
            max_log_size: DEFAULT_MAX_LOG_SIZE,
            op_count: 0,
        }
    }

    /// Sets the maximum number of log entries kept
    pub fn with_max_log_size(mut self, size: usize) -> Self {
        self.max_log_size = size;
        self
    }

    /// Executes a command. Failed commands are not logged and leave the timeline unchanged.
    pub fn execute(
        &mut self,
        mut command: Box<dyn Command>,
        timeline: &mut Timeline,
    ) -> CoreResult<CommandResult> {
        let type_name = command.type_name();

        let result = match command.execute(timeline) {
            Ok(result) => result,
            Err(e) => {
                warn!("Command {} failed: {}", type_name, e);
                return Err(e);
            }
        };

        self.op_count += 1;
        self.log.push_back(OperationRecord {
            op_id: result.op_id.clone(),
            command_type: type_name.to_string(),
            payload: command.to_json(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
        while self.log.len() > self.max_log_size {
            self.log.pop_front();
        }

        debug!(
            "Executed {} (op {}, {} change(s))",
            type_name,
            result.op_id,
            result.changes.len()
        );
        Ok(result)
    }

    pub fn execute_payload(
        &mut self,
        payload: CommandPayload,
        timeline: &mut Timeline,
    ) -> CoreResult<CommandResult> {
        self.execute(payload.into_command(), timeline)
    }

    /// Runs a whole script against a copy of the timeline and commits only if
    /// every command succeeds. On failure the log and op count are restored too.
    pub fn run_script(
        &mut self,
        payloads: Vec<CommandPayload>,
        timeline: &mut Timeline,
    ) -> CoreResult<Vec<CommandResult>> {
        let mut candidate = timeline.clone();
        let saved_log = self.log.clone();
        let saved_count = self.op_count;

        let mut results = Vec::with_capacity(payloads.len());
        for payload in payloads {
            match self.execute_payload(payload, &mut candidate) {
                Ok(result) => results.push(result),
                Err(e) => {
                    self.log = saved_log;
                    self.op_count = saved_count;
                    return Err(e);
                }
            }
        }
        *timeline = candidate;
        Ok(results)
    }

    /// Number of commands executed successfully since creation
    pub fn op_count(&self) -> u64 {
        self.op_count
    }

    pub fn log(&self) -> impl Iterator<Item = &OperationRecord> {
        self.log.iter()
    }

    pub fn last_command_type(&self) -> Option<&str> {
        self.log.back().map(|r| r.command_type.as_str())
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
