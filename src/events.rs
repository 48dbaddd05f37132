//! Event logging for generation and submission runs.
//!
//! Events are appended in NDJSON format (one JSON object per line) to
//! `<log_dir>/events.ndjson`, giving a durable record of what was generated
//! and submitted alongside the job logs themselves.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: the action performed (`generate` or `submit`)
//! - `actor`: the owner string (e.g., `user@HOST`)
//! - `job`: the job name
//! - `details`: freeform object with action-specific details
//!
//! Appending is best-effort at the command layer: a failed append prints a
//! warning and never fails the run it records.

use crate::error::{Result, SpoolError};
use crate::fs::ensure_dir;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// File name of the event log within the log directory.
pub const EVENTS_FILE: &str = "events.ndjson";

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Script set generated.
    Generate,
    /// Job submitted to the scheduler.
    Submit,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Generate => write!(f, "generate"),
            EventAction::Submit => write!(f, "submit"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// The job name the event concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action.
    ///
    /// The timestamp is set to the current time, and the actor is
    /// determined from the environment (USER@HOSTNAME).
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            job: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the job name for this event.
    pub fn with_job(mut self, job_name: impl Into<String>) -> Self {
        self.job = Some(job_name.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| SpoolError::IoError(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Append an event to the log under `log_dir`.
pub fn append_event(log_dir: &Path, event: &Event) -> Result<()> {
    ensure_dir(log_dir)?;
    let path = log_dir.join(EVENTS_FILE);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| {
            SpoolError::IoError(format!(
                "failed to open event log '{}': {}",
                path.display(),
                e
            ))
        })?;

    let line = event.to_ndjson_line()?;
    writeln!(file, "{}", line).map_err(|e| {
        SpoolError::IoError(format!(
            "failed to append to event log '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}

/// Actor string for event metadata: `user@host`.
fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    format!("{}@{}", user, host)
}
