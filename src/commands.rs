use serde::Serialize;

use crate::error::{Error, Result};
use crate::publisher::{SnapshotPublisher, SnapshotUpdate};
use crate::system::snapshot::SystemSnapshot;

/// Topic every pushed snapshot is announced under.
pub const UPDATE_SYSTEM_INFO: &str = "update_system_info";

/// One pushed message: `{"event": "update_system_info", "payload": {...}}`.
#[derive(Debug, Serialize)]
pub struct SnapshotEvent<'a> {
    pub event: &'static str,
    pub payload: &'a SystemSnapshot,
}

impl<'a> SnapshotEvent<'a> {
    pub fn new(payload: &'a SystemSnapshot) -> Self {
        SnapshotEvent {
            event: UPDATE_SYSTEM_INFO,
            payload,
        }
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Pull one snapshot. `operating_system` is context for the request only.
pub fn get_system_info(
    publisher: &SnapshotPublisher,
    operating_system: &str,
) -> Result<SnapshotUpdate> {
    if operating_system.trim().is_empty() {
        return Err(Error::EmptyOperatingSystem);
    }
    let _span = tracing::debug_span!("get_system_info", operating_system).entered();
    Ok(publisher.request())
}

pub fn generate_header_text(operating_system: &str) -> String {
    format!("System info for {operating_system}")
}
