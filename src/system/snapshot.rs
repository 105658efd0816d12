use serde::{Deserialize, Serialize};

/// One point-in-time reading of the host.
///
/// Identity fields are `None` when the collector could not resolve them.
/// Blank values reported by the OS are stored as `None` too.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub system_name: Option<String>,
    pub kernel_version: Option<String>,
    pub os_version: Option<String>,
    pub host_name: Option<String>,
    /// Bytes.
    pub memory_usage: u64,
    /// Percent. Nominally 0-100 but not clamped.
    pub cpu_usage: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processes: Option<Vec<ProcessInfo>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu: f32,
    pub memory: u64,
}
