use super::snapshot::{ProcessInfo, SystemSnapshot};

/// Fixed data shown by the static panel and handed out by pull requests
/// when no live sample can be taken.
pub fn example_snapshot() -> SystemSnapshot {
    SystemSnapshot {
        system_name: Some("Example Linux".to_string()),
        kernel_version: Some("6.1.0".to_string()),
        os_version: Some("12".to_string()),
        host_name: Some("example-host".to_string()),
        memory_usage: 4_294_967_296,
        cpu_usage: 12.5,
        processes: Some(vec![
            ProcessInfo {
                pid: 1,
                name: "init".to_string(),
                cpu: 0.0,
                memory: 12_582_912,
            },
            ProcessInfo {
                pid: 412,
                name: "sshd".to_string(),
                cpu: 0.1,
                memory: 8_388_608,
            },
            ProcessInfo {
                pid: 1337,
                name: "syspanel".to_string(),
                cpu: 1.5,
                memory: 25_165_824,
            },
            ProcessInfo {
                pid: 2048,
                name: "Xorg".to_string(),
                cpu: 3.2,
                memory: 104_857_600,
            },
        ]),
    }
}
