use std::time::Instant;

use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, ProcessRefreshKind, ProcessesToUpdate, System};

use super::snapshot::{ProcessInfo, SystemSnapshot};
use crate::error::{Error, Result};

/// Anything that can produce a fresh [`SystemSnapshot`] on demand.
pub trait MetricsSource: Send {
    fn sample(&mut self) -> Result<SystemSnapshot>;
}

impl<F> MetricsSource for F
where
    F: FnMut() -> Result<SystemSnapshot> + Send,
{
    fn sample(&mut self) -> Result<SystemSnapshot> {
        self()
    }
}

pub struct Collector {
    sys: System,
    include_processes: bool,
    // Set until the first sample; CPU usage needs two refreshes at least
    // MINIMUM_CPU_UPDATE_INTERVAL apart.
    baseline_at: Option<Instant>,
}

impl Collector {
    pub fn new(include_processes: bool) -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        if include_processes {
            sys.refresh_processes_specifics(
                ProcessesToUpdate::All,
                true,
                ProcessRefreshKind::nothing().with_memory().with_cpu(),
            );
        }
        Collector {
            sys,
            include_processes,
            baseline_at: Some(Instant::now()),
        }
    }

    fn wait_for_cpu_baseline(&mut self) {
        let Some(baseline_at) = self.baseline_at.take() else {
            return;
        };
        let remaining = MINIMUM_CPU_UPDATE_INTERVAL.saturating_sub(baseline_at.elapsed());
        if !remaining.is_zero() {
            tracing::debug!(?remaining, "waiting for CPU usage baseline");
            std::thread::sleep(remaining);
        }
    }

    fn refresh(&mut self) {
        let _refresh_span = tracing::debug_span!("collector.refresh").entered();

        self.sys.refresh_memory();
        self.sys.refresh_cpu_all();
        if self.include_processes {
            self.sys.refresh_processes_specifics(
                ProcessesToUpdate::All,
                true,
                ProcessRefreshKind::nothing().with_memory().with_cpu(),
            );
        }
    }

    fn build_snapshot(&self) -> SystemSnapshot {
        let processes = self.include_processes.then(|| {
            let mut processes: Vec<ProcessInfo> = self
                .sys
                .processes()
                .iter()
                .map(|(pid, process)| ProcessInfo {
                    pid: pid.as_u32(),
                    name: process.name().to_string_lossy().to_string(),
                    cpu: process.cpu_usage(),
                    memory: process.memory(),
                })
                .collect();
            processes.sort_unstable_by_key(|p| p.pid);
            processes
        });

        SystemSnapshot {
            system_name: non_empty(System::name()),
            kernel_version: non_empty(System::kernel_version()),
            os_version: non_empty(System::os_version()),
            host_name: non_empty(System::host_name()),
            memory_usage: self.sys.used_memory(),
            cpu_usage: self.sys.global_cpu_usage(),
            processes,
        }
    }
}

impl MetricsSource for Collector {
    fn sample(&mut self) -> Result<SystemSnapshot> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(Error::CollectorUnavailable(format!(
                "sysinfo does not support {}",
                std::env::consts::OS
            )));
        }
        self.wait_for_cpu_baseline();
        self.refresh();
        let snapshot = self.build_snapshot();
        tracing::debug!(
            memory_usage = snapshot.memory_usage,
            cpu_usage = snapshot.cpu_usage,
            processes = snapshot.processes.as_ref().map_or(0, Vec::len),
            "sampled host"
        );
        Ok(snapshot)
    }
}

// Some platforms report an empty string instead of nothing.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_identity_values_become_absent() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("host".to_string())).as_deref(), Some("host"));
    }

    #[test]
    fn process_list_follows_include_flag() {
        let mut without = Collector::new(false);
        let snapshot = without.sample().unwrap();
        assert!(snapshot.processes.is_none());

        let mut with = Collector::new(true);
        let snapshot = with.sample().unwrap();
        let processes = snapshot.processes.expect("process list requested");
        assert!(processes.windows(2).all(|w| w[0].pid < w[1].pid));
    }

    #[test]
    fn first_sample_waits_for_cpu_baseline() {
        let created = Instant::now();
        let mut collector = Collector::new(false);
        collector.sample().unwrap();
        assert!(created.elapsed() >= MINIMUM_CPU_UPDATE_INTERVAL);

        let before_second = Instant::now();
        collector.sample().unwrap();
        assert!(before_second.elapsed() < MINIMUM_CPU_UPDATE_INTERVAL);
    }

    #[test]
    fn closures_are_metrics_sources() {
        let mut calls = 0u64;
        let mut source = move || -> Result<SystemSnapshot> {
            calls += 1;
            Ok(SystemSnapshot {
                memory_usage: calls,
                ..SystemSnapshot::default()
            })
        };
        assert_eq!(MetricsSource::sample(&mut source).unwrap().memory_usage, 1);
        assert_eq!(MetricsSource::sample(&mut source).unwrap().memory_usage, 2);
    }
}
