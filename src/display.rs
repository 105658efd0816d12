//! Turns snapshots into stable, human-readable panel content.
//!
//! Nothing in here touches the terminal; `ui` draws whatever [`PanelView`]
//! holds.

use std::cmp::Ordering;
use std::sync::Arc;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};

use crate::publisher::{Origin, SnapshotUpdate};
use crate::system::snapshot::{ProcessInfo, SystemSnapshot};

pub const PROCESS_COLUMNS: [&str; 4] = ["PID", "Name", "CPU usage (%)", "Memory usage (B)"];

#[derive(Clone, Debug)]
pub struct DisplayOptions {
    pub include_processes: bool,
    /// Processes whose name contains this sort ahead of everything else.
    pub marker: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessRow {
    pub pid: u32,
    pub name: String,
    pub cpu: String,
    pub memory: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelView {
    pub fields: Vec<Field>,
    pub processes: Option<Vec<ProcessRow>>,
}

impl PanelView {
    pub fn build(snapshot: &SystemSnapshot, options: &DisplayOptions) -> Self {
        let fields = vec![
            Field {
                label: "System name",
                value: optional_text(snapshot.system_name.as_deref()).to_string(),
            },
            Field {
                label: "Kernel version",
                value: optional_text(snapshot.kernel_version.as_deref()).to_string(),
            },
            Field {
                label: "OS version",
                value: optional_text(snapshot.os_version.as_deref()).to_string(),
            },
            Field {
                label: "Host name",
                value: optional_text(snapshot.host_name.as_deref()).to_string(),
            },
            Field {
                label: "Memory usage",
                value: format_memory(snapshot.memory_usage),
            },
            Field {
                label: "CPU usage",
                value: format_cpu(snapshot.cpu_usage),
            },
        ];

        let processes = if options.include_processes {
            snapshot.processes.as_deref().map(|processes| {
                display_order(processes, &options.marker)
                    .into_iter()
                    .map(|p| ProcessRow {
                        pid: p.pid,
                        name: p.name.clone(),
                        cpu: format_number(p.cpu),
                        memory: p.memory.to_string(),
                    })
                    .collect()
            })
        } else {
            None
        };

        PanelView { fields, processes }
    }

    pub fn field_lines(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| format!("{}: {}", f.label, f.value))
            .collect()
    }

    /// Field lines followed by the process table, if any.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.field_lines();
        if let Some(rows) = &self.processes {
            lines.push(PROCESS_COLUMNS.join(" | "));
            lines.extend(
                rows.iter()
                    .map(|r| format!("{} | {} | {} | {}", r.pid, r.name, r.cpu, r.memory)),
            );
        }
        lines
    }
}

pub enum DisplayState<'a> {
    Loading,
    Ready(&'a PanelView),
}

pub struct DisplayAdapter {
    options: DisplayOptions,
    snapshot: Option<Arc<SystemSnapshot>>,
    view: Option<PanelView>,
    shown_sequence: Option<u64>,
    accepts_example: bool,
}

impl DisplayAdapter {
    /// A live adapter. Reports [`DisplayState::Loading`] until the first
    /// collector snapshot arrives.
    pub fn new(options: DisplayOptions) -> Self {
        DisplayAdapter {
            options,
            snapshot: None,
            view: None,
            shown_sequence: None,
            accepts_example: false,
        }
    }

    /// An adapter that always has data and never reports loading.
    pub fn with_static(options: DisplayOptions, snapshot: SystemSnapshot) -> Self {
        let snapshot = Arc::new(snapshot);
        let view = PanelView::build(&snapshot, &options);
        DisplayAdapter {
            options,
            snapshot: Some(snapshot),
            view: Some(view),
            shown_sequence: None,
            accepts_example: true,
        }
    }

    /// Show `update` unless something newer is already on screen.
    /// Returns whether the view changed.
    pub fn apply(&mut self, update: &SnapshotUpdate) -> bool {
        if update.origin == Origin::Example && !self.accepts_example {
            tracing::debug!("collector unavailable, staying in loading state");
            return false;
        }
        if let Some(shown) = self.shown_sequence
            && update.sequence < shown
        {
            tracing::trace!(
                sequence = update.sequence,
                shown,
                "dropping stale snapshot"
            );
            return false;
        }

        self.view = Some(PanelView::build(&update.snapshot, &self.options));
        self.snapshot = Some(Arc::clone(&update.snapshot));
        self.shown_sequence = Some(update.sequence);
        true
    }

    pub fn state(&self) -> DisplayState<'_> {
        match &self.view {
            Some(view) => DisplayState::Ready(view),
            None => DisplayState::Loading,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.view.is_none()
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    pub fn set_include_processes(&mut self, include: bool) {
        self.options.include_processes = include;
        if let Some(snapshot) = &self.snapshot {
            self.view = Some(PanelView::build(snapshot, &self.options));
        }
    }
}

pub fn optional_text(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

pub fn format_memory(bytes: u64) -> String {
    format!("{bytes}B")
}

pub fn format_cpu(percent: f32) -> String {
    format!("{}%", format_number(percent))
}

/// Shortest decimal form: `50.0` prints as `50`, `12.5` as `12.5`.
pub fn format_number(value: f32) -> String {
    value.to_string()
}

/// Display order for a process list: marker matches first, then by name.
pub fn display_order<'a>(processes: &'a [ProcessInfo], marker: &str) -> Vec<&'a ProcessInfo> {
    let collator = NameCollator::new();
    let mut ordered: Vec<&ProcessInfo> = processes.iter().collect();
    ordered.sort_by(|a, b| {
        let a_marked = !marker.is_empty() && a.name.contains(marker);
        let b_marked = !marker.is_empty() && b.name.contains(marker);
        b_marked
            .cmp(&a_marked)
            .then_with(|| collator.compare(&a.name, &b.name))
            .then_with(|| a.pid.cmp(&b.pid))
    });
    ordered
}

/// Locale-aware name comparison using the CLDR root collation.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    NameCollator::new().compare(a, b)
}

/// Root-locale collator: accents and case only break ties, punctuation
/// sorts before digits, digits before letters.
pub struct NameCollator {
    collator: Option<CollatorBorrowed<'static>>,
}

impl NameCollator {
    pub fn new() -> Self {
        let collator = match Collator::try_new(Default::default(), CollatorOptions::default()) {
            Ok(collator) => Some(collator),
            Err(err) => {
                tracing::warn!(error = %err, "root collation unavailable, ordering by code point");
                None
            }
        };
        NameCollator { collator }
    }

    /// Strings the collation treats as equal fall back to code point order.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let collated = self
            .collator
            .as_ref()
            .map_or(Ordering::Equal, |c| c.compare(a, b));
        collated.then_with(|| a.cmp(b))
    }
}

impl Default for NameCollator {
    fn default() -> Self {
        Self::new()
    }
}
