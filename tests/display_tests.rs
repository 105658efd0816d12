use std::cmp::Ordering;

use insta::assert_snapshot;
use proptest::prelude::*;
use syspanel::display::{DisplayOptions, PanelView, display_order, locale_compare};
use syspanel::system::example::example_snapshot;
use syspanel::system::snapshot::{ProcessInfo, SystemSnapshot};

const MARKER: &str = "tauri";

fn options() -> DisplayOptions {
    DisplayOptions {
        include_processes: true,
        marker: MARKER.to_string(),
    }
}

fn process(pid: u32, name: &str) -> ProcessInfo {
    ProcessInfo {
        pid,
        name: name.to_string(),
        cpu: 0.0,
        memory: 0,
    }
}

#[test]
fn example_panel_text() {
    let view = PanelView::build(
        &example_snapshot(),
        &DisplayOptions {
            include_processes: true,
            marker: "syspanel".to_string(),
        },
    );
    assert_snapshot!(view.lines().join("\n"), @r"
    System name: Example Linux
    Kernel version: 6.1.0
    OS version: 12
    Host name: example-host
    Memory usage: 4294967296B
    CPU usage: 12.5%
    PID | Name | CPU usage (%) | Memory usage (B)
    1337 | syspanel | 1.5 | 25165824
    1 | init | 0 | 12582912
    412 | sshd | 0.1 | 8388608
    2048 | Xorg | 3.2 | 104857600
    ");
}

#[test]
fn memory_and_cpu_lines_are_exact() {
    let snapshot = SystemSnapshot {
        memory_usage: 1000,
        cpu_usage: 50.0,
        ..SystemSnapshot::default()
    };
    let lines = PanelView::build(&snapshot, &options()).field_lines();
    assert_eq!(lines[4], "Memory usage: 1000B");
    assert_eq!(lines[5], "CPU usage: 50%");
}

#[test]
fn missing_process_list_renders_no_table() {
    let view = PanelView::build(&SystemSnapshot::default(), &options());
    assert!(view.processes.is_none());
    assert_eq!(view.lines().len(), 6);
}

#[test]
fn tauri_helper_before_zsh() {
    let processes = vec![process(2, "zsh"), process(1, "tauri-helper")];
    let ordered = display_order(&processes, MARKER);
    assert_eq!(ordered[0].pid, 1);
    assert_eq!(ordered[1].pid, 2);
}

#[test]
fn accented_and_punctuated_names_follow_collation() {
    let processes = vec![
        process(1, "fish"),
        process(2, "éclair"),
        process(3, "1x"),
        process(4, "_x"),
        process(5, "Zebra"),
    ];
    let names: Vec<&str> = display_order(&processes, MARKER)
        .into_iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["_x", "1x", "éclair", "fish", "Zebra"]);
}

#[test]
fn ordering_leaves_snapshot_untouched() {
    let processes = vec![process(2, "zsh"), process(1, "tauri-helper")];
    let _ = display_order(&processes, MARKER);
    assert_eq!(processes[0].name, "zsh");
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z]{1,8}",
        "[a-z]{0,3}tauri[a-z-]{0,4}",
        "[A-Z][a-z]{0,6}",
        "[a-zA-Z0-9éèàöüßçñ_. -]{1,8}",
        "[\\p{L}\\p{N}_-]{1,6}",
    ]
}

proptest! {
    #[test]
    fn marker_partition_then_locale_order(names in prop::collection::vec(name_strategy(), 0..40)) {
        let processes: Vec<ProcessInfo> = names
            .iter()
            .enumerate()
            .map(|(i, name)| process(i as u32, name))
            .collect();
        let ordered = display_order(&processes, MARKER);
        prop_assert_eq!(ordered.len(), processes.len());

        let first_unmarked = ordered
            .iter()
            .position(|p| !p.name.contains(MARKER))
            .unwrap_or(ordered.len());
        prop_assert!(ordered[first_unmarked..].iter().all(|p| !p.name.contains(MARKER)));

        for pair in ordered[..first_unmarked].windows(2).chain(ordered[first_unmarked..].windows(2)) {
            prop_assert_ne!(locale_compare(&pair[0].name, &pair[1].name), Ordering::Greater);
        }
    }

    #[test]
    fn locale_compare_is_antisymmetric(a in "[\\p{L}\\p{N}_ .-]{0,6}", b in "[\\p{L}\\p{N}_ .-]{0,6}") {
        prop_assert_eq!(locale_compare(&a, &b), locale_compare(&b, &a).reverse());
    }
}
