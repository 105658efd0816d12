use std::sync::Arc;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use syspanel::config::{Config, Mode};
use syspanel::publisher::{Origin, SnapshotUpdate};
use syspanel::system::snapshot::SystemSnapshot;

use crate::action::Action;
use crate::app::App;
use crate::ui;

fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            let cell = buf.cell((x, y)).unwrap();
            out.push_str(cell.symbol());
        }
        if y + 1 < area.height {
            out.push('\n');
        }
    }
    out
}

fn render_app(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| ui::draw(frame, app)).unwrap();
    buffer_to_string(terminal.backend().buffer())
}

fn make_app(mode: Mode) -> App {
    let mut config = Config::default();
    config.general.mode = mode;
    config.general.operating_system = "linux".to_string();
    App::new(&config, None, None)
}

fn line_of(output: &str, needle: &str) -> usize {
    output
        .lines()
        .position(|l| l.contains(needle))
        .unwrap_or_else(|| panic!("`{needle}` not rendered:\n{output}"))
}

#[test]
fn loading_panel_before_first_snapshot() {
    let app = make_app(Mode::Push);
    let output = render_app(&app, 80, 12);
    assert!(output.contains("System info for linux"));
    assert!(output.contains("Loading..."));
    assert!(!output.contains("Memory usage"));
}

#[test]
fn static_panel_renders_fields_with_units() {
    let app = make_app(Mode::Static);
    let output = render_app(&app, 100, 24);
    assert!(!output.contains("Loading..."));
    assert!(output.contains("Memory usage: 4294967296B"));
    assert!(output.contains("CPU usage: 12.5%"));
    assert!(output.contains("Host name: example-host"));
    assert!(output.contains("Memory usage (B)"));
}

#[test]
fn process_rows_follow_display_order() {
    let app = make_app(Mode::Static);
    let output = render_app(&app, 100, 24);
    let marked = line_of(&output, "1337");
    let init = line_of(&output, "init");
    let sshd = line_of(&output, "sshd");
    let xorg = line_of(&output, "Xorg");
    assert!(marked < init && init < sshd && sshd < xorg);
}

#[test]
fn pushed_snapshot_replaces_loading() {
    let mut app = make_app(Mode::Push);
    app.on_snapshot(&SnapshotUpdate {
        sequence: 1,
        origin: Origin::Collector,
        snapshot: Arc::new(SystemSnapshot {
            memory_usage: 1000,
            cpu_usage: 50.0,
            ..SystemSnapshot::default()
        }),
    });
    let output = render_app(&app, 80, 14);
    assert!(output.contains("Memory usage: 1000B"));
    assert!(output.contains("CPU usage: 50%"));
    assert!(output.contains("System name:"));
}

#[test]
fn process_table_can_be_hidden() {
    let mut app = make_app(Mode::Static);
    app.dispatch(Action::ToggleProcesses);
    let output = render_app(&app, 100, 24);
    assert!(!output.contains("Memory usage (B)"));
    assert!(output.contains("CPU usage: 12.5%"));
}

#[test]
fn refresh_hint_only_in_pull_mode() {
    let pull = render_app(&make_app(Mode::Pull), 80, 8);
    assert!(pull.contains("Refresh"));
    let push = render_app(&make_app(Mode::Push), 80, 8);
    assert!(!push.contains("Refresh"));
}

#[test]
fn header_shows_selected_font() {
    let mut app = make_app(Mode::Static);
    app.dispatch(Action::CycleFont);
    let output = render_app(&app, 100, 24);
    assert!(output.contains("Font: Wingdings 3"));
}
