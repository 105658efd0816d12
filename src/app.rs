use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use syspanel::commands::{generate_header_text, get_system_info};
use syspanel::config::{Config, Mode};
use syspanel::display::{DisplayAdapter, DisplayState};
use syspanel::preferences::{FontPreference, PreferenceStore};
use syspanel::publisher::{SnapshotPublisher, SnapshotUpdate};
use syspanel::system::example::example_snapshot;

use crate::action::Action;

pub struct App {
    pub running: bool,
    pub mode: Mode,
    pub operating_system: String,
    pub display: DisplayAdapter,
    pub font: FontPreference,
    pub status_message: Option<String>,
    pub scroll: usize,
    publisher: Option<SnapshotPublisher>,
    preferences: Option<PreferenceStore>,
}

impl App {
    /// `publisher` is ignored in static mode. Without one, a live panel
    /// stays in the loading state.
    pub fn new(
        config: &Config,
        publisher: Option<SnapshotPublisher>,
        preferences: Option<PreferenceStore>,
    ) -> Self {
        let mode = config.general.mode;
        let options = config.display_options();
        let (display, publisher) = match mode {
            Mode::Static => (DisplayAdapter::with_static(options, example_snapshot()), None),
            Mode::Pull | Mode::Push => (DisplayAdapter::new(options), publisher),
        };
        let font = preferences
            .as_ref()
            .map(FontPreference::load)
            .unwrap_or_default();

        App {
            running: true,
            mode,
            operating_system: config.general.operating_system.clone(),
            display,
            font,
            status_message: None,
            scroll: 0,
            publisher,
            preferences,
        }
    }

    pub fn header_text(&self) -> String {
        generate_header_text(&self.operating_system)
    }

    /// One pull request. A failed request leaves the panel as it was.
    pub fn request_snapshot(&mut self) {
        let Some(publisher) = &self.publisher else {
            return;
        };
        match get_system_info(publisher, &self.operating_system) {
            Ok(update) => self.on_snapshot(&update),
            Err(err) => {
                tracing::warn!(error = %err, "system info request failed");
                self.status_message = Some(err.to_string());
            }
        }
    }

    pub fn on_snapshot(&mut self, update: &SnapshotUpdate) {
        if self.display.apply(update) {
            let rows = self.process_count();
            if self.scroll >= rows {
                self.scroll = rows.saturating_sub(1);
            }
        }
    }

    pub fn process_count(&self) -> usize {
        match self.display.state() {
            DisplayState::Ready(view) => view.processes.as_ref().map_or(0, Vec::len),
            DisplayState::Loading => 0,
        }
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Up => Action::ScrollUp,
            KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('f') => Action::CycleFont,
            KeyCode::Char('p') => Action::ToggleProcesses,
            KeyCode::Char('r') if self.mode == Mode::Pull => Action::Refresh,
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        if action != Action::None {
            self.status_message = None;
        }
        match action {
            Action::Quit => self.running = false,
            Action::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            Action::ScrollDown => {
                if self.scroll + 1 < self.process_count() {
                    self.scroll += 1;
                }
            }
            Action::CycleFont => self.cycle_font(),
            Action::Refresh => self.request_snapshot(),
            Action::ToggleProcesses => {
                let include = !self.display.options().include_processes;
                self.display.set_include_processes(include);
                self.scroll = 0;
            }
            Action::None => {}
        }
    }

    fn cycle_font(&mut self) {
        self.font = self.font.next();
        let Some(store) = self.preferences.as_mut() else {
            return;
        };
        if let Err(err) = self.font.store(store) {
            tracing::warn!(error = %err, "could not persist font preference");
            self.status_message = Some(format!("Font not saved: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use syspanel::publisher::Origin;
    use syspanel::system::snapshot::{ProcessInfo, SystemSnapshot};

    use super::*;

    fn config(mode: Mode) -> Config {
        let mut config = Config::default();
        config.general.mode = mode;
        config.general.operating_system = "linux".to_string();
        config
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn update_with_processes(sequence: u64, count: u32) -> SnapshotUpdate {
        let processes = (0..count)
            .map(|pid| ProcessInfo {
                pid,
                name: format!("proc{pid}"),
                cpu: 0.0,
                memory: 0,
            })
            .collect();
        SnapshotUpdate {
            sequence,
            origin: Origin::Collector,
            snapshot: Arc::new(SystemSnapshot {
                processes: Some(processes),
                ..SystemSnapshot::default()
            }),
        }
    }

    #[test]
    fn live_app_without_publisher_stays_loading() {
        let mut app = App::new(&config(Mode::Pull), None, None);
        app.request_snapshot();
        assert!(app.display.is_loading());
    }

    #[test]
    fn static_app_has_data_immediately() {
        let app = App::new(&config(Mode::Static), None, None);
        assert!(!app.display.is_loading());
        assert_eq!(app.header_text(), "System info for linux");
    }

    #[test]
    fn refresh_key_only_in_pull_mode() {
        let pull = App::new(&config(Mode::Pull), None, None);
        assert_eq!(pull.map_key(key(KeyCode::Char('r'))), Action::Refresh);
        let push = App::new(&config(Mode::Push), None, None);
        assert_eq!(push.map_key(key(KeyCode::Char('r'))), Action::None);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = App::new(&config(Mode::Push), None, None);
        let action = app.map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        app.dispatch(action);
        assert!(!app.running);
    }

    #[test]
    fn scrolling_is_bounded_by_rows() {
        let mut app = App::new(&config(Mode::Push), None, None);
        app.on_snapshot(&update_with_processes(1, 3));
        for _ in 0..10 {
            app.dispatch(Action::ScrollDown);
        }
        assert_eq!(app.scroll, 2);

        app.on_snapshot(&update_with_processes(2, 1));
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn cycling_font_without_store_still_changes_font() {
        let mut app = App::new(&config(Mode::Static), None, None);
        assert_eq!(app.font.font(), "Arial");
        app.dispatch(Action::CycleFont);
        assert_eq!(app.font.font(), "Wingdings 3");
        assert!(app.status_message.is_none());
    }
}
