pub mod header;
pub mod info;
pub mod loading;
pub mod process_table;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use syspanel::display::DisplayState;

use crate::app::App;
use crate::ui::theme::{Theme, font_style};

const INFO_HEIGHT: u16 = 8;

pub fn draw(frame: &mut Frame, app: &App) {
    let theme = Theme::default();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], app, &theme);

    match app.display.state() {
        DisplayState::Loading => loading::render(frame, chunks[1], &theme),
        DisplayState::Ready(view) => {
            let font = font_style(app.font.font());
            match &view.processes {
                Some(rows) => {
                    let content = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Length(INFO_HEIGHT), Constraint::Min(3)])
                        .split(chunks[1]);
                    info::render(frame, content[0], view, font, &theme);
                    process_table::render(
                        frame,
                        content[1],
                        rows,
                        app.scroll,
                        &app.display.options().marker,
                        font,
                        &theme,
                    );
                }
                None => info::render(frame, chunks[1], view, font, &theme),
            }
        }
    }

    statusbar::render(
        frame,
        chunks[2],
        app.mode,
        app.status_message.as_deref(),
        &theme,
    );
}

#[cfg(test)]
mod tests;
