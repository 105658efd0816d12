use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::ui::theme::Theme;

pub const LOADING_TEXT: &str = "Loading...";

pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
    let target = centered_rect(LOADING_TEXT.len() as u16, 1, area);
    frame.render_widget(
        Paragraph::new(LOADING_TEXT).style(
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::ITALIC),
        ),
        target,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [vert] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [horiz] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(vert);
    horiz
}
