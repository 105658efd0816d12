use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use syspanel::display::PanelView;

use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, view: &PanelView, font: Style, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let lines: Vec<Line> = view
        .fields
        .iter()
        .map(|field| {
            Line::from(vec![
                Span::styled(
                    format!("{}: ", field.label),
                    Style::default()
                        .fg(theme.text_secondary)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(field.value.as_str(), Style::default().fg(theme.text_primary)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(font).block(block), area);
}
