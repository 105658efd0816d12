use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table};
use syspanel::display::{PROCESS_COLUMNS, ProcessRow};
use syspanel::format::truncate_unicode;

use crate::ui::theme::Theme;

const NAME_WIDTH: u16 = 32;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    rows: &[ProcessRow],
    scroll: usize,
    marker: &str,
    font: Style,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(format!(" Processes ({}) ", rows.len()));

    let header = Row::new(PROCESS_COLUMNS.iter().map(|c| Cell::from(*c)))
        .style(Style::default().add_modifier(Modifier::BOLD));

    let body = rows.iter().skip(scroll).map(|row| {
        let style = if !marker.is_empty() && row.name.contains(marker) {
            Style::default().fg(theme.marker_fg)
        } else {
            Style::default().fg(theme.text_primary)
        };
        Row::new(vec![
            Cell::from(row.pid.to_string()),
            Cell::from(truncate_unicode(&row.name, NAME_WIDTH as usize)),
            Cell::from(row.cpu.as_str()),
            Cell::from(row.memory.as_str()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Length(NAME_WIDTH),
        Constraint::Length(14),
        Constraint::Min(16),
    ];
    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .style(font);
    frame.render_widget(table, area);
}
