use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub marker_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            header_accent_bg: Color::Green,
            header_accent_fg: Color::Black,
            status_err: Color::Red,
            statusbar_bg: Color::DarkGray,
            overlay_border: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::DarkGray,
            marker_fg: Color::Rgb(103, 232, 249),
        }
    }
}

/// The terminal cannot switch typefaces, so each font choice maps to a text
/// style instead.
pub fn font_style(font: &str) -> Style {
    match font {
        "Wingdings 3" => Style::default().add_modifier(Modifier::ITALIC),
        "Comic Sans MS" => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default(),
    }
}
