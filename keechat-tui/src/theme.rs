use ratatui::style::Color;

/// Color palette for the whole interface.
pub struct Theme {
    pub fg: Color,
    pub accent: Color,
    pub muted: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub highlight: Color,
    pub border: Color,
}

pub const THEME: Theme = Theme {
    fg: Color::White,
    accent: Color::Cyan,
    muted: Color::DarkGray,
    success: Color::Green,
    warning: Color::Yellow,
    error: Color::Red,
    highlight: Color::Rgb(45, 50, 60),
    border: Color::DarkGray,
};
