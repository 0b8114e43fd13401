use ratatui::style::{Color, Modifier, Style};

pub const BG: Color = Color::Rgb(14, 20, 18);
pub const SURFACE: Color = Color::Rgb(22, 31, 28);
pub const BORDER: Color = Color::Rgb(44, 62, 55);
pub const TEXT: Color = Color::Rgb(222, 228, 214);
pub const TEXT_DIM: Color = Color::Rgb(112, 128, 118);
pub const GOLD: Color = Color::Rgb(196, 160, 68);
pub const TEAL: Color = Color::Rgb(72, 160, 140);
pub const RED: Color = Color::Rgb(180, 82, 62);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn teal() -> Style {
    Style::default().fg(TEAL)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}
