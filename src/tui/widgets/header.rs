use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, location: &str, date: NaiveDate) {
    let title_line = Line::from(vec![
        Span::styled("  مُصَلَّى  ", theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled("musalla", theme::gold()),
    ]);

    let date_line = Line::from(vec![
        Span::styled(location, theme::teal()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(date.format("%A, %b %d, %Y").to_string(), theme::dim()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(vec![title_line, Line::from(""), date_line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
