use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::models::ResolvedNextPrayer;
use crate::tui::theme;
use crate::utils::format::format_countdown;

pub fn render(frame: &mut Frame, area: Rect, next_prayer: Option<&ResolvedNextPrayer>) {
    let block = Block::default()
        .title(Span::styled(" Next Prayer ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(next) = next_prayer else {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("  No data", theme::dim())),
        ];
        frame.render_widget(Paragraph::new(text), inner);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // name
            Constraint::Length(4), // countdown
            Constraint::Min(0),
        ])
        .split(inner);

    let name = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("  {}", next.name.display_name().to_uppercase()),
            theme::gold().add_modifier(Modifier::BOLD),
        ),
        Span::styled("  in", theme::dim()),
    ]));
    frame.render_widget(name, rows[0]);

    let countdown = BigText::builder()
        .pixel_size(PixelSize::HalfHeight)
        .style(theme::teal())
        .lines(vec![Line::from(format_countdown(next.seconds_remaining))])
        .build();
    frame.render_widget(countdown, rows[1]);
}
