use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::prayer_times::TickerState;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, state: TickerState, loading: bool) {
    let hints = [("[r]", " reload times  "), ("[q]/[Esc]", " quit")];

    let status = if loading { "loading prayer times" } else { state.label() };
    let status_style = match state {
        TickerState::Resolved if !loading => theme::teal(),
        _ => theme::dim(),
    };

    let mut spans = vec![Span::styled(format!("● {}   ", status), status_style)];
    for (key, label) in &hints {
        spans.push(Span::styled(*key, theme::gold()));
        spans.push(Span::styled(*label, theme::dim()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
