use chrono::NaiveTime;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{PrayerName, PrayerTimeSet, ResolvedNextPrayer};
use crate::tui::theme;
use crate::utils::format::format_time_12h;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    times: Option<&PrayerTimeSet>,
    next: Option<&ResolvedNextPrayer>,
    now: NaiveTime,
) {
    let block = Block::default()
        .title(Span::styled(" Today ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let Some(times) = times else {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("  Could not load prayer times.", theme::red())),
            Line::from(Span::styled("  [r] to retry", theme::dim())),
        ];
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    };

    let next_name = next.map(|n| n.name);
    let items: Vec<ListItem> = times
        .entries()
        .into_iter()
        .map(|(name, time)| {
            // After Isha the next Fajr is tomorrow's, so today's stays dimmed
            let is_next = next_name == Some(name) && time > now;
            let (icon, style) = if is_next {
                ("▸", theme::gold().add_modifier(Modifier::BOLD))
            } else if time <= now {
                ("·", theme::dim())
            } else if name == PrayerName::Sunrise {
                (" ", theme::teal())
            } else {
                (" ", theme::bold())
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", icon), style),
                Span::styled(format!("{:<9}", name.display_name()), style),
                Span::styled(format!("{:>8}", format_time_12h(time)), style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
