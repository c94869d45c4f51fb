//! Bottom status bar — key hints, busy marker, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = vec![Span::styled(
        " j/k:move Enter:load r:refresh x:export 1-4:tabs ?:help q:quit",
        theme::muted(),
    )];

    spans.push(Span::raw(" | "));

    if let Some(symbol) = &app.pending {
        spans.push(Span::styled(format!("[busy: {symbol}] "), theme::warning()));
    }

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
