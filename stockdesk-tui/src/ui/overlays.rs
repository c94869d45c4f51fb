//! Overlay widgets — key help and error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

const KEYS: [(&str, &str); 10] = [
    ("j / k, Up / Down", "move through the company list"),
    ("g / G", "first / last company"),
    ("Enter", "load the selected company"),
    ("r", "refresh: re-fetch and replace cached rows"),
    ("x", "export the last 30 rows to <SYMBOL>_data.csv"),
    ("1 - 4, Tab", "switch tab"),
    ("e", "error history"),
    ("?", "this help"),
    ("q, Esc", "quit"),
    ("", "Any key closes this window."),
];

/// Key reference overlay.
pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" StockDesk Keys ")
        .title_style(theme::accent_bold());

    let mut text = vec![Line::from("")];
    for (key, action) in KEYS {
        if key.is_empty() {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(action, theme::neutral())));
        } else {
            text.push(Line::from(vec![
                Span::styled(format!("  {key:<18}"), theme::accent()),
                Span::styled(action, theme::muted()),
            ]));
        }
    }

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app
        .error_history
        .iter()
        .enumerate()
        .skip(app.error_scroll)
        .take(inner.height as usize)
    {
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));

        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}
