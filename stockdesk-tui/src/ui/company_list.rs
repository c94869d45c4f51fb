//! Left pane — company directory with cursor and loaded marker.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let list = &app.companies;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(format!(" Companies ({}) ", list.companies.len()))
        .title_style(theme::panel_title(false));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if list.companies.is_empty() {
        let text = Paragraph::new(Span::styled("No companies.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    // Keep the cursor on screen.
    let height = inner.height.max(1) as usize;
    let offset = list.cursor.saturating_sub(height - 1);

    let loaded = app.loaded.as_ref().map(|s| s.symbol.as_str());
    let pending = app.pending.as_deref();

    let lines: Vec<Line> = list
        .companies
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, company)| {
            let marker = if pending == Some(company.symbol.as_str()) {
                Span::styled("\u{25cc} ", theme::warning())
            } else if loaded == Some(company.symbol.as_str()) {
                Span::styled("\u{25cf} ", theme::positive())
            } else {
                Span::raw("  ")
            };
            let style = if i == list.cursor {
                theme::accent().add_modifier(Modifier::REVERSED)
            } else {
                theme::text()
            };
            Line::from(vec![
                marker,
                Span::styled(company.name.as_str(), style),
                Span::styled(format!(" {}", company.symbol), theme::muted()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}
