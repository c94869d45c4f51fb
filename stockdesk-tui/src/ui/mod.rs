//! Top-level UI layout — company list, metric cards, tabbed charts, status bar.

pub mod candle_chart;
pub mod cards;
pub mod company_list;
pub mod data_tab;
pub mod overlays;
pub mod price_tab;
pub mod returns_tab;
pub mod status_bar;
pub mod summary_tab;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Overlay, Tab};
use crate::theme;

const LIST_WIDTH: u16 = 34;
const CARDS_HEIGHT: u16 = 5;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());
    let main_area = chunks[0];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LIST_WIDTH), Constraint::Min(20)])
        .split(main_area);

    company_list::render(f, columns[0], app);
    draw_detail(f, columns[1], app);
    status_bar::render(f, chunks[1], app);

    // Overlays on top.
    match app.overlay {
        Overlay::Help => overlays::render_help(f, main_area),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::None => {}
    }
}

/// Right-hand side: cards, tab strip, active tab body.
fn draw_detail(f: &mut Frame, area: Rect, app: &AppState) {
    let title = match &app.loaded {
        Some(series) => format!(" {} ({}) ", series.name, series.symbol),
        None => " No company loaded ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(title)
        .title_style(theme::panel_title(true));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(series) = &app.loaded else {
        let hint = if app.is_busy() {
            Line::from(Span::styled("Loading...", theme::warning()))
        } else {
            Line::from(Span::styled(
                "Select a company and press Enter to load its data.",
                theme::muted(),
            ))
        };
        f.render_widget(Paragraph::new(vec![Line::from(""), hint]), inner);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CARDS_HEIGHT),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(inner);

    cards::render(f, rows[0], &series.summary);
    render_tab_strip(f, rows[1], app.active_tab);

    match app.active_tab {
        Tab::Price => price_tab::render(f, rows[2], series),
        Tab::Returns => returns_tab::render(f, rows[2], series),
        Tab::Data => data_tab::render(f, rows[2], series),
        Tab::Summary => summary_tab::render(f, rows[2], series),
    }
}

fn render_tab_strip(f: &mut Frame, area: Rect, active: Tab) {
    let mut spans = Vec::new();
    for tab in Tab::ALL {
        let label = format!(" {}:{} ", tab.index() + 1, tab.label());
        let style = if tab == active {
            theme::accent_bold().add_modifier(Modifier::REVERSED)
        } else {
            theme::muted()
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
