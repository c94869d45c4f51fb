//! Summary tab — price and performance metrics plus the volatility reading.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use stockdesk_core::Summary;

use crate::app::LoadedSeries;
use crate::theme::{self, Theme};
use crate::ui::cards::format_price;

pub fn render(f: &mut Frame, area: Rect, series: &LoadedSeries) {
    let t = Theme::default();
    let s = &series.summary;

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(7), Constraint::Length(5)])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(parts[0]);

    f.render_widget(section("Price Metrics", price_lines(s)), cols[0]);
    f.render_widget(section("Performance Metrics", performance_lines(s, &t)), cols[1]);

    let band = s.volatility_band();
    let explanation = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Volatility: ", theme::muted()),
            Span::styled(
                band.label(),
                Style::default().fg(t.volatility_color(band)),
            ),
        ]),
        Line::from(Span::styled(band.description(), theme::text())),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::muted()),
    );
    f.render_widget(explanation, parts[1]);
}

fn section<'a>(title: &'a str, lines: Vec<Line<'a>>) -> Paragraph<'a> {
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::muted())
            .title(format!(" {title} "))
            .title_style(theme::accent_bold()),
    )
}

fn metric<'a>(label: &'a str, value: String, style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<22}"), theme::muted()),
        Span::styled(value, style),
    ])
}

fn price_lines(s: &Summary) -> Vec<Line<'static>> {
    vec![
        metric("Current Price", format_price(s.current_price), theme::accent_bold()),
        metric("52-Week High", format_price(s.week_52_high), theme::text()),
        metric("52-Week Low", format_price(s.week_52_low), theme::text()),
        metric("Average Close", format_price(s.avg_close), theme::text()),
    ]
}

fn performance_lines(s: &Summary, t: &Theme) -> Vec<Line<'static>> {
    vec![
        metric(
            "Avg Daily Return",
            format!("{:+.2}%", s.avg_daily_return_percent),
            Style::default().fg(t.change_color(s.avg_daily_return_percent)),
        ),
        metric(
            "Volatility Score",
            format!("{:.2}%", s.volatility_score),
            Style::default().fg(t.volatility_color(s.volatility_band())),
        ),
        metric("Average Volume", format!("{:.0}", s.avg_volume), theme::text()),
        metric("Total Trading Days", s.total_days.to_string(), theme::text()),
    ]
}
