//! Metric cards — current price, 52-week range, volatility.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use stockdesk_core::Summary;

use crate::theme::{self, Theme};

pub fn render(f: &mut Frame, area: Rect, summary: &Summary) {
    let t = Theme::default();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let change = summary.avg_daily_return_percent;
    card(
        f,
        cols[0],
        "Current Price",
        format_price(summary.current_price),
        Some(Span::styled(
            format!("{change:+.2}% avg/day"),
            Style::default().fg(t.change_color(change)),
        )),
    );
    card(
        f,
        cols[1],
        "52-Week High",
        format_price(summary.week_52_high),
        None,
    );
    card(
        f,
        cols[2],
        "52-Week Low",
        format_price(summary.week_52_low),
        None,
    );

    let band = summary.volatility_band();
    card(
        f,
        cols[3],
        "Volatility Score",
        format!("{:.2}%", summary.volatility_score),
        Some(Span::styled(
            band.label(),
            Style::default().fg(t.volatility_color(band)),
        )),
    );
}

fn card(f: &mut Frame, area: Rect, title: &str, value: String, footer: Option<Span>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(format!(" {title} "))
        .title_style(theme::muted());
    let mut lines = vec![Line::from(Span::styled(value, theme::accent_bold()))];
    if let Some(footer) = footer {
        lines.push(Line::from(footer));
    }
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Rupee amount with two decimals.
pub fn format_price(value: f64) -> String {
    format!("\u{20b9}{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_are_rupees_with_two_decimals() {
        assert_eq!(format_price(3456.789), "\u{20b9}3456.79");
        assert_eq!(format_price(0.0), "\u{20b9}0.00");
    }
}
