//! Candlestick chart with the 7-day moving average drawn over it.
//!
//! Direct buffer writes:
//! - Each candle = 1 terminal column, newest on the right
//! - Body: block char, green if close >= open, pink otherwise
//! - Wicks: `|` up to high and down to low
//! - MA-7: one accent dot per column at the average's level

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use stockdesk_core::MetricRow;

use crate::theme::Theme;

const LABEL_WIDTH: u16 = 8;

pub struct CandleChart<'a> {
    rows: &'a [MetricRow],
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> CandleChart<'a> {
    pub fn new(rows: &'a [MetricRow], title: &'a str, theme: &'a Theme) -> Self {
        Self { rows, title, theme }
    }
}

/// Map a price to a Y offset in the plot area (0 = top).
pub fn price_to_y(price: f64, y_min: f64, y_max: f64, plot_height: u16) -> u16 {
    if (y_max - y_min).abs() < 1e-9 || plot_height == 0 {
        return 0;
    }
    let frac = (price - y_min) / (y_max - y_min);
    let y = plot_height.saturating_sub(1) as f64 * (1.0 - frac);
    y.round().max(0.0).min(plot_height.saturating_sub(1) as f64) as u16
}

/// Price bounds over the visible rows, padded by 5% of the range.
fn bounds(rows: &[MetricRow]) -> (f64, f64) {
    let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
        (lo.min(r.low).min(r.ma_7), hi.max(r.high).max(r.ma_7))
    });
    let range = hi - lo;
    let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
    (lo - pad, hi + pad)
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.rows.is_empty() {
            Block::default()
                .title(format!(" {} [No Data] ", self.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .style(Style::default().bg(self.theme.background))
                .render(area, buf);
            return;
        }

        let inner_width = area.width.saturating_sub(2 + LABEL_WIDTH) as usize;
        let start = self.rows.len().saturating_sub(inner_width.max(1));
        let visible = &self.rows[start..];

        let up = visible.iter().filter(|r| r.close >= r.open).count();
        let block = Block::default()
            .title(format!(
                " {} | {} days | {} up {} down | \u{2022} MA-7 ",
                self.title,
                visible.len(),
                up,
                visible.len() - up,
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));
        let inner = block.inner(area);
        block.render(area, buf);

        // Left margin for price labels, bottom row for the date range.
        let plot_left = inner.x + LABEL_WIDTH;
        let plot_top = inner.y;
        let plot_width = inner.width.saturating_sub(LABEL_WIDTH);
        let plot_height = inner.height.saturating_sub(1);
        if plot_width == 0 || plot_height == 0 {
            return;
        }

        let (y_lower, y_upper) = bounds(visible);
        let muted = Style::default().fg(self.theme.muted);

        let labels = [y_upper, (y_upper + y_lower) / 2.0, y_lower];
        let positions = [0u16, plot_height / 2, plot_height.saturating_sub(1)];
        for (value, y_pos) in labels.iter().zip(positions.iter()) {
            buf.set_string(inner.x, plot_top + y_pos, format!("{value:>7.1}"), muted);
        }

        for (i, row) in visible.iter().take(plot_width as usize).enumerate() {
            let x = plot_left + i as u16;
            let is_up = row.close >= row.open;
            let style = Style::default().fg(if is_up {
                self.theme.positive
            } else {
                self.theme.negative
            });

            let high_y = price_to_y(row.high, y_lower, y_upper, plot_height);
            let low_y = price_to_y(row.low, y_lower, y_upper, plot_height);
            let body_top = price_to_y(row.open.max(row.close), y_lower, y_upper, plot_height);
            let body_bot = price_to_y(row.open.min(row.close), y_lower, y_upper, plot_height);

            for y in high_y..body_top {
                buf.set_string(x, plot_top + y, "|", style);
            }
            let body = if is_up { "\u{2588}" } else { "\u{2593}" };
            for y in body_top..=body_bot {
                buf.set_string(x, plot_top + y, body, style);
            }
            for y in (body_bot + 1)..=low_y {
                buf.set_string(x, plot_top + y, "|", style);
            }

            let ma_y = price_to_y(row.ma_7, y_lower, y_upper, plot_height);
            buf.set_string(
                x,
                plot_top + ma_y,
                "\u{2022}",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        }

        if let (Some(first), Some(last)) = (visible.first(), visible.last()) {
            let info_y = plot_top + plot_height;
            if info_y < inner.bottom() {
                buf.set_string(
                    plot_left,
                    info_y,
                    format!("{} .. {}", first.date, last.date),
                    muted,
                );
            }
        }
    }
}
