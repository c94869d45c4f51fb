//! Returns & Volatility tab — daily return bars around a zero line, and
//! the annualized volatility score as a line chart.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget};
use ratatui::Frame;

use stockdesk_core::MetricRow;

use crate::app::LoadedSeries;
use crate::theme::{self, Theme};

pub fn render(f: &mut Frame, area: Rect, series: &LoadedSeries) {
    let t = Theme::default();
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    f.render_widget(ReturnBars::new(&series.rows, &t), parts[0]);
    render_volatility(f, parts[1], &series.rows, &t);
}

/// One column per day, green above zero, pink below.
pub struct ReturnBars<'a> {
    rows: &'a [MetricRow],
    theme: &'a Theme,
}

impl<'a> ReturnBars<'a> {
    pub fn new(rows: &'a [MetricRow], theme: &'a Theme) -> Self {
        Self { rows, theme }
    }
}

impl Widget for ReturnBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.muted))
            .title(" Daily Returns (%) ")
            .title_style(Style::default().fg(self.theme.muted));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.rows.is_empty() || inner.width == 0 || inner.height < 2 {
            return;
        }

        let start = self.rows.len().saturating_sub(inner.width as usize);
        let visible = &self.rows[start..];
        let peak = visible
            .iter()
            .map(|r| r.daily_return_percent().abs())
            .fold(0.0_f64, f64::max);

        let half = (inner.height / 2).max(1);
        let zero_y = inner.y + half.saturating_sub(1);
        let muted = Style::default().fg(self.theme.muted);

        for x in inner.x..inner.right() {
            buf.set_string(x, zero_y, "\u{2500}", muted);
        }
        buf.set_string(inner.x, inner.y, format!("+{peak:.2}"), muted);

        for (i, row) in visible.iter().enumerate() {
            let pct = row.daily_return_percent();
            if peak <= 0.0 || pct == 0.0 {
                continue;
            }
            let x = inner.x + i as u16;
            let style = Style::default().fg(self.theme.change_color(pct));
            if pct > 0.0 {
                let room = zero_y - inner.y;
                let len = ((pct / peak) * room as f64).round().max(1.0) as u16;
                for dy in 1..=len.min(room) {
                    buf.set_string(x, zero_y - dy, "\u{2588}", style);
                }
            } else {
                let room = inner.bottom() - 1 - zero_y;
                let len = ((-pct / peak) * room as f64).round().max(1.0) as u16;
                for dy in 1..=len.min(room) {
                    buf.set_string(x, zero_y + dy, "\u{2588}", style);
                }
            }
        }
    }
}

fn render_volatility(f: &mut Frame, area: Rect, rows: &[MetricRow], t: &Theme) {
    let data: Vec<(f64, f64)> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| (i as f64, r.volatility_score))
        .collect();
    let max_y = data.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max);
    let y_max = if max_y > 0.0 { max_y * 1.05 } else { 1.0 };
    let x_max = rows.len().saturating_sub(1) as f64;

    let (first, last) = match (rows.first(), rows.last()) {
        (Some(a), Some(b)) => (a.date.to_string(), b.date.to_string()),
        _ => (String::new(), String::new()),
    };

    let dataset = Dataset::default()
        .name("Volatility (%)")
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(t.warning))
        .graph_type(GraphType::Line)
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::muted())
                .title(" Volatility Score (annualized %) ")
                .title_style(theme::muted()),
        )
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(vec![
                    Span::styled(first, theme::muted()),
                    Span::styled(last, theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::styled("0", theme::muted()),
                    Span::styled(format!("{y_max:.0}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
