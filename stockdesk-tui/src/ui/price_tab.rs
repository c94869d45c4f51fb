//! Price tab — candles with MA-7, volume underneath.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Sparkline};
use ratatui::Frame;

use crate::app::LoadedSeries;
use crate::theme::{self, Theme};
use crate::ui::candle_chart::CandleChart;

pub fn render(f: &mut Frame, area: Rect, series: &LoadedSeries) {
    let t = Theme::default();
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(area);

    let title = format!("{} Price", series.symbol);
    f.render_widget(CandleChart::new(&series.rows, &title, &t), parts[0]);

    // Sparkline draws from the left; keep the newest bars that fit.
    let width = parts[1].width.saturating_sub(2) as usize;
    let start = series.rows.len().saturating_sub(width);
    let volumes: Vec<u64> = series.rows[start..].iter().map(|r| r.volume).collect();
    let max = volumes.iter().copied().max().unwrap_or(0);

    let volume = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::muted())
                .title(format!(" Volume (max {max}) "))
                .title_style(theme::muted()),
        )
        .data(&volumes)
        .style(Style::default().fg(t.neutral));
    f.render_widget(volume, parts[1]);
}
