//! Data tab — the last 30 metric rows, newest first.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use stockdesk_core::MetricRow;

use crate::app::LoadedSeries;
use crate::theme::{self, Theme};

const HEADERS: [&str; 11] = [
    "Date", "Open", "High", "Low", "Close", "Volume", "Return %", "MA-7", "52W High", "52W Low",
    "Vol %",
];

pub fn render(f: &mut Frame, area: Rect, series: &LoadedSeries) {
    let t = Theme::default();
    let recent = series.table_rows();

    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h)))
        .style(theme::accent().add_modifier(Modifier::BOLD))
        .height(1);

    let rows = recent.iter().rev().map(|r| {
        let cells: Vec<Cell> = table_cells(r)
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                if i == 6 {
                    Cell::from(text).style(Style::default().fg(t.change_color(r.daily_return)))
                } else {
                    Cell::from(text)
                }
            })
            .collect();
        Row::new(cells).style(theme::text()).height(1)
    });

    let widths = [
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Min(6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::muted())
                .title(format!(" Last {} Days [x]export CSV ", recent.len()))
                .title_style(theme::muted()),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

/// Display strings for one row; the return is shown in percent.
pub fn table_cells(r: &MetricRow) -> [String; 11] {
    [
        r.date.to_string(),
        format!("{:.2}", r.open),
        format!("{:.2}", r.high),
        format!("{:.2}", r.low),
        format!("{:.2}", r.close),
        r.volume.to_string(),
        format!("{:+.2}", r.daily_return_percent()),
        format!("{:.2}", r.ma_7),
        format!("{:.2}", r.week_52_high),
        format!("{:.2}", r.week_52_low),
        format!("{:.2}", r.volatility_score),
    ]
}
