//! Application state — single-owner, main-thread only.
//!
//! All dashboard state lives here. The worker thread communicates via channels.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use stockdesk_core::{Company, MetricRow, SeriesSource, Summary};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Rows shown in the Data tab and written by CSV export.
pub const TABLE_ROWS: usize = 30;

const ERROR_HISTORY_CAP: usize = 50;

/// Which tab of the right-hand pane is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tab {
    Price,
    Returns,
    Data,
    Summary,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Price, Tab::Returns, Tab::Data, Tab::Summary];

    pub fn index(self) -> usize {
        match self {
            Tab::Price => 0,
            Tab::Returns => 1,
            Tab::Data => 2,
            Tab::Summary => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Tab::ALL.get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Price => "Price",
            Tab::Returns => "Returns & Volatility",
            Tab::Data => "Data",
            Tab::Summary => "Summary",
        }
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NoData,
    Store,
    Export,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::NoData => "NODATA",
            ErrorCategory::Store => "STORE",
            ErrorCategory::Export => "CSV",
            ErrorCategory::Other => "ERR",
        }
    }
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Left pane: the company directory and its cursor.
#[derive(Debug, Default)]
pub struct CompanyListState {
    pub companies: Vec<Company>,
    pub cursor: usize,
}

impl CompanyListState {
    pub fn selected(&self) -> Option<&Company> {
        self.companies.get(self.cursor)
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.companies.len() {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Put the cursor on `symbol` if it is listed.
    pub fn select_symbol(&mut self, symbol: &str) -> bool {
        match self.companies.iter().position(|c| c.symbol == symbol) {
            Some(i) => {
                self.cursor = i;
                true
            }
            None => false,
        }
    }
}

/// The series currently on screen.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub symbol: String,
    pub name: String,
    /// Ascending by date.
    pub rows: Vec<MetricRow>,
    pub summary: Summary,
    pub source: SeriesSource,
}

impl LoadedSeries {
    /// Newest `TABLE_ROWS` rows, oldest first.
    pub fn table_rows(&self) -> &[MetricRow] {
        let start = self.rows.len().saturating_sub(TABLE_ROWS);
        &self.rows[start..]
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub active_tab: Tab,

    pub companies: CompanyListState,
    pub loaded: Option<LoadedSeries>,
    /// Symbol the worker is currently loading or refreshing.
    pub pending: Option<String>,
    /// Symbol to select once the directory arrives.
    pub restore_symbol: Option<String>,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,

    // Paths
    pub export_dir: PathBuf,
    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        export_dir: PathBuf,
        state_path: PathBuf,
    ) -> Self {
        Self {
            running: true,
            active_tab: Tab::Price,
            companies: CompanyListState::default(),
            loaded: None,
            pending: None,
            restore_symbol: None,
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            export_dir,
            state_path,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Send a command to the worker, recording an error if it has gone away.
    pub fn send(&mut self, cmd: WorkerCommand) -> bool {
        if self.worker_tx.send(cmd).is_err() {
            self.push_error(
                ErrorCategory::Other,
                "worker thread is not running".into(),
                String::new(),
            );
            return false;
        }
        true
    }

    /// Ask the worker for the series under the cursor.
    pub fn load_selected(&mut self) {
        self.dispatch_for_selected(false);
    }

    /// Ask the worker to re-fetch the series under the cursor.
    pub fn refresh_selected(&mut self) {
        self.dispatch_for_selected(true);
    }

    fn dispatch_for_selected(&mut self, refresh: bool) {
        if let Some(pending) = &self.pending {
            self.set_warning(format!("Still working on {pending}..."));
            return;
        }
        let Some(symbol) = self.companies.selected().map(|c| c.symbol.clone()) else {
            self.set_warning("No company selected");
            return;
        };
        let cmd = if refresh {
            WorkerCommand::Refresh {
                symbol: symbol.clone(),
            }
        } else {
            WorkerCommand::LoadSeries {
                symbol: symbol.clone(),
            }
        };
        if self.send(cmd) {
            let verb = if refresh { "Refreshing" } else { "Loading" };
            self.set_status(format!("{verb} {symbol}..."));
            self.pending = Some(symbol);
        }
    }

    /// Export the loaded series' table rows to `<export_dir>/<SYMBOL>_data.csv`.
    pub fn export_loaded(&mut self) {
        let Some(symbol) = self.loaded.as_ref().map(|s| s.symbol.clone()) else {
            self.set_warning("Load a company before exporting");
            return;
        };
        let path = self.export_dir.join(format!("{symbol}_data.csv"));
        if self.send(WorkerCommand::Export {
            symbol: symbol.clone(),
            limit: TABLE_ROWS,
            path,
        }) {
            self.set_status(format!("Exporting {symbol}..."));
        }
    }

    /// Apply one worker response.
    pub fn handle_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Companies(companies) => {
                let count = companies.len();
                self.companies.companies = companies;
                self.companies.cursor = 0;
                if let Some(symbol) = self.restore_symbol.take() {
                    self.companies.select_symbol(&symbol);
                }
                self.set_status(format!("{count} companies"));
                if count > 0 {
                    self.load_selected();
                }
            }
            WorkerResponse::Series {
                symbol,
                result,
                refreshed,
            } => {
                self.pending = None;
                let name = self
                    .companies
                    .companies
                    .iter()
                    .find(|c| c.symbol == symbol)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| symbol.clone());
                let origin = match (refreshed, result.source) {
                    (true, _) => "refreshed",
                    (false, SeriesSource::Cache) => "from cache",
                    (false, SeriesSource::Fetched) => "fetched",
                };
                self.set_status(format!("{symbol}: {} rows {origin}", result.rows.len()));
                self.loaded = Some(LoadedSeries {
                    symbol,
                    name,
                    rows: result.rows,
                    summary: result.summary,
                    source: result.source,
                });
            }
            WorkerResponse::Exported { symbol, path, rows } => {
                self.set_status(format!("Exported {rows} {symbol} rows to {}", path.display()));
            }
            WorkerResponse::Error {
                category,
                message,
                context,
            } => {
                if matches!(category, ErrorCategory::NoData | ErrorCategory::Store) {
                    self.pending = None;
                }
                self.push_error(category, message, context);
            }
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
