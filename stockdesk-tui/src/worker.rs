//! Background worker thread — every pipeline call runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Fetches
//! can block for the provider timeout, so the UI thread never touches the
//! pipeline directly.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use stockdesk_core::export::export_rows_csv;
use stockdesk_core::{Company, Pipeline, PipelineError, SeriesResult};

use crate::app::ErrorCategory;

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    ListCompanies,
    LoadSeries {
        symbol: String,
    },
    Refresh {
        symbol: String,
    },
    Export {
        symbol: String,
        limit: usize,
        path: PathBuf,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    Companies(Vec<Company>),
    Series {
        symbol: String,
        result: SeriesResult,
        refreshed: bool,
    },
    Exported {
        symbol: String,
        path: PathBuf,
        rows: usize,
    },
    Error {
        category: ErrorCategory,
        message: String,
        context: String,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    pipeline: Arc<Pipeline>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stockdesk-worker".into())
        .spawn(move || worker_loop(&pipeline, rx, tx))
}

fn worker_loop(pipeline: &Pipeline, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(cmd) => {
                let Some(resp) = handle_command(pipeline, cmd) else {
                    continue;
                };
                if tx.send(resp).is_err() {
                    // UI is gone.
                    break;
                }
            }
        }
    }
    tracing::debug!("worker stopped");
}

fn handle_command(pipeline: &Pipeline, cmd: WorkerCommand) -> Option<WorkerResponse> {
    let resp = match cmd {
        WorkerCommand::ListCompanies => match pipeline.list_companies() {
            Ok(companies) => WorkerResponse::Companies(companies),
            Err(e) => pipeline_error(e, "list companies".into()),
        },
        WorkerCommand::LoadSeries { symbol } => {
            let result = pipeline.get_series(&symbol);
            series_response(symbol, result, false)
        }
        WorkerCommand::Refresh { symbol } => {
            let result = pipeline.refresh(&symbol);
            series_response(symbol, result, true)
        }
        WorkerCommand::Export {
            symbol,
            limit,
            path,
        } => handle_export(pipeline, symbol, limit, path),
        WorkerCommand::Shutdown => return None, // handled in loop
    };
    Some(resp)
}

fn series_response(
    symbol: String,
    result: Result<SeriesResult, PipelineError>,
    refreshed: bool,
) -> WorkerResponse {
    match result {
        Ok(result) => {
            tracing::info!(
                symbol = %symbol,
                rows = result.rows.len(),
                source = ?result.source,
                refreshed,
                "series loaded"
            );
            WorkerResponse::Series {
                symbol,
                result,
                refreshed,
            }
        }
        Err(e) => {
            let verb = if refreshed { "refresh" } else { "load" };
            pipeline_error(e, format!("{verb} {symbol}"))
        }
    }
}

fn handle_export(pipeline: &Pipeline, symbol: String, limit: usize, path: PathBuf) -> WorkerResponse {
    let rows = match pipeline.get_recent(&symbol, limit) {
        Ok(rows) => rows,
        Err(e) => return pipeline_error(e, format!("export {symbol}")),
    };
    match export_rows_csv(&rows, &path) {
        Ok(()) => {
            tracing::info!(symbol = %symbol, rows = rows.len(), path = %path.display(), "exported");
            WorkerResponse::Exported {
                symbol,
                path,
                rows: rows.len(),
            }
        }
        Err(e) => export_error(e.to_string(), &path),
    }
}

fn pipeline_error(err: PipelineError, context: String) -> WorkerResponse {
    let category = if err.is_no_data() {
        ErrorCategory::NoData
    } else {
        tracing::error!(error = %err, context = %context, "pipeline failure");
        ErrorCategory::Store
    };
    WorkerResponse::Error {
        category,
        message: err.to_string(),
        context,
    }
}

fn export_error(message: String, path: &std::path::Path) -> WorkerResponse {
    tracing::error!(error = %message, path = %path.display(), "export failed");
    WorkerResponse::Error {
        category: ErrorCategory::Export,
        message,
        context: path.display().to_string(),
    }
}
