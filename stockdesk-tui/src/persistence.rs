//! Dashboard state persistence — JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::{AppState, Tab};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub selected_symbol: Option<String>,
    pub active_tab: Tab,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            selected_symbol: None,
            active_tab: Tab::Price,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    let selected_symbol = app
        .loaded
        .as_ref()
        .map(|s| s.symbol.clone())
        .or_else(|| app.companies.selected().map(|c| c.symbol.clone()));
    PersistedState {
        selected_symbol,
        active_tab: app.active_tab,
    }
}

/// Apply persisted state to AppState. The symbol is restored once the
/// company list arrives from the worker.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.active_tab = state.active_tab;
    app.restore_symbol = state.selected_symbol;
}
