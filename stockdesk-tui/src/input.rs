//! Keyboard input dispatch — overlays → global keys → company list keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay, Tab};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(tab) = c.to_digit(10).and_then(|d| Tab::from_index(d as usize - 1)) {
                app.active_tab = tab;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_tab = app.active_tab.prev();
            } else {
                app.active_tab = app.active_tab.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_tab = app.active_tab.prev();
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        _ => {}
    }

    // 3. Company list and series actions.
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.companies.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.companies.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.companies.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.companies.cursor = app.companies.companies.len().saturating_sub(1);
        }
        KeyCode::Enter => app.load_selected(),
        KeyCode::Char('r') => app.refresh_selected(),
        KeyCode::Char('x') => app.export_loaded(),
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}
