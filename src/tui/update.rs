//! State transitions: (App, Action) → Transition.
//!
//! This is the core interactive logic. Fully testable without a terminal.
//! Unhandled actions leave the session unchanged.

use log::debug;

use crate::types::GroupHandle;

use super::state::{Action, App, ConfirmOutcome, Mode, Page, Transition};

/// Apply one action to the session.
///
/// Each call handles the action completely, including any mutation of the
/// curriculum, before returning.
pub fn update(app: &mut App, action: &Action) -> Transition {
    match action {
        Action::Quit => Transition::Quit,
        Action::Confirm => {
            let outcome = app.confirm_focused();
            report(outcome)
        }
        Action::ConfirmAt { table, row, column } => {
            if let Some(page) = app.page_mut() {
                page.focus_table(*table);
            }
            let outcome = app.confirm_focused_at(*row, *column);
            report(outcome)
        }
        Action::Category(n) => {
            if let Some(index) = usize::from(*n).checked_sub(1) {
                app.select_page(index);
            }
            Transition::Continue
        }
        Action::NextCategory => {
            if !app.pages.is_empty() {
                app.select_page((app.active + 1) % app.pages.len());
            }
            Transition::Continue
        }
        Action::PrevCategory => {
            if !app.pages.is_empty() {
                let len = app.pages.len();
                app.select_page((app.active + len - 1) % len);
            }
            Transition::Continue
        }
        _ => {
            if let Some(page) = app.page_mut() {
                update_page(page, action);
            }
            Transition::Continue
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Turn a confirm outcome into a transition; no-op on a page without tables.
fn report(outcome: Option<(GroupHandle, ConfirmOutcome)>) -> Transition {
    match outcome {
        Some((handle, ConfirmOutcome::Toggled { index, earned })) => {
            debug!(
                "Toggled {}/{} subject {} -> earned={}",
                handle.category, handle.index, index, earned
            );
            Transition::Toggled { handle, index, earned }
        }
        Some((handle, ConfirmOutcome::Ignored)) => {
            debug!("Ignored confirm on {}/{} (no data row)", handle.category, handle.index);
            Transition::Continue
        }
        None => Transition::Continue,
    }
}

/// Cursor movement, focus changes and arming within one page.
fn update_page(page: &mut Page, action: &Action) {
    match action {
        Action::MoveUp => {
            if let Some(table) = page.focused_mut() {
                table.move_up();
            }
        }
        Action::MoveDown => {
            if let Some(table) = page.focused_mut() {
                table.move_down();
            }
        }
        Action::MoveLeft => {
            let moved = page.focused_mut().is_some_and(|t| t.move_left());
            if !moved {
                page.focus_left();
            }
        }
        Action::MoveRight => {
            let moved = page.focused_mut().is_some_and(|t| t.move_right());
            if !moved {
                page.focus_right();
            }
        }
        Action::NextTable => page.focus_next(),
        Action::PrevTable => page.focus_prev(),
        Action::Arm => {
            if let Some(table) = page.focused_mut() {
                match table.mode {
                    Mode::Navigating => table.arm(),
                    Mode::Armed => table.disarm(),
                }
            }
        }
        _ => {}
    }
}

// ============================================================================
// TESTS
// ============================================================================
