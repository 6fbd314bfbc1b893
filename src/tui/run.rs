//! TUI effects boundary: event loop, terminal lifecycle, key and mouse
//! mapping.
//!
//! This is the only module with side effects. It wires the state machine
//! (state, update, view) to the real terminal via crossterm and ratatui.
//!
//! Single thread: the loop blocks on the next terminal event and handles
//! it completely (transition, mutation, redraw) before reading another.

use std::io;

use crossterm::ExecutableCommand;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{debug, info};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use super::state::{Action, App, Transition};
use super::update::update;
use super::view::{hit_test, render};

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Esc => Some(Action::Quit),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::MoveRight),
        KeyCode::Tab => Some(Action::NextTable),
        KeyCode::BackTab => Some(Action::PrevTable),

        // Selection
        KeyCode::Char('v') => Some(Action::Arm),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Confirm),

        // Categories
        KeyCode::Char(c @ '1'..='3') => Some(Action::Category(c as u8 - b'0')),
        KeyCode::Char(']') => Some(Action::NextCategory),
        KeyCode::Char('[') => Some(Action::PrevCategory),

        _ => None,
    }
}

/// Map a crossterm mouse event to a semantic Action.
///
/// A left click confirms the table cell under the pointer; the wheel moves
/// the focused table's cursor. `frame_area` is the terminal size the last
/// frame was drawn at.
pub fn map_mouse(app: &App, frame_area: Rect, mouse: MouseEvent) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => hit_test(app, frame_area, mouse.column, mouse.row),
        MouseEventKind::ScrollDown => Some(Action::MoveDown),
        MouseEventKind::ScrollUp => Some(Action::MoveUp),
        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
///
/// Anything already switched on is switched back off if a later step fails.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_then(enable_raw_mode, enter_screen, restore_terminal)
}

/// Run `enable`, then `enter`. If `enter` fails, `restore` runs before its
/// error is returned.
fn enable_then<T>(
    enable: impl FnOnce() -> io::Result<()>,
    enter: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce() -> io::Result<()>,
) -> io::Result<T> {
    enable()?;
    let entered = enter();
    if entered.is_err() {
        let _ = restore();
    }
    entered
}

fn enter_screen() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    io::stdout()
        .execute(EnterAlternateScreen)?
        .execute(EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(io::stdout()))
}

/// Restore the terminal to normal mode.
///
/// Every step runs even if an earlier one fails; the first error is
/// returned.
fn restore_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    let mouse = io::stdout().execute(DisableMouseCapture).map(|_| ());
    let screen = io::stdout().execute(LeaveAlternateScreen).map(|_| ());
    raw.and(mouse).and(screen)
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the viewer until the user quits.
pub fn run(mut app: App) -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore even when the loop failed; report the loop's error first.
    let restored = restore_terminal();
    result?;
    restored?;

    info!("Session ended");
    Ok(())
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Block on the next event; anything else (resize) just redraws.
        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key),
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                map_mouse(app, Rect::new(0, 0, size.width, size.height), mouse)
            }
            _ => continue,
        };

        let Some(action) = action else {
            continue;
        };

        match update(app, &action) {
            Transition::Quit => {
                debug!("Quit requested");
                app.should_quit = true;
            }
            Transition::Toggled { handle, index, earned } => {
                info!(
                    "{} / group {} / subject {}: earned = {}",
                    handle.category, handle.index, index, earned
                );
            }
            Transition::Continue => {}
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::types::{Category, Curriculum, Group, Subject};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn one_group_app() -> App {
        let group = Group::new("Core", vec![Subject::new("X", 2), Subject::new("Y", 2)]);
        App::new(Curriculum::from_categories([(Category::Specialized, vec![group])]), 3)
    }

    #[test]
    fn ctrl_c_maps_to_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(Action::Quit));
    }

    #[test]
    fn esc_maps_to_quit() {
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Action::Quit));
    }

    #[test]
    fn plain_c_is_unmapped() {
        assert_eq!(map_key(press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn vim_keys_map_to_movement() {
        assert_eq!(map_key(press(KeyCode::Char('j'))), Some(Action::MoveDown));
        assert_eq!(map_key(press(KeyCode::Char('k'))), Some(Action::MoveUp));
        assert_eq!(map_key(press(KeyCode::Char('h'))), Some(Action::MoveLeft));
        assert_eq!(map_key(press(KeyCode::Char('l'))), Some(Action::MoveRight));
    }

    #[test]
    fn arrow_keys_map_to_movement() {
        assert_eq!(map_key(press(KeyCode::Up)), Some(Action::MoveUp));
        assert_eq!(map_key(press(KeyCode::Down)), Some(Action::MoveDown));
        assert_eq!(map_key(press(KeyCode::Left)), Some(Action::MoveLeft));
        assert_eq!(map_key(press(KeyCode::Right)), Some(Action::MoveRight));
    }

    #[test]
    fn enter_and_space_confirm() {
        assert_eq!(map_key(press(KeyCode::Enter)), Some(Action::Confirm));
        assert_eq!(map_key(press(KeyCode::Char(' '))), Some(Action::Confirm));
    }

    #[test]
    fn tab_cycles_tables() {
        assert_eq!(map_key(press(KeyCode::Tab)), Some(Action::NextTable));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(Action::PrevTable)
        );
    }

    #[test]
    fn number_keys_select_category() {
        for n in 1..=3u8 {
            let key = press(KeyCode::Char((b'0' + n) as char));
            assert_eq!(map_key(key), Some(Action::Category(n)));
        }
        assert_eq!(map_key(press(KeyCode::Char('4'))), None);
    }

    #[test]
    fn brackets_cycle_categories() {
        assert_eq!(map_key(press(KeyCode::Char(']'))), Some(Action::NextCategory));
        assert_eq!(map_key(press(KeyCode::Char('['))), Some(Action::PrevCategory));
    }

    #[test]
    fn left_click_maps_to_cell_under_pointer() {
        let app = one_group_app();
        let area = Rect::new(0, 0, 80, 20);
        // Row 4 of the screen: title, border, header, X, then Y.
        let click = mouse(MouseEventKind::Down(MouseButton::Left), 4, 4);
        assert_eq!(
            map_mouse(&app, area, click),
            Some(Action::ConfirmAt { table: 0, row: 2, column: 0 })
        );
    }

    #[test]
    fn click_then_update_toggles_subject() {
        let mut app = one_group_app();
        let click = mouse(MouseEventKind::Down(MouseButton::Left), 4, 3);
        let action = map_mouse(&app, Rect::new(0, 0, 80, 20), click).unwrap();

        let result = update(&mut app, &action);

        assert!(matches!(result, Transition::Toggled { index: 0, earned: true, .. }));
    }

    #[test]
    fn other_buttons_and_releases_are_unmapped() {
        let app = one_group_app();
        let area = Rect::new(0, 0, 80, 20);
        for kind in [
            MouseEventKind::Down(MouseButton::Right),
            MouseEventKind::Up(MouseButton::Left),
            MouseEventKind::Moved,
        ] {
            assert_eq!(map_mouse(&app, area, mouse(kind, 4, 3)), None);
        }
    }

    #[test]
    fn wheel_moves_cursor() {
        let app = one_group_app();
        let area = Rect::new(0, 0, 80, 20);
        assert_eq!(map_mouse(&app, area, mouse(MouseEventKind::ScrollDown, 0, 0)), Some(Action::MoveDown));
        assert_eq!(map_mouse(&app, area, mouse(MouseEventKind::ScrollUp, 0, 0)), Some(Action::MoveUp));
    }

    #[test]
    fn failed_setup_restores_terminal() {
        let restored = std::cell::Cell::new(false);
        let result: io::Result<()> = enable_then(
            || Ok(()),
            || Err(io::Error::other("no alternate screen")),
            || {
                restored.set(true);
                Ok(())
            },
        );

        assert_eq!(result.unwrap_err().to_string(), "no alternate screen");
        assert!(restored.get());
    }

    #[test]
    fn successful_setup_leaves_terminal_alone() {
        let restored = std::cell::Cell::new(false);
        let result = enable_then(
            || Ok(()),
            || Ok(7),
            || {
                restored.set(true);
                Ok(())
            },
        );

        assert_eq!(result.unwrap(), 7);
        assert!(!restored.get());
    }

    #[test]
    fn failed_enable_skips_the_rest() {
        let entered = std::cell::Cell::new(false);
        let result: io::Result<()> = enable_then(
            || Err(io::Error::other("not a tty")),
            || {
                entered.set(true);
                Ok(())
            },
            || Ok(()),
        );

        assert!(result.is_err());
        assert!(!entered.get());
    }

    #[test]
    fn v_arms_table() {
        assert_eq!(map_key(press(KeyCode::Char('v'))), Some(Action::Arm));
    }
}
