//! TUI color semantics and style constants.
//!
//! Pure data — consumed by the rendering layer for visual consistency.
//!
//! Color semantics:
//! - Yellow: table headers
//! - Red: earned credit (the only user-toggled state)
//! - White: plain cell data
//! - Cyan: focus and keybinding hints
//! - Dim: de-emphasized (inactive borders, help line)

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// CELL STYLES
// ============================================================================

/// Column header text.
pub const STYLE_HEADER: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);

/// Ordinary cell data.
pub const STYLE_CELL: Style = Style::new().fg(Color::White);

/// Earned-credit cell when the flag is set.
pub const STYLE_EARNED: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

/// Earned-credit cell when the flag is clear.
pub const STYLE_NOT_EARNED: Style = STYLE_CELL;

// ============================================================================
// UI ELEMENT STYLES
// ============================================================================

/// Title bar.
pub const STYLE_TITLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

/// Active category tab in the title bar.
pub const STYLE_TAB_ACTIVE: Style = Style::new().fg(Color::Black).bg(Color::Cyan);

/// Inactive category tab.
pub const STYLE_TAB: Style = Style::new().fg(Color::DarkGray);

/// Border of the focused table.
pub const STYLE_FOCUS_BORDER: Style = Style::new().fg(Color::Cyan);

/// Border of unfocused tables.
pub const STYLE_BORDER: Style = Style::new().fg(Color::DarkGray);

/// Cursor row in the focused table.
pub const STYLE_CURSOR: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Cursor cell while a table is armed.
pub const STYLE_ARMED_CELL: Style = Style::new().fg(Color::Black).bg(Color::Cyan);

/// Footer / help line.
pub const STYLE_HELP: Style = Style::new().fg(Color::DarkGray);

/// Placeholder text for empty pages.
pub const STYLE_DIM: Style = Style::new().fg(Color::DarkGray);

// ============================================================================
// TESTS
// ============================================================================
