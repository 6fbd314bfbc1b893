//! TUI state algebra: session model and per-table state machines.
//!
//! The session object ([`App`]) owns the curriculum. Each subject-group
//! table has a [`TableView`] that knows only its group's handle and its
//! cursor; it is handed the subjects when it needs to mutate them.
//! Display strings and colours are derived in the view layer, never
//! stored here.

use log::debug;

use crate::layout::GridLayout;
use crate::types::{Category, Curriculum, GroupHandle, Subject};

/// Columns of a subject table: Name, Credits, Require, JABEE, Earned.
pub const TABLE_COLUMNS: usize = 5;

// ============================================================================
// TABLE VIEW STATE MACHINE
// ============================================================================

/// Selection mode of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Row cursor moves; left/right leave the table.
    #[default]
    Navigating,
    /// Cell refinement: the column cursor is movable too.
    /// The next confirm fires the toggle and returns to Navigating.
    Armed,
}

/// Cursor in table coordinates. Row 0 is the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub column: usize,
}

/// Result of confirming a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// `subjects[index].earned` was inverted and is now `earned`.
    Toggled { index: usize, earned: bool },
    /// Header row, empty table, or a row with no subject: nothing changed.
    Ignored,
}

/// Interactive state of one subject-group table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    handle: GroupHandle,
    data_rows: usize,
    pub cursor: Cursor,
    pub mode: Mode,
}

impl TableView {
    /// Create a view for a group with `data_rows` subjects.
    ///
    /// The cursor starts on the first data cell, or on the header when
    /// there is no data.
    pub fn new(handle: GroupHandle, data_rows: usize) -> Self {
        TableView {
            handle,
            data_rows,
            cursor: Cursor {
                row: usize::from(data_rows > 0),
                column: 0,
            },
            mode: Mode::Navigating,
        }
    }

    pub fn handle(&self) -> GroupHandle {
        self.handle
    }

    pub fn data_rows(&self) -> usize {
        self.data_rows
    }

    pub fn move_up(&mut self) {
        self.cursor.row = self.cursor.row.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        self.cursor.row = (self.cursor.row + 1).min(self.data_rows);
    }

    /// Move the column cursor left. Only meaningful while Armed.
    pub fn move_left(&mut self) -> bool {
        if self.mode != Mode::Armed {
            return false;
        }
        self.cursor.column = self.cursor.column.saturating_sub(1);
        true
    }

    /// Move the column cursor right. Only meaningful while Armed.
    pub fn move_right(&mut self) -> bool {
        if self.mode != Mode::Armed {
            return false;
        }
        self.cursor.column = (self.cursor.column + 1).min(TABLE_COLUMNS - 1);
        true
    }

    pub fn arm(&mut self) {
        self.mode = Mode::Armed;
    }

    pub fn disarm(&mut self) {
        self.mode = Mode::Navigating;
    }

    /// Confirm at the cursor.
    pub fn confirm(&mut self, subjects: &mut [Subject]) -> ConfirmOutcome {
        let Cursor { row, column } = self.cursor;
        self.confirm_at(row, column, subjects)
    }

    /// Confirm at an explicit cell, moving the cursor there.
    ///
    /// On a data row this inverts the subject's `earned` flag, whatever the
    /// column. The header row and rows past the data are ignored. The mode
    /// always returns to Navigating.
    pub fn confirm_at(&mut self, row: usize, column: usize, subjects: &mut [Subject]) -> ConfirmOutcome {
        self.cursor = Cursor {
            row: row.min(self.data_rows),
            column: column.min(TABLE_COLUMNS - 1),
        };
        self.mode = Mode::Navigating;

        let Some(index) = row.checked_sub(1) else {
            return ConfirmOutcome::Ignored;
        };
        match subjects.get_mut(index) {
            Some(subject) => {
                subject.earned = !subject.earned;
                ConfirmOutcome::Toggled {
                    index,
                    earned: subject.earned,
                }
            }
            None => ConfirmOutcome::Ignored,
        }
    }
}

// ============================================================================
// PAGES
// ============================================================================

/// One category laid out as a grid of tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub category: Category,
    pub grid: GridLayout,
    /// One view per group, in group order.
    pub tables: Vec<TableView>,
    /// Index of the focused table.
    pub focus: usize,
}

impl Page {
    /// Build the page for `category` from the curriculum.
    pub fn new(curriculum: &Curriculum, category: Category, tables_per_row: usize) -> Self {
        let tables: Vec<TableView> = curriculum
            .groups(category)
            .iter()
            .enumerate()
            .map(|(index, group)| TableView::new(GroupHandle { category, index }, group.subjects.len()))
            .collect();

        Page {
            category,
            grid: GridLayout::new(tables.len(), tables_per_row),
            tables,
            focus: 0,
        }
    }

    pub fn focused(&self) -> Option<&TableView> {
        self.tables.get(self.focus)
    }

    pub fn focused_mut(&mut self) -> Option<&mut TableView> {
        self.tables.get_mut(self.focus)
    }

    /// Grid row holding the focused table.
    pub fn focus_row(&self) -> usize {
        self.grid.position(self.focus).map(|(r, _)| r).unwrap_or(0)
    }

    /// Move focus to the next table, wrapping.
    pub fn focus_next(&mut self) {
        if !self.tables.is_empty() {
            self.set_focus((self.focus + 1) % self.tables.len());
        }
    }

    /// Move focus to the previous table, wrapping.
    pub fn focus_prev(&mut self) {
        if !self.tables.is_empty() {
            let len = self.tables.len();
            self.set_focus((self.focus + len - 1) % len);
        }
    }

    /// Move focus to the previous table in grid order. From the first
    /// table of a grid row this lands on the last table of the row above.
    /// Stops at the first table.
    pub fn focus_left(&mut self) {
        self.set_focus(self.focus.saturating_sub(1));
    }

    /// Move focus to the next table in grid order. From the last table of
    /// a grid row this lands on the first table of the row below. Stops at
    /// the last table.
    pub fn focus_right(&mut self) {
        if self.focus + 1 < self.tables.len() {
            self.set_focus(self.focus + 1);
        }
    }

    /// Focus table `index`; unknown indices are ignored.
    pub fn focus_table(&mut self, index: usize) {
        if index < self.tables.len() {
            self.set_focus(index);
        }
    }

    /// Leaving a table drops any pending refinement.
    fn set_focus(&mut self, index: usize) {
        if index == self.focus {
            return;
        }
        if let Some(table) = self.tables.get_mut(self.focus) {
            table.disarm();
        }
        self.focus = index;
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    /// Column left while Armed, otherwise previous table in the grid.
    MoveLeft,
    /// Column right while Armed, otherwise next table in the grid.
    MoveRight,
    NextTable,
    PrevTable,
    /// Enter or leave cell refinement on the focused table.
    Arm,
    /// Toggle the earned flag at the cursor.
    Confirm,
    /// Mouse click: focus `table`, move its cursor to the cell and confirm.
    ConfirmAt { table: usize, row: usize, column: usize },
    /// Jump to a category by number (1-based).
    Category(u8),
    NextCategory,
    PrevCategory,
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of applying an action to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Keep running; re-render.
    Continue,
    /// A subject's earned flag changed.
    Toggled {
        handle: GroupHandle,
        index: usize,
        earned: bool,
    },
    /// Stop the event loop.
    Quit,
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Session object: the curriculum plus one page per category.
#[derive(Debug)]
pub struct App {
    pub curriculum: Curriculum,
    pub pages: Vec<Page>,
    /// Index of the page on screen.
    pub active: usize,
    /// Set to true when the app should exit on the next tick.
    pub should_quit: bool,
}

impl App {
    /// Build pages for every loaded category, landing on the first.
    pub fn new(curriculum: Curriculum, tables_per_row: usize) -> Self {
        let pages: Vec<Page> = curriculum
            .categories()
            .map(|category| Page::new(&curriculum, category, tables_per_row))
            .collect();

        debug!(
            "Built {} pages ({} tables)",
            pages.len(),
            pages.iter().map(|p| p.tables.len()).sum::<usize>()
        );

        App {
            curriculum,
            pages,
            active: 0,
            should_quit: false,
        }
    }

    pub fn page(&self) -> Option<&Page> {
        self.pages.get(self.active)
    }

    pub fn page_mut(&mut self) -> Option<&mut Page> {
        self.pages.get_mut(self.active)
    }

    /// Confirm at the focused table's cursor.
    ///
    /// Splits the borrow between the page (cursor state) and the
    /// curriculum (subjects) so the table mutates data it does not own.
    pub fn confirm_focused(&mut self) -> Option<(GroupHandle, ConfirmOutcome)> {
        self.confirm_with(|table, subjects| table.confirm(subjects))
    }

    /// Confirm at an explicit cell of the focused table.
    pub fn confirm_focused_at(&mut self, row: usize, column: usize) -> Option<(GroupHandle, ConfirmOutcome)> {
        self.confirm_with(|table, subjects| table.confirm_at(row, column, subjects))
    }

    fn confirm_with(
        &mut self,
        confirm: impl FnOnce(&mut TableView, &mut [Subject]) -> ConfirmOutcome,
    ) -> Option<(GroupHandle, ConfirmOutcome)> {
        let table = self.pages.get_mut(self.active)?.focused_mut()?;
        let handle = table.handle();
        let subjects = self.curriculum.subjects_mut(handle)?;
        Some((handle, confirm(table, subjects)))
    }

    /// Switch to page `index` if it exists.
    pub fn select_page(&mut self, index: usize) {
        if index < self.pages.len() && index != self.active {
            if let Some(table) = self.page_mut().and_then(Page::focused_mut) {
                table.disarm();
            }
            self.active = index;
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
