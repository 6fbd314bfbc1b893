//! Pure rendering: map App state to ratatui widget trees.
//!
//! Widget-building functions are pure (state in, widgets out); the only
//! effect is Frame::render_widget() which writes to the terminal buffer.
//! Cell text and colour for boolean fields come from [`flag_cell`] and
//! [`earned_cell`], so the displayed value is always derived from the
//! subject's state.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Position, Rect, Size};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::layout::{cursor_line, row_heights, scroll_offset};
use crate::types::{Group, Subject};

use super::state::{Action, App, Mode, Page, TABLE_COLUMNS, TableView};
use super::theme;

/// Column titles, in column order.
pub const HEADERS: [&str; TABLE_COLUMNS] = ["Name", "Credits", "Require", "JABEE Required", "Earned Credit"];

/// Compact titles for narrow tables.
pub const SHORT_HEADERS: [&str; TABLE_COLUMNS] = ["Name", "Cr", "Req", "JABEE", "Earned"];

/// Widths of the non-name columns under [`HEADERS`] and [`SHORT_HEADERS`].
/// Index 0 is unused: the name column takes what is left.
const FULL_WIDTHS: [u16; TABLE_COLUMNS] = [0, 7, 7, 14, 13];
const SHORT_WIDTHS: [u16; TABLE_COLUMNS] = [0, 3, 5, 5, 6];

/// Name column width below which other columns give way.
const NAME_MIN_WIDTH: u16 = 12;

/// Columns hidden first when a table is narrow: JABEE, Require, Credits.
/// Name and Earned are always shown.
const DROP_ORDER: [usize; 3] = [3, 2, 1];

/// Gap between table columns, as drawn by [`Table`].
const COLUMN_SPACING: u16 = 1;

// ============================================================================
// CELL FORMATTING
// ============================================================================

/// Text and style for a static boolean column.
pub fn flag_cell(flag: bool) -> (&'static str, Style) {
    (bool_text(flag), theme::STYLE_CELL)
}

/// Text and style for the earned-credit column.
pub fn earned_cell(earned: bool) -> (&'static str, Style) {
    let style = if earned {
        theme::STYLE_EARNED
    } else {
        theme::STYLE_NOT_EARNED
    };
    (bool_text(earned), style)
}

fn bool_text(flag: bool) -> &'static str {
    if flag { "true" } else { "false" }
}

/// Cells of one data row, in column order.
pub fn subject_cells(subject: &Subject) -> [(String, Style); TABLE_COLUMNS] {
    let (required, required_style) = flag_cell(subject.required);
    let (jabee, jabee_style) = flag_cell(subject.jabee_required);
    let (earned, earned_style) = earned_cell(subject.earned);
    [
        (subject.name.clone(), theme::STYLE_CELL),
        (subject.credits.to_string(), theme::STYLE_CELL),
        (required.to_string(), required_style),
        (jabee.to_string(), jabee_style),
        (earned.to_string(), earned_style),
    ]
}

// ============================================================================
// COLUMN LAYOUT
// ============================================================================

/// One displayed column of a subject table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSlot {
    /// Logical column, `0..TABLE_COLUMNS`.
    pub column: usize,
    pub title: &'static str,
    pub width: u16,
}

fn fixed_width(columns: &[usize], widths: &[u16; TABLE_COLUMNS]) -> u16 {
    let gaps = u16::try_from(columns.len().saturating_sub(1)).unwrap_or(u16::MAX);
    columns
        .iter()
        .filter(|&&c| c != 0)
        .fold(gaps.saturating_mul(COLUMN_SPACING), |acc, &c| acc.saturating_add(widths[c]))
}

/// Columns shown in a table whose inner width is `inner_width`.
///
/// The name column always comes first and gets every cell the other
/// columns leave. Full titles are used when they fit beside a name of
/// [`NAME_MIN_WIDTH`]; otherwise compact titles, dropping columns in
/// [`DROP_ORDER`] until the name fits.
pub fn table_columns(inner_width: u16) -> Vec<ColumnSlot> {
    let all: Vec<usize> = (0..TABLE_COLUMNS).collect();

    let (columns, titles, widths) = if inner_width >= NAME_MIN_WIDTH.saturating_add(fixed_width(&all, &FULL_WIDTHS)) {
        (all, &HEADERS, &FULL_WIDTHS)
    } else {
        let mut columns = all;
        for drop in DROP_ORDER {
            if inner_width >= NAME_MIN_WIDTH.saturating_add(fixed_width(&columns, &SHORT_WIDTHS)) {
                break;
            }
            columns.retain(|&c| c != drop);
        }
        (columns, &SHORT_HEADERS, &SHORT_WIDTHS)
    };

    let name_width = inner_width.saturating_sub(fixed_width(&columns, widths));
    columns
        .into_iter()
        .map(|column| ColumnSlot {
            column,
            title: titles[column],
            width: if column == 0 { name_width } else { widths[column] },
        })
        .collect()
}

/// Logical column under horizontal offset `x` of a table's inner area.
///
/// A click on the gap after a column counts for that column.
pub fn column_at(slots: &[ColumnSlot], x: u16) -> usize {
    let mut end: u16 = 0;
    for slot in slots {
        end = end.saturating_add(slot.width).saturating_add(COLUMN_SPACING);
        if x < end {
            return slot.column;
        }
    }
    slots.last().map(|s| s.column).unwrap_or(0)
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Split the frame into title, content and help areas.
fn frame_areas(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(1), // category tabs
        Constraint::Min(0),    // table grid
        Constraint::Length(1), // help
    ])
    .areas(area)
}

/// Render the session to the terminal frame.
pub fn render(app: &App, frame: &mut Frame) {
    let [title_area, content_area, help_area] = frame_areas(frame.area());

    frame.render_widget(render_title(app), title_area);
    frame.render_widget(render_help(app), help_area);

    match app.page() {
        Some(page) if !page.tables.is_empty() => render_page(app, page, frame, content_area),
        Some(page) => {
            let text = format!("  No groups in {}", page.category);
            frame.render_widget(Paragraph::new(Span::styled(text, theme::STYLE_DIM)), content_area);
        }
        None => {
            frame.render_widget(
                Paragraph::new(Span::styled("  No categories loaded", theme::STYLE_DIM)),
                content_area,
            );
        }
    }
}

// ============================================================================
// SHARED LAYOUT
// ============================================================================

/// Category tabs, the active one highlighted.
fn render_title(app: &App) -> Paragraph<'static> {
    let mut spans = vec![Span::styled("Syllabus ", theme::STYLE_TITLE)];
    for (i, page) in app.pages.iter().enumerate() {
        let style = if i == app.active {
            theme::STYLE_TAB_ACTIVE
        } else {
            theme::STYLE_TAB
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, page.category), style));
    }
    Paragraph::new(Line::from(spans))
}

/// Help line for the focused table's mode.
fn render_help(app: &App) -> Paragraph<'static> {
    let armed = app
        .page()
        .and_then(Page::focused)
        .is_some_and(|t| t.mode == Mode::Armed);

    let help_text = if armed {
        "[h/l] column  [Enter] toggle earned  [v] cancel  [Esc] quit"
    } else {
        "[j/k] move  [h/l/Tab] table  [Enter/click] toggle earned  [v] select cell  [1-3/[/]] category  [Esc] quit"
    };

    Paragraph::new(Span::styled(help_text, theme::STYLE_HELP))
}

// ============================================================================
// PAGE GRID
// ============================================================================

/// Placement of a page's tables inside the scroll view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGeometry {
    /// Scroll view content size, a column narrower than the area for the
    /// scrollbar.
    pub content: Size,
    /// Vertical scroll offset keeping the focused cursor on screen.
    pub offset: u16,
    /// One rect per table in scroll-view coordinates, in table order.
    pub tables: Vec<Rect>,
}

/// Lay out `page` in an `area` of the screen.
pub fn page_geometry(page: &Page, area: Rect) -> PageGeometry {
    let counts: Vec<usize> = page.tables.iter().map(TableView::data_rows).collect();
    let heights = row_heights(&page.grid, &counts);
    let total_height: u16 = heights.iter().fold(0u16, |acc, h| acc.saturating_add(*h));

    // Leave a column for the vertical scrollbar.
    let content_width = area.width.saturating_sub(1);
    let per_row = page.grid.per_row();
    let mut tables = vec![Rect::default(); page.tables.len()];

    let mut y: u16 = 0;
    for (row, height) in page.grid.rows().iter().zip(&heights) {
        let row_area = Rect::new(0, y, content_width, *height);
        let columns = Layout::horizontal(vec![Constraint::Ratio(1, per_row as u32); per_row]).split(row_area);

        for (slot, &index) in row.iter().enumerate() {
            if let (Some(rect), Some(&column)) = (tables.get_mut(index), columns.get(slot)) {
                *rect = column;
            }
        }
        y = y.saturating_add(*height);
    }

    let cursor = page.focused().map(|t| t.cursor.row).unwrap_or(0);
    PageGeometry {
        content: Size::new(content_width, total_height),
        offset: scroll_offset(&heights, page.focus_row(), cursor_line(cursor), area.height),
        tables,
    }
}

/// Map a click on terminal cell `(x, y)` to the table cell under it.
///
/// `frame_area` is the whole terminal, as passed to [`render`]. Clicks
/// outside any table's inner area (borders, gaps, title and help lines,
/// the scrollbar) map to nothing.
pub fn hit_test(app: &App, frame_area: Rect, x: u16, y: u16) -> Option<Action> {
    let [_, content_area, _] = frame_areas(frame_area);
    if !content_area.contains(Position::new(x, y)) {
        return None;
    }
    let page = app.page()?;
    let geometry = page_geometry(page, content_area);

    let point = Position::new(
        x - content_area.x,
        (y - content_area.y).saturating_add(geometry.offset),
    );
    if point.x >= geometry.content.width {
        return None;
    }

    let (table, inner) = geometry
        .tables
        .iter()
        .map(|rect| rect.inner(Margin::new(1, 1)))
        .enumerate()
        .find(|(_, inner)| inner.contains(point))?;

    Some(Action::ConfirmAt {
        table,
        row: usize::from(point.y - inner.y),
        column: column_at(&table_columns(inner.width), point.x - inner.x),
    })
}

/// Render a category's tables as a scrollable grid.
fn render_page(app: &App, page: &Page, frame: &mut Frame, area: Rect) {
    let geometry = page_geometry(page, area);
    let mut scroll_view = ScrollView::new(geometry.content)
        .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
        .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

    for (index, (view, rect)) in page.tables.iter().zip(&geometry.tables).enumerate() {
        let Some(group) = app.curriculum.group(view.handle()) else {
            continue;
        };
        let focused = index == page.focus;
        let inner_width = rect.width.saturating_sub(2);
        scroll_view.render_widget(build_table(group, view, focused, inner_width), *rect);
    }

    let mut state = ScrollViewState::default();
    state.set_offset(Position::new(0, geometry.offset));
    frame.render_stateful_widget(scroll_view, area, &mut state);
}

/// Build the table widget for one group.
///
/// The cursor is drawn only on the focused table: the whole row while
/// navigating, plus the single cell while armed. Columns follow
/// [`table_columns`] for the table's inner width.
fn build_table<'a>(group: &'a Group, view: &TableView, focused: bool, inner_width: u16) -> Table<'a> {
    let slots = table_columns(inner_width);
    let cursor = focused.then_some(view.cursor);
    let armed = focused && view.mode == Mode::Armed;

    let cell_style = |row: usize, column: usize, base: Style| match cursor {
        Some(c) if armed && c.row == row && c.column == column => base.patch(theme::STYLE_ARMED_CELL),
        _ => base,
    };
    let row_style = |row: usize| match cursor {
        Some(c) if c.row == row => theme::STYLE_CURSOR,
        _ => Style::default(),
    };

    let header = Row::new(
        slots
            .iter()
            .map(|slot| {
                Cell::from(Line::from(slot.title).centered())
                    .style(cell_style(0, slot.column, theme::STYLE_HEADER))
            })
            .collect::<Vec<_>>(),
    )
    .style(row_style(0));

    let rows: Vec<Row> = group
        .subjects
        .iter()
        .enumerate()
        .map(|(i, subject)| {
            let row = i + 1;
            let mut texts = subject_cells(subject).map(Some);
            let cells: Vec<Cell> = slots
                .iter()
                .filter_map(|slot| {
                    let (text, style) = texts[slot.column].take()?;
                    Some(Cell::from(Line::from(text).centered()).style(cell_style(row, slot.column, style)))
                })
                .collect();
            Row::new(cells).style(row_style(row))
        })
        .collect();

    let border_style = if focused {
        theme::STYLE_FOCUS_BORDER
    } else {
        theme::STYLE_BORDER
    };

    let widths: Vec<Constraint> = slots.iter().map(|slot| Constraint::Length(slot.width)).collect();

    Table::new(rows, widths)
        .column_spacing(COLUMN_SPACING)
        .header(header)
        .block(
            Block::bordered()
                .title(group.label.as_str())
                .border_style(border_style),
        )
}

// ============================================================================
// TESTS
// ============================================================================
