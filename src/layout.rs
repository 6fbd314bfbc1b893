//! Grid layout for subject-group tables.
//!
//! Pure functions only. A category's groups are placed into rows of at most
//! N tables (3 by default) in their original order; the rows are stacked
//! into one scrollable page.

/// Tables per grid row unless configured otherwise.
pub const DEFAULT_TABLES_PER_ROW: usize = 3;

/// Lines a table uses besides its data rows: two borders plus the header.
const TABLE_CHROME_HEIGHT: u16 = 3;

// ============================================================================
// PARTITIONING
// ============================================================================

/// Split `items` into rows of at most `per_row`, preserving order.
///
/// Empty input yields exactly one empty row so the page always has a
/// container to render into. A `per_row` of 0 is treated as 1.
pub fn partition<T>(items: impl IntoIterator<Item = T>, per_row: usize) -> Vec<Vec<T>> {
    let per_row = per_row.max(1);
    let mut rows = Vec::new();
    let mut row = Vec::with_capacity(per_row);

    for item in items {
        row.push(item);
        if row.len() == per_row {
            rows.push(std::mem::replace(&mut row, Vec::with_capacity(per_row)));
        }
    }

    if !row.is_empty() || rows.is_empty() {
        rows.push(row);
    }
    rows
}

/// Table indices arranged into grid rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    rows: Vec<Vec<usize>>,
    per_row: usize,
}

impl GridLayout {
    /// Lay out `table_count` tables, `per_row` to a row.
    pub fn new(table_count: usize, per_row: usize) -> Self {
        GridLayout {
            rows: partition(0..table_count, per_row),
            per_row: per_row.max(1),
        }
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Maximum tables in one row.
    pub fn per_row(&self) -> usize {
        self.per_row
    }

    /// Grid `(row, column)` of a table index, if it is laid out.
    pub fn position(&self, index: usize) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.iter().position(|&i| i == index).map(|c| (r, c))
        })
    }
}

// ============================================================================
// VERTICAL SIZING
// ============================================================================

/// Height of a bordered table with a header and `subject_count` rows.
pub fn table_height(subject_count: usize) -> u16 {
    let rows = u16::try_from(subject_count).unwrap_or(u16::MAX);
    rows.saturating_add(TABLE_CHROME_HEIGHT)
}

/// Height of each grid row: its tallest table.
///
/// `subject_counts[i]` is the number of subjects of table `i`.
pub fn row_heights(grid: &GridLayout, subject_counts: &[usize]) -> Vec<u16> {
    grid.rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|&i| table_height(subject_counts.get(i).copied().unwrap_or(0)))
                .max()
                .unwrap_or(0)
        })
        .collect()
}

/// Line of a table's cursor row, counted from the table's top border.
///
/// Row 0 is the header, directly under the border.
pub fn cursor_line(cursor_row: usize) -> u16 {
    u16::try_from(cursor_row).unwrap_or(u16::MAX).saturating_add(1)
}

/// Vertical scroll offset that keeps grid row `focus_row` and the cursor
/// line visible.
///
/// `cursor_line` is relative to the top of the focused grid row. Scrolls
/// only as far as needed from the top: 0 while the focused row's bottom
/// fits in the viewport, otherwise just enough to show its bottom but
/// never past its top. A table taller than the viewport then scrolls
/// further so the cursor line stays on screen.
pub fn scroll_offset(heights: &[u16], focus_row: usize, cursor_line: u16, viewport: u16) -> u16 {
    let Some(&height) = heights.get(focus_row) else {
        return 0;
    };
    let top: u16 = heights
        .iter()
        .take(focus_row)
        .fold(0u16, |acc, h| acc.saturating_add(*h));
    let bottom = top.saturating_add(height);

    let offset = if bottom <= viewport {
        0
    } else {
        (bottom - viewport).min(top)
    };

    let line = top.saturating_add(cursor_line);
    if line < offset {
        line
    } else if viewport > 0 && line >= offset.saturating_add(viewport) {
        line + 1 - viewport
    } else {
        offset
    }
}

// ============================================================================
// TESTS
// ============================================================================
