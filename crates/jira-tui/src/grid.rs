//! Tabular widget: an optional header row plus selectable data rows.
//!
//! Layout operations (`set_header`, `append_rows`, `clear`) only touch the
//! in-memory model; nothing is drawn until [`Grid::render`] runs on the loop.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    widgets::{Cell, Row, Table, TableState},
};

use crate::text::{display_width, pad, truncate};
use crate::theme::Theme;

/// Left padding applied to every cell.
const CELL_PADDING: usize = 1;

#[derive(Debug, Default)]
pub struct Grid {
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
    state: TableState,
    max_cell_width: Option<usize>,
    emphasize_first: bool,
    page_size: usize,
}

impl Grid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps every rendered cell at `width` columns, truncating overflow.
    #[must_use]
    pub fn with_max_cell_width(mut self, width: usize) -> Self {
        self.max_cell_width = Some(width);
        self
    }

    /// Renders the first body row in bold.
    #[must_use]
    pub fn with_emphasized_first_row(mut self) -> Self {
        self.emphasize_first = true;
        self
    }

    pub fn set_header(&mut self, row: Vec<String>) {
        self.header = Some(row);
    }

    /// Appends body rows. The first appended row becomes selected when the
    /// grid had no selection yet.
    pub fn append_rows(&mut self, rows: impl IntoIterator<Item = Vec<String>>) {
        self.rows.extend(rows);
        if self.state.selected().is_none() && !self.rows.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn clear(&mut self) {
        self.header = None;
        self.rows.clear();
        self.state = TableState::default();
    }

    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Selects `row`, clamped to the last row. Returns true when the
    /// selection changed.
    pub fn select(&mut self, row: usize) -> bool {
        if self.rows.is_empty() {
            return false;
        }
        let row = row.min(self.rows.len() - 1);
        let changed = self.state.selected() != Some(row);
        self.state.select(Some(row));
        changed
    }

    pub fn select_next(&mut self) -> bool {
        let next = self.state.selected().map_or(0, |i| i.saturating_add(1));
        self.select(next)
    }

    pub fn select_previous(&mut self) -> bool {
        let prev = self.state.selected().map_or(0, |i| i.saturating_sub(1));
        self.select(prev)
    }

    pub fn select_first(&mut self) -> bool {
        self.select(0)
    }

    pub fn select_last(&mut self) -> bool {
        self.select(usize::MAX)
    }

    pub fn page_down(&mut self) -> bool {
        let step = self.page_size.max(1);
        let next = self.state.selected().map_or(0, |i| i.saturating_add(step));
        self.select(next)
    }

    pub fn page_up(&mut self) -> bool {
        let step = self.page_size.max(1);
        let prev = self.state.selected().map_or(0, |i| i.saturating_sub(step));
        self.select(prev)
    }

    fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(self.header.as_ref().map(Vec::len))
            .max()
            .unwrap_or(0)
    }

    /// Formats one cell for display: truncated to the width cap, then padded.
    fn cell_text(&self, value: &str) -> String {
        match self.max_cell_width {
            Some(max) => pad(&truncate(value, max.saturating_sub(CELL_PADDING)), CELL_PADDING),
            None => pad(value, CELL_PADDING),
        }
    }

    /// Display width of every column, sized to its widest cell.
    #[must_use]
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths = vec![0; self.column_count()];
        let all_rows = self.header.iter().chain(self.rows.iter());
        for row in all_rows {
            for (i, value) in row.iter().enumerate() {
                widths[i] = widths[i].max(display_width(&self.cell_text(value)));
            }
        }
        widths
    }

    fn build_row(&self, row: &[String], columns: usize) -> Vec<Cell<'static>> {
        (0..columns)
            .map(|i| {
                let value = row.get(i).map_or("", String::as_str);
                Cell::from(self.cell_text(value))
            })
            .collect()
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        let columns = self.column_count();
        let widths: Vec<Constraint> = self
            .column_widths()
            .into_iter()
            .map(|w| Constraint::Length(u16::try_from(w).unwrap_or(u16::MAX)))
            .collect();

        let body: Vec<Row> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let style = if i == 0 && self.emphasize_first {
                    theme.header()
                } else {
                    theme.base()
                };
                Row::new(self.build_row(row, columns)).style(style)
            })
            .collect();

        let mut table = Table::new(body, widths)
            .style(theme.base())
            .row_highlight_style(theme.selection(focused))
            .column_spacing(1);

        let mut visible = usize::from(area.height);
        if let Some(header) = &self.header {
            table = table.header(Row::new(self.build_row(header, columns)).style(theme.header()));
            visible = visible.saturating_sub(1);
        }
        self.page_size = visible;

        f.render_stateful_widget(table, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_lines;
    use ratatui::{Terminal, backend::TestBackend};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn sample_grid() -> Grid {
        let mut grid = Grid::new();
        grid.set_header(strings(&["ID", "Summary"]));
        grid.append_rows(vec![
            strings(&["1", "Fix X"]),
            strings(&["2", "Crash on start"]),
            strings(&["3", "Typo"]),
        ]);
        grid
    }

    #[test]
    fn test_append_rows_selects_first() {
        let grid = sample_grid();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.selected(), Some(0));
        assert_eq!(grid.header(), Some(strings(&["ID", "Summary"]).as_slice()));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut grid = sample_grid();
        grid.clear();
        assert!(grid.is_empty());
        assert!(grid.header().is_none());
        assert_eq!(grid.selected(), None);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut grid = sample_grid();
        assert!(!grid.select_previous());
        assert!(grid.select_next());
        assert!(grid.select_next());
        assert!(!grid.select_next());
        assert_eq!(grid.selected(), Some(2));
        assert!(grid.select_first());
        assert!(grid.select_last());
        assert_eq!(grid.selected(), Some(2));
    }

    #[test]
    fn test_select_on_empty_grid() {
        let mut grid = Grid::new();
        assert!(!grid.select_next());
        assert!(!grid.select(3));
        assert_eq!(grid.selected(), None);
    }

    #[test]
    fn test_column_widths_include_padding() {
        let grid = sample_grid();
        assert_eq!(grid.column_widths(), vec![3, 15]);
    }

    #[test]
    fn test_max_cell_width_truncates() {
        let mut grid = Grid::new().with_max_cell_width(8);
        grid.append_rows(vec![strings(&["a very long label"])]);
        assert_eq!(grid.column_widths(), vec![8]);
        assert_eq!(grid.cell_text("a very long label"), " a very…");
    }

    #[test]
    fn test_ragged_rows_are_padded_with_empty_cells() {
        let mut grid = Grid::new();
        grid.set_header(strings(&["A", "B", "C"]));
        grid.append_rows(vec![strings(&["1"])]);
        assert_eq!(grid.column_widths().len(), 3);
        assert_eq!(grid.build_row(&grid.rows()[0].clone(), 3).len(), 3);
    }

    #[test]
    fn test_render_draws_header_and_rows() {
        let mut terminal = Terminal::new(TestBackend::new(30, 6)).unwrap();
        let mut grid = sample_grid();
        let theme = Theme::default();
        terminal
            .draw(|f| grid.render(f, f.area(), true, &theme))
            .unwrap();

        let lines = buffer_lines(terminal.backend().buffer());
        assert!(lines[0].contains("ID"));
        assert!(lines[0].contains("Summary"));
        assert!(lines[1].contains("Fix X"));
        assert!(lines[3].contains("Typo"));
        assert_eq!(grid.page_size, 5);
    }
}
