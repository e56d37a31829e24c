//! Two-pane preview layout: a sidebar of entries and a content pane that is
//! filled asynchronously for the selected entry.
//!
//! Layout (sidebar | divider | content, with a footer below both):
//!
//! ```text
//! +------------------------+-+---------------------------+
//! | Entry 1 (bold)         | |+-------------------------+|
//! | Entry 2                | || ID  Summary             ||
//! | ...                    | || 1   Fix X               ||
//! +------------------------+-+---------------------------+
//! | footer text, word wrapped                            |
//! +------------------------------------------------------+
//! ```
//!
//! Changing the sidebar selection clears the content pane, paints
//! [`LOADING_TEXT`] and runs the entry's producer off the loop. The result
//! comes back through [`SurfaceHandle::schedule_redraw`]. Every dispatch bumps
//! a generation counter and aborts the previous fetch, so a slow, superseded
//! fetch can never overwrite the content of a newer selection.

use crossterm::event::{Event, EventStream, KeyCode, KeyModifiers};
use futures_util::Stream;
use ratatui::{
    Frame,
    backend::Backend,
    layout::{Constraint, Layout},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tokio::task::AbortHandle;

use std::io;

use crate::content::{Content, Entry, Producer};
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::surface::{Surface, SurfaceHandle, View, init_terminal, restore_terminal};
use crate::text::{pad, split_lines};
use crate::theme::Theme;

pub const SIDEBAR_MAX_WIDTH: u16 = 60;

pub const LOADING_TEXT: &str = "Loading...";
pub const NO_RESULTS_TEXT: &str = "No results to show.";
pub const NO_CONTENTS_TEXT: &str = "No contents defined.";

const FOOTER_HEIGHT: u16 = 2;

/// The pane that receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Sidebar,
    Content,
}

impl Pane {
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Pane::Sidebar => Pane::Content,
            Pane::Content => Pane::Sidebar,
        }
    }
}

#[derive(Debug)]
enum ContentPane {
    Text { lines: Vec<String>, scroll: usize },
    Grid(Grid),
}

/// Builder for a preview session.
#[derive(Debug, Clone, Default)]
pub struct Preview {
    initial_text: String,
    footer_text: String,
    theme: Theme,
}

impl Preview {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text shown in the content pane before anything is selected.
    #[must_use]
    pub fn with_initial_text(mut self, text: impl Into<String>) -> Self {
        self.initial_text = text.into();
        self
    }

    /// Text shown below both panes.
    #[must_use]
    pub fn with_footer_text(mut self, text: impl Into<String>) -> Self {
        self.footer_text = text.into();
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Builds the session state. Fails with [`Error::NoData`] when `entries`
    /// is empty.
    pub fn session(self, entries: Vec<Entry>) -> Result<PreviewState> {
        PreviewState::new(entries, &self.initial_text, self.footer_text, self.theme)
    }

    /// Runs the preview on the real terminal until the user quits.
    pub async fn render(self, entries: Vec<Entry>) -> Result<()> {
        let mut state = self.session(entries)?;

        let mut surface = Surface::new(init_terminal()?);
        let result = surface.paint(&mut state, EventStream::new()).await;
        let restored = restore_terminal(surface.terminal_mut());

        result.and(restored)
    }

    /// Runs the preview on `surface`, reading input from `events`. Returns the
    /// final session state once the loop ends.
    pub async fn render_on<B, E>(
        self,
        surface: &mut Surface<B, PreviewState>,
        entries: Vec<Entry>,
        events: E,
    ) -> Result<PreviewState>
    where
        B: Backend,
        E: Stream<Item = io::Result<Event>> + Unpin,
    {
        let mut state = self.session(entries)?;
        surface.paint(&mut state, events).await?;
        Ok(state)
    }
}

/// State of one preview session. Lives on the render loop.
pub struct PreviewState {
    entries: Vec<Entry>,
    sidebar: Grid,
    content: ContentPane,
    footer: String,
    theme: Theme,
    focus: Pane,
    loading: bool,
    generation: u64,
    in_flight: Option<AbortHandle>,
    content_height: usize,
    /// Rows the text content wrapped to on the last draw, 0 before any draw.
    content_rows: usize,
}

impl PreviewState {
    fn new(entries: Vec<Entry>, initial_text: &str, footer: String, theme: Theme) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::NoData);
        }

        let mut sidebar = Grid::new()
            .with_max_cell_width(usize::from(SIDEBAR_MAX_WIDTH))
            .with_emphasized_first_row();
        sidebar.append_rows(entries.iter().map(|e| vec![e.label.clone()]));

        Ok(Self {
            entries,
            sidebar,
            content: ContentPane::Text {
                lines: split_lines(initial_text),
                scroll: 0,
            },
            footer,
            theme,
            focus: Pane::Sidebar,
            loading: false,
            generation: 0,
            in_flight: None,
            content_height: 0,
            content_rows: 0,
        })
    }

    #[must_use]
    pub fn focus(&self) -> Pane {
        self.focus
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.sidebar.selected().unwrap_or(0)
    }

    /// True between dispatching a fetch and painting its result.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn sidebar(&self) -> &Grid {
        &self.sidebar
    }

    /// The table in the content pane, if it currently shows one.
    #[must_use]
    pub fn content_grid(&self) -> Option<&Grid> {
        match &self.content {
            ContentPane::Grid(grid) => Some(grid),
            ContentPane::Text { .. } => None,
        }
    }

    /// The text lines in the content pane, if it currently shows text.
    #[must_use]
    pub fn content_text(&self) -> Option<&[String]> {
        match &self.content {
            ContentPane::Text { lines, .. } => Some(lines),
            ContentPane::Grid(_) => None,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    /// Selects sidebar `row` (clamped) and loads its contents.
    pub fn select(&mut self, row: usize, surface: &SurfaceHandle<Self>) {
        self.sidebar.select(row);
        self.dispatch(surface);
    }

    fn show_text(&mut self, text: &str) {
        self.content = ContentPane::Text {
            lines: split_lines(text),
            scroll: 0,
        };
        self.content_rows = 0;
    }

    fn show_content(&mut self, content: Content) {
        match content {
            Content::Text(text) => self.show_text(&text),
            Content::Table(rows) if rows.len() < 2 => self.show_text(NO_RESULTS_TEXT),
            Content::Table(mut rows) => {
                let body = rows.split_off(1);
                let mut grid = Grid::new();
                grid.set_header(rows.swap_remove(0));
                grid.append_rows(body);
                self.content = ContentPane::Grid(grid);
            }
        }
    }

    /// Paints the loading placeholder, then fetches the selected entry's
    /// contents off the loop.
    fn dispatch(&mut self, surface: &SurfaceHandle<Self>) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }

        self.generation += 1;
        self.loading = true;
        self.show_text(LOADING_TEXT);

        let generation = self.generation;
        let entry = &self.entries[self.selected()];
        let key = entry.key.clone();
        let produce = entry.produce.clone();
        let surface = surface.clone();

        tracing::debug!("Loading contents: key={}, generation={}", key, generation);

        let task = tokio::spawn(async move {
            let content = fetch(key, produce).await;
            surface.schedule_redraw(move |preview: &mut PreviewState| {
                preview.complete(generation, content);
            });
        });
        self.in_flight = Some(task.abort_handle());
    }

    /// Paints a fetch result unless a newer selection superseded it.
    pub(crate) fn complete(&mut self, generation: u64, content: Content) {
        if generation != self.generation {
            tracing::debug!(
                "Discarding stale contents: generation={}, current={}",
                generation,
                self.generation
            );
            return;
        }

        self.loading = false;
        self.in_flight = None;
        self.show_content(content);
    }

    fn navigate_sidebar(&mut self, code: KeyCode, surface: &SurfaceHandle<Self>) {
        let changed = match code {
            KeyCode::Up | KeyCode::Char('k') => self.sidebar.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.sidebar.select_next(),
            KeyCode::Home | KeyCode::Char('g') => self.sidebar.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.sidebar.select_last(),
            KeyCode::PageUp => self.sidebar.page_up(),
            KeyCode::PageDown => self.sidebar.page_down(),
            KeyCode::Enter => true,
            _ => false,
        };

        if changed {
            self.dispatch(surface);
        }
    }

    fn navigate_content(&mut self, code: KeyCode) {
        let page = self.content_height.max(1);
        let wrapped_rows = self.content_rows;
        match &mut self.content {
            ContentPane::Grid(grid) => {
                match code {
                    KeyCode::Up | KeyCode::Char('k') => grid.select_previous(),
                    KeyCode::Down | KeyCode::Char('j') => grid.select_next(),
                    KeyCode::Home | KeyCode::Char('g') => grid.select_first(),
                    KeyCode::End | KeyCode::Char('G') => grid.select_last(),
                    KeyCode::PageUp => grid.page_up(),
                    KeyCode::PageDown => grid.page_down(),
                    _ => false,
                };
            }
            ContentPane::Text { lines, scroll } => {
                // Scrolling is applied after wrapping, so clamp against the
                // wrapped height once it is known.
                let max = wrapped_rows.max(lines.len()).saturating_sub(1);
                *scroll = match code {
                    KeyCode::Up | KeyCode::Char('k') => scroll.saturating_sub(1),
                    KeyCode::Down | KeyCode::Char('j') => (*scroll + 1).min(max),
                    KeyCode::Home | KeyCode::Char('g') => 0,
                    KeyCode::End | KeyCode::Char('G') => max,
                    KeyCode::PageUp => scroll.saturating_sub(page),
                    KeyCode::PageDown => (*scroll + page).min(max),
                    _ => *scroll,
                };
            }
        }
    }
}

/// Runs `produce` on the blocking pool and turns every outcome into content.
async fn fetch(key: String, produce: Option<Producer>) -> Content {
    let Some(produce) = produce else {
        return Content::text(NO_CONTENTS_TEXT);
    };

    let task_key = key.clone();
    match tokio::task::spawn_blocking(move || produce(&task_key)).await {
        Ok(Ok(content)) => content,
        Ok(Err(e)) => {
            tracing::warn!("Producer failed for {}: {:#}", key, e);
            Content::text(format!("Error: {e:#}"))
        }
        Err(e) => {
            tracing::error!("Producer task for {} did not finish: {}", key, e);
            Content::text(format!("Failed to load contents: {e}"))
        }
    }
}

impl View for PreviewState {
    fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        f.render_widget(Block::default().style(self.theme.base()), area);

        let [main, footer] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)]).areas(area);
        let [sidebar_area, _divider, content_area] = Layout::horizontal([
            Constraint::Length(SIDEBAR_MAX_WIDTH),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(main);

        self.sidebar
            .render(f, sidebar_area, self.focus == Pane::Sidebar, &self.theme);

        let content_focused = self.focus == Pane::Content;
        let block = Block::default()
            .borders(Borders::ALL)
            .style(self.theme.base())
            .border_style(self.theme.border(content_focused));
        let inner = block.inner(content_area);
        f.render_widget(block, content_area);
        self.content_height = usize::from(inner.height);

        match &mut self.content {
            ContentPane::Grid(grid) => grid.render(f, inner, content_focused, &self.theme),
            ContentPane::Text { lines, scroll } => {
                let text: Vec<_> = lines.iter().map(|line| pad(line, 1)).collect();
                let para = Paragraph::new(text.join("\n"))
                    .style(self.theme.base())
                    .wrap(Wrap { trim: false });

                self.content_rows = para.line_count(inner.width);
                *scroll = (*scroll).min(self.content_rows.saturating_sub(1));
                let offset = u16::try_from(*scroll).unwrap_or(u16::MAX);
                f.render_widget(para.scroll((offset, 0)), inner);
            }
        }

        let footer_text = Paragraph::new(self.footer.as_str())
            .style(self.theme.muted())
            .wrap(Wrap { trim: true });
        f.render_widget(footer_text, footer);
    }

    fn handle_event(&mut self, event: Event, surface: &SurfaceHandle<Self>) {
        let Event::Key(key) = event else {
            return;
        };

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => surface.stop(),
            KeyCode::Char('q') | KeyCode::Esc => surface.stop(),
            KeyCode::Char('w') => self.toggle_focus(),
            code => match self.focus {
                Pane::Sidebar => self.navigate_sidebar(code, surface),
                Pane::Content => self.navigate_content(code),
            },
        }
    }
}

impl Drop for PreviewState {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}
