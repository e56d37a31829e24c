//! Terminal preview engine for the jira CLI.
//!
//! This crate provides the two-pane master-detail layout used to browse
//! issue lists: a sidebar of entries drives content that is fetched on demand
//! and rendered either as free text or as a table.
//!
//! The pieces compose bottom-up:
//!
//! - [`Surface`] owns the terminal and the event loop. Background tasks talk
//!   to it only through a [`SurfaceHandle`].
//! - [`Grid`] renders a header row plus data rows with selection.
//! - [`Preview`] wires the sidebar, the content pane and the async fetch
//!   protocol together.

mod colors;
mod content;
mod error;
mod grid;
mod preview;
mod surface;
mod text;
mod theme;

#[cfg(test)]
mod test_support;

pub use content::{Content, Entry, Producer};
pub use error::{Error, Result};
pub use grid::Grid;
pub use preview::{
    LOADING_TEXT, NO_CONTENTS_TEXT, NO_RESULTS_TEXT, Pane, Preview, PreviewState,
    SIDEBAR_MAX_WIDTH,
};
pub use surface::{Surface, SurfaceHandle, View, init_terminal, restore_terminal};
pub use theme::{Theme, ThemeConfig, parse_hex_color};
