//! Helpers shared by the unit tests.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use futures_util::Stream;
use ratatui::buffer::Buffer;
use tokio::sync::mpsc;

use std::io;
use std::pin::Pin;

pub type EventStream = Pin<Box<dyn Stream<Item = io::Result<Event>> + Send>>;

pub fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn char_key(c: char) -> Event {
    key(KeyCode::Char(c))
}

/// An event stream fed by the returned sender. It stays open until the
/// sender is dropped.
pub fn event_channel() -> (mpsc::UnboundedSender<io::Result<Event>>, EventStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (event, rx))
    });
    (tx, Box::pin(stream))
}

/// Rows of the buffer as plain strings.
pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect()
        })
        .collect()
}
