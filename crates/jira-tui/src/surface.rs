//! Render surface: the single loop that owns the terminal and the view.
//!
//! Widgets are only ever mutated on the loop. Background tasks get a
//! [`SurfaceHandle`] and hand closures to [`SurfaceHandle::schedule_redraw`];
//! the loop applies them in order before drawing the next frame.

use crossterm::{
    event::{Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{Stream, StreamExt};
use ratatui::{Frame, Terminal, backend::Backend, backend::CrosstermBackend};
use tokio::sync::mpsc;

use std::io::{self, Stdout};
use std::ops::ControlFlow;

use crate::error::{Error, Result};

/// Root of everything drawn on a [`Surface`].
pub trait View: Sized {
    fn draw(&mut self, frame: &mut Frame);

    /// Called on the loop for every key press.
    fn handle_event(&mut self, event: Event, surface: &SurfaceHandle<Self>);
}

type Update<V> = Box<dyn FnOnce(&mut V) + Send>;

pub(crate) enum Command<V> {
    Redraw(Update<V>),
    Stop,
}

impl<V> Command<V> {
    /// Applies the command to `view`. Breaks when the loop should end.
    pub(crate) fn apply(self, view: &mut V) -> ControlFlow<()> {
        match self {
            Self::Redraw(update) => {
                update(view);
                ControlFlow::Continue(())
            }
            Self::Stop => ControlFlow::Break(()),
        }
    }
}

/// Thread-safe control surface of a running loop. Cheap to clone.
pub struct SurfaceHandle<V> {
    tx: mpsc::UnboundedSender<Command<V>>,
}

impl<V> Clone for SurfaceHandle<V> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<V> SurfaceHandle<V> {
    /// Queues `update` to run on the loop before the next frame is drawn.
    pub fn schedule_redraw<F>(&self, update: F)
    where
        F: FnOnce(&mut V) + Send + 'static,
    {
        if self.tx.send(Command::Redraw(Box::new(update))).is_err() {
            tracing::debug!("Render loop already stopped, dropping redraw");
        }
    }

    /// Ends the loop after the current frame. Safe to call repeatedly and
    /// after the loop is gone.
    pub fn stop(&self) {
        if self.tx.send(Command::Stop).is_err() {
            tracing::debug!("Render loop already stopped, ignoring stop");
        }
    }
}

pub struct Surface<B: Backend, V> {
    terminal: Terminal<B>,
    tx: mpsc::UnboundedSender<Command<V>>,
    rx: mpsc::UnboundedReceiver<Command<V>>,
}

impl<B: Backend, V: View> Surface<B, V> {
    pub fn new(terminal: Terminal<B>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { terminal, tx, rx }
    }

    #[must_use]
    pub fn handle(&self) -> SurfaceHandle<V> {
        SurfaceHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Runs the loop until [`SurfaceHandle::stop`] is called or `events`
    /// ends. Draw failures and event read errors end the loop with an error.
    pub async fn paint<E>(&mut self, view: &mut V, mut events: E) -> Result<()>
    where
        E: Stream<Item = io::Result<Event>> + Unpin,
    {
        let handle = self.handle();
        let mut needs_render = true;

        loop {
            if needs_render {
                self.terminal
                    .draw(|f| view.draw(f))
                    .map_err(|e| Error::Terminal(e.to_string()))?;
                needs_render = false;
            }

            // Queued redraws and stop requests win over new input.
            tokio::select! {
                biased;

                Some(command) = self.rx.recv() => {
                    if self.drain(command, view).is_break() {
                        tracing::debug!("Render loop stopped");
                        break;
                    }
                    needs_render = true;
                }

                event = events.next() => {
                    match event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            tracing::debug!("KEY EVENT: code={:?}, modifiers={:?}", key.code, key.modifiers);
                            view.handle_event(Event::Key(key), &handle);
                            needs_render = true;
                        }
                        Some(Ok(Event::Resize(..))) => needs_render = true,
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::error!("Event stream error: {}", e);
                            return Err(e.into());
                        }
                        None => {
                            tracing::debug!("Event stream closed");
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Applies `first` and every command already queued behind it.
    fn drain(&mut self, first: Command<V>, view: &mut V) -> ControlFlow<()> {
        first.apply(view)?;
        while let Ok(command) = self.rx.try_recv() {
            command.apply(view)?;
        }
        ControlFlow::Continue(())
    }
}

/// Puts stdout into raw mode on the alternate screen.
pub fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    undo_on_error(enter_alternate_screen(), disable_raw_mode)
}

fn enter_alternate_screen() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Runs `undo` when `result` failed. The original error is kept.
fn undo_on_error<T>(result: io::Result<T>, undo: impl FnOnce() -> io::Result<()>) -> Result<T> {
    result.map_err(|e| {
        if let Err(undo_err) = undo() {
            tracing::warn!("Failed to restore terminal: {}", undo_err);
        }
        e.into()
    })
}

/// Undoes [`init_terminal`].
pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// A handle with no loop behind it, plus the receiving end of its queue.
#[cfg(test)]
pub(crate) fn detached<V>() -> (SurfaceHandle<V>, mpsc::UnboundedReceiver<Command<V>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SurfaceHandle { tx }, rx)
}
