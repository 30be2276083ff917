//! Highlight channel: style edits from an analysis thread.
//!
//! Language analysis runs off the editing thread and reports its results
//! late. The analysis side holds a [`HighlightSender`] and works from a
//! snapshot; the event loop owns the [`HighlightReceiver`] and drains it into
//! the document between input events.
//!
//! ```text
//!   analysis thread                         event loop
//!  ┌───────────────┐   StyleEdit   ┌────────────────────────┐
//!  │ snapshot text │ ────────────▶ │ drain_into(&mut doc)   │
//!  └───────────────┘   (bounded)   └────────────────────────┘
//! ```
//!
//! Edits computed against an older snapshot may no longer fit the document.
//! Those are skipped and counted, never applied partially.

use super::traits::Editor;
use crate::buffer::Style;
use crate::error::{BufferError, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use tracing::debug;

/// Restyle `column..column + length` of `line`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StyleEdit {
    /// Target line.
    pub line: usize,
    /// First column.
    pub column: usize,
    /// Number of columns.
    pub length: usize,
    /// Style to apply.
    pub style: Style,
}

impl StyleEdit {
    /// Create a new style edit.
    pub const fn new(line: usize, column: usize, length: usize, style: Style) -> Self {
        Self {
            line,
            column,
            length,
            style,
        }
    }
}

/// Outcome of draining pending edits.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DrainReport {
    /// Edits applied to the document.
    pub applied: usize,
    /// Edits that no longer fit the document and were skipped.
    pub rejected: usize,
}

/// Create a bounded highlight channel.
pub fn highlight_channel(capacity: usize) -> (HighlightSender, HighlightReceiver) {
    let (tx, rx) = bounded(capacity);
    (HighlightSender { tx }, HighlightReceiver { rx })
}

/// The analysis side of a highlight channel.
#[derive(Clone, Debug)]
pub struct HighlightSender {
    tx: Sender<StyleEdit>,
}

impl HighlightSender {
    /// Queue an edit, blocking while the channel is full.
    pub fn send(&self, edit: StyleEdit) -> Result<()> {
        self.tx.send(edit).map_err(|_| BufferError::Disconnected)
    }
}

/// The event-loop side of a highlight channel.
#[derive(Debug)]
pub struct HighlightReceiver {
    rx: Receiver<StyleEdit>,
}

impl HighlightReceiver {
    /// Number of edits waiting.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Apply every pending edit to `editor` without blocking.
    pub fn drain_into<E: Editor + ?Sized>(&self, editor: &mut E) -> DrainReport {
        let mut report = DrainReport::default();
        loop {
            match self.rx.try_recv() {
                Ok(edit) => match editor.apply_highlight(edit.line, edit.column, edit.length, edit.style) {
                    Ok(()) => report.applied += 1,
                    Err(err) => {
                        debug!(line = edit.line, column = edit.column, %err, "skipping stale highlight edit");
                        report.rejected += 1;
                    }
                },
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        report
    }
}
