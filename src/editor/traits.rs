//! The `Editor` trait: the buffer capability surface.
//!
//! Renderers, input handlers and analysis collaborators program against this
//! trait rather than a concrete document type.

use super::subscription::{ChangeCallback, Region, SubscriptionId};
use crate::buffer::Style;
use crate::error::Result;

/// Operations a text buffer exposes to its collaborators.
///
/// Line and column arguments are 0-based. Every bounds violation is returned
/// as an error and leaves the buffer unchanged.
pub trait Editor {
    /// Insert a line at `index`, shifting later lines down.
    ///
    /// With `style == None` every character gets the buffer's default style.
    /// Text containing `'\n'` inserts one line per segment.
    fn insert_line(&mut self, index: usize, text: &str, style: Option<Style>) -> Result<()>;

    /// Insert `ch` at `column` of `line`. A `'\n'` splits the line.
    fn insert_char(&mut self, line: usize, column: usize, ch: char, style: Style) -> Result<()>;

    /// Remove `line`, shifting later lines up.
    fn delete_line(&mut self, line: usize) -> Result<()>;

    /// Remove the character at `column` of `line`; an emptied line is removed.
    fn delete_char(&mut self, line: usize, column: usize) -> Result<()>;

    /// Replace the whole of `line` with `text` (appends when `line == len()`).
    ///
    /// Text containing `'\n'` replaces the line with one line per segment.
    fn insert_text(&mut self, line: usize, text: &str, style: Style) -> Result<()>;

    /// Restyle `column..column + length` of `line`.
    fn apply_style(&mut self, line: usize, column: usize, length: usize, style: Style) -> Result<()>;

    /// Restyle like [`apply_style`](Self::apply_style) without recording an
    /// undo step.
    ///
    /// Meant for styles computed by analysis rather than chosen by the user,
    /// so a highlighting pass cannot push user edits out of the history or
    /// clear the redo stack. Undo restores versions that may predate the
    /// restyle; analysis is expected to run again on the restored text.
    fn apply_highlight(&mut self, line: usize, column: usize, length: usize, style: Style) -> Result<()> {
        self.apply_style(line, column, length, style)
    }

    /// Copy out the characters and styles of `line`.
    fn get_line(&self, line: usize) -> Result<(Vec<char>, Vec<Style>)>;

    /// Number of lines.
    fn len(&self) -> usize;

    /// Check if the buffer has no lines.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call `callback` after every mutation that touches `region`.
    fn subscribe(&mut self, region: Region, callback: ChangeCallback) -> SubscriptionId;

    /// Remove a subscription. Returns `false` if `id` was not registered.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Restore the version before the last mutation.
    ///
    /// Returns `false` when there is nothing to undo.
    fn undo(&mut self) -> bool;

    /// Re-apply the last undone mutation.
    ///
    /// Returns `false` when there is nothing to redo.
    fn redo(&mut self) -> bool;
}
