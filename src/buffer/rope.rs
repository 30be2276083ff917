//! Line Rope: the document tree.
//!
//! This module provides a persistent, AVL-balanced rope of lines optimized for:
//! - O(log n) line lookup, insertion and deletion by index
//! - O(line length) character edits, independent of document size
//! - Cheap snapshots: every edit returns a new rope sharing unchanged
//!   subtrees (and unchanged lines) with the previous one
//!
//! Each tree node holds one [`Line`]; its subtree weight is its line count,
//! so walking the tree by cumulative left-subtree count finds a line index.

use super::line::{Line, DEFAULT_INLINE_LIMIT};
use super::style::Style;
use super::tree::{Tree, Weighted};
use crate::error::{BufferError, Result};
use std::sync::Arc;

/// The line separator. Inserting it splits a line in two.
pub const LINE_SEPARATOR: char = '\n';

impl Weighted for Arc<Line> {
    #[inline]
    fn weight(&self) -> usize {
        1
    }
}

/// A persistent rope of styled lines.
///
/// Every mutating method takes `&self` and returns a new rope. The old rope
/// stays valid and can be read concurrently from other threads, kept in an
/// undo history, or dropped.
///
/// # Example
///
/// ```
/// use styled_rope::{LineRope, Style};
///
/// let rope = LineRope::new()
///     .insert_line(0, "foo", Style::default())?
///     .insert_line(1, "bar", Style::default())?;
/// let edited = rope.insert_char(0, 3, '\n', Style::default())?;
///
/// assert_eq!(rope.len(), 2);
/// assert_eq!(edited.len(), 3);
/// # Ok::<(), styled_rope::BufferError>(())
/// ```
#[derive(Clone)]
pub struct LineRope {
    tree: Tree<Arc<Line>>,
    /// Lines longer than this store their styles as spans.
    inline_limit: usize,
}

impl Default for LineRope {
    fn default() -> Self {
        Self::new()
    }
}

impl LineRope {
    /// Create an empty rope.
    pub const fn new() -> Self {
        Self::with_inline_limit(DEFAULT_INLINE_LIMIT)
    }

    /// Create an empty rope with a custom inline style limit.
    ///
    /// Lines of at most `inline_limit` characters keep one style per
    /// character; longer lines use a style span tree.
    pub const fn with_inline_limit(inline_limit: usize) -> Self {
        Self {
            tree: Tree::new(),
            inline_limit,
        }
    }

    /// Build a rope from lines in order.
    pub fn from_lines(lines: impl IntoIterator<Item = Line>, inline_limit: usize) -> Self {
        let lines: Vec<Arc<Line>> = lines.into_iter().map(Arc::new).collect();
        Self {
            tree: Tree::from_items(&lines),
            inline_limit,
        }
    }

    /// Get the total number of lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.total()
    }

    /// Check if the rope has no lines.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The inline style limit used for lines built by this rope.
    #[inline]
    pub const fn inline_limit(&self) -> usize {
        self.inline_limit
    }

    /// Height of the underlying tree.
    pub fn height(&self) -> u32 {
        self.tree.height()
    }

    /// Verify the AVL invariant and cached line counts at every node.
    pub fn is_balanced(&self) -> bool {
        self.tree.is_balanced()
    }

    /// Borrow the line at `index`.
    pub fn line(&self, index: usize) -> Result<&Arc<Line>> {
        self.tree
            .find(index)
            .map(|(line, _)| line)
            .ok_or(BufferError::InvalidIndex {
                index,
                len: self.len(),
            })
    }

    /// Copy out the characters and styles of the line at `index`.
    pub fn get_line(&self, index: usize) -> Result<(Vec<char>, Vec<Style>)> {
        Ok(self.line(index)?.to_parts())
    }

    /// Style of one character.
    pub fn style_at(&self, index: usize, column: usize) -> Result<Style> {
        self.line(index)?.style_at(column)
    }

    /// Insert a new line at `index`, shifting later lines down.
    ///
    /// Every character gets `style`. `index` may equal `len()` to append.
    /// Text containing [`LINE_SEPARATOR`] inserts one line per segment, so a
    /// line never holds a separator.
    pub fn insert_line(&self, index: usize, text: &str, style: Style) -> Result<Self> {
        BufferError::check_position(index, self.len())?;
        let mut tree = self.tree.clone();
        for (offset, segment) in text.split(LINE_SEPARATOR).enumerate() {
            let line = Line::new(segment, style, self.inline_limit);
            tree = tree.insert(index + offset, Arc::new(line));
        }
        Ok(self.with_tree(tree))
    }

    /// Insert a prebuilt line at `index`.
    pub fn insert_styled_line(&self, index: usize, line: Line) -> Result<Self> {
        BufferError::check_position(index, self.len())?;
        Ok(self.with_tree(self.tree.insert(index, Arc::new(line))))
    }

    /// Remove the line at `index`, shifting later lines up.
    pub fn delete_line(&self, index: usize) -> Result<Self> {
        self.remove_line(index).map(|(rope, _)| rope)
    }

    /// Remove the line at `index`, returning the new rope and the line.
    pub fn remove_line(&self, index: usize) -> Result<(Self, Arc<Line>)> {
        BufferError::check_index(index, self.len())?;
        self.tree
            .remove(index)
            .map(|(tree, line)| (self.with_tree(tree), line))
            .ok_or(BufferError::InvalidIndex {
                index,
                len: self.len(),
            })
    }

    /// Insert `ch` at `column` of line `index`.
    ///
    /// Inserting [`LINE_SEPARATOR`] splits the line: characters before
    /// `column` stay at `index`, the rest move to a new line at `index + 1`.
    pub fn insert_char(&self, index: usize, column: usize, ch: char, style: Style) -> Result<Self> {
        let line = self.line(index)?;
        if ch == LINE_SEPARATOR {
            let (head, tail) = line.split_at(column, self.inline_limit)?;
            let tree = self.tree.replace(index, |_, _| Arc::new(head));
            return Ok(self.with_tree(tree.insert(index + 1, Arc::new(tail))));
        }
        let edited = line.insert_char(column, ch, style, self.inline_limit)?;
        Ok(self.with_line(index, edited))
    }

    /// Delete the character at `column` of line `index`.
    ///
    /// A line left empty by the deletion is removed entirely.
    pub fn delete_char(&self, index: usize, column: usize) -> Result<Self> {
        self.remove_char(index, column).map(|removed| removed.rope)
    }

    /// Delete one character and report what was removed.
    pub fn remove_char(&self, index: usize, column: usize) -> Result<RemovedChar> {
        let (edited, ch, style) = self.line(index)?.remove_char(column)?;
        if edited.is_empty() {
            let rope = self.delete_line(index)?;
            return Ok(RemovedChar {
                rope,
                ch,
                style,
                line_removed: true,
            });
        }
        Ok(RemovedChar {
            rope: self.with_line(index, edited),
            ch,
            style,
            line_removed: false,
        })
    }

    /// Restyle `column..column + length` of line `index`.
    pub fn apply_style(&self, index: usize, column: usize, length: usize, style: Style) -> Result<Self> {
        let edited = self.line(index)?.apply_style(column, length, style)?;
        Ok(self.with_line(index, edited))
    }

    /// Iterate over all lines in order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Line>> + '_ {
        self.tree.iter()
    }

    /// Iterate over up to `count` lines starting at `start`, with indices.
    ///
    /// This is the renderer's per-frame view of the document.
    pub fn visible_lines(&self, start: usize, count: usize) -> impl Iterator<Item = (usize, &Arc<Line>)> + '_ {
        (start..).zip(self.tree.iter_from(start)).take(count)
    }

    /// The document text, lines joined with [`LINE_SEPARATOR`].
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (i, line) in self.iter().enumerate() {
            if i > 0 {
                text.push(LINE_SEPARATOR);
            }
            text.extend(line.chars());
        }
        text
    }

    fn with_tree(&self, tree: Tree<Arc<Line>>) -> Self {
        Self {
            tree,
            inline_limit: self.inline_limit,
        }
    }

    fn with_line(&self, index: usize, line: Line) -> Self {
        self.with_tree(self.tree.replace(index, |_, _| Arc::new(line)))
    }
}

/// Outcome of [`LineRope::remove_char`].
#[derive(Clone, Debug)]
pub struct RemovedChar {
    /// The rope after the deletion.
    pub rope: LineRope,
    /// The deleted character.
    pub ch: char,
    /// The deleted character's style.
    pub style: Style,
    /// Whether the line became empty and was removed.
    pub line_removed: bool,
}

impl FromIterator<Line> for LineRope {
    fn from_iter<I: IntoIterator<Item = Line>>(iter: I) -> Self {
        Self::from_lines(iter, DEFAULT_INLINE_LIMIT)
    }
}

impl std::fmt::Debug for LineRope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineRope")
            .field("lines", &self.len())
            .field("height", &self.height())
            .field("inline_limit", &self.inline_limit)
            .finish_non_exhaustive()
    }
}
