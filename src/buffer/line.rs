//! Line: One line's characters and the styles covering them.
//!
//! Short lines keep one [`Style`] per character inline; that is simple and
//! fast to splice. Once a line grows past the inline limit its styles move
//! into a [`StyleSpanTree`], which stays compact under broad re-styling.
//! Both forms answer the same queries, so callers never see the difference.

use super::spans::StyleSpanTree;
use super::style::Style;
use crate::error::{BufferError, Result};
use unicode_width::UnicodeWidthChar;

/// Default maximum line length that keeps per-character inline styles.
pub const DEFAULT_INLINE_LIMIT: usize = 64;

#[derive(Clone)]
enum LineStyles {
    /// One style per character.
    Inline(Vec<Style>),
    /// Run-length spans over the line's columns.
    Spans(StyleSpanTree),
}

impl LineStyles {
    /// Pick the representation for a line of `len` characters.
    fn settle(self, len: usize, inline_limit: usize) -> Self {
        match self {
            Self::Inline(styles) if len > inline_limit => {
                Self::Spans(StyleSpanTree::from_styles(&styles))
            }
            Self::Spans(spans) if len <= inline_limit => Self::Inline(spans.to_styles()),
            other => other,
        }
    }
}

/// An immutable line of styled characters.
///
/// Editing methods return a new line; the line rope stores lines behind
/// `Arc` so that unchanged lines are shared between document versions.
#[derive(Clone)]
pub struct Line {
    chars: Vec<char>,
    styles: LineStyles,
}

impl Line {
    /// Create a line where every character has `style`.
    pub fn new(text: &str, style: Style, inline_limit: usize) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let styles = if chars.len() > inline_limit {
            LineStyles::Spans(StyleSpanTree::uniform(chars.len(), style))
        } else {
            LineStyles::Inline(vec![style; chars.len()])
        };
        Self { chars, styles }
    }

    /// Create a line from `(char, style)` pairs.
    pub fn from_styled(cells: impl IntoIterator<Item = (char, Style)>, inline_limit: usize) -> Self {
        let (chars, styles): (Vec<char>, Vec<Style>) = cells.into_iter().unzip();
        let len = chars.len();
        Self {
            chars,
            styles: LineStyles::Inline(styles).settle(len, inline_limit),
        }
    }

    /// Create an empty line.
    pub const fn empty() -> Self {
        Self {
            chars: Vec::new(),
            styles: LineStyles::Inline(Vec::new()),
        }
    }

    /// Number of characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Check if the line has no characters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The line's characters.
    #[inline]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// The line's text as a `String`.
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Terminal columns needed to display the line.
    pub fn display_width(&self) -> usize {
        self.chars.iter().map(|&c| c.width().unwrap_or(0)).sum()
    }

    /// Whether styles are stored per character rather than as spans.
    pub const fn is_inline(&self) -> bool {
        matches!(self.styles, LineStyles::Inline(_))
    }

    /// Style of the character at `column`.
    pub fn style_at(&self, column: usize) -> Result<Style> {
        BufferError::check_index(column, self.len())?;
        match &self.styles {
            LineStyles::Inline(styles) => Ok(styles[column]),
            LineStyles::Spans(spans) => spans.style_at(column),
        }
    }

    /// One style per character.
    pub fn styles(&self) -> Vec<Style> {
        match &self.styles {
            LineStyles::Inline(styles) => styles.clone(),
            LineStyles::Spans(spans) => spans.to_styles(),
        }
    }

    /// Copy out the characters and their styles.
    pub fn to_parts(&self) -> (Vec<char>, Vec<Style>) {
        (self.chars.clone(), self.styles())
    }

    /// Iterate over `(char, style)` pairs.
    pub fn cells(&self) -> impl Iterator<Item = (char, Style)> + '_ {
        self.chars.iter().copied().zip(self.styles())
    }

    /// A copy with `ch` spliced in at `column`.
    pub(crate) fn insert_char(
        &self,
        column: usize,
        ch: char,
        style: Style,
        inline_limit: usize,
    ) -> Result<Self> {
        BufferError::check_position(column, self.len())?;
        let mut chars = Vec::with_capacity(self.len() + 1);
        chars.extend_from_slice(&self.chars[..column]);
        chars.push(ch);
        chars.extend_from_slice(&self.chars[column..]);

        let styles = match &self.styles {
            LineStyles::Inline(styles) => {
                let mut styles = styles.clone();
                styles.insert(column, style);
                LineStyles::Inline(styles).settle(chars.len(), inline_limit)
            }
            LineStyles::Spans(spans) => LineStyles::Spans(spans.insert(column, 1, style)?),
        };
        Ok(Self { chars, styles })
    }

    /// A copy with the character at `column` removed, plus what was removed.
    pub(crate) fn remove_char(&self, column: usize) -> Result<(Self, char, Style)> {
        BufferError::check_index(column, self.len())?;
        let removed = (self.chars[column], self.style_at(column)?);
        let mut chars = self.chars.clone();
        chars.remove(column);

        let styles = match &self.styles {
            LineStyles::Inline(styles) => {
                let mut styles = styles.clone();
                styles.remove(column);
                LineStyles::Inline(styles)
            }
            LineStyles::Spans(spans) => LineStyles::Spans(spans.remove(column, 1)?),
        };
        Ok((Self { chars, styles }, removed.0, removed.1))
    }

    /// Split into `[0, column)` and `[column, len)`; styles travel with
    /// their characters.
    pub(crate) fn split_at(&self, column: usize, inline_limit: usize) -> Result<(Self, Self)> {
        BufferError::check_position(column, self.len())?;
        let (head_chars, tail_chars) = self.chars.split_at(column);
        let (head_styles, tail_styles) = match &self.styles {
            LineStyles::Inline(styles) => {
                let (head, tail) = styles.split_at(column);
                (LineStyles::Inline(head.to_vec()), LineStyles::Inline(tail.to_vec()))
            }
            LineStyles::Spans(spans) => {
                let (head, tail) = spans.split_off(column)?;
                (LineStyles::Spans(head), LineStyles::Spans(tail))
            }
        };
        let head = Self {
            chars: head_chars.to_vec(),
            styles: head_styles.settle(head_chars.len(), inline_limit),
        };
        let tail = Self {
            chars: tail_chars.to_vec(),
            styles: tail_styles.settle(tail_chars.len(), inline_limit),
        };
        Ok((head, tail))
    }

    /// A copy with `column..column + length` restyled.
    pub(crate) fn apply_style(&self, column: usize, length: usize, style: Style) -> Result<Self> {
        BufferError::check_range(column, length, self.len())?;
        let styles = match &self.styles {
            LineStyles::Inline(styles) => {
                let mut styles = styles.clone();
                styles[column..column + length].fill(style);
                LineStyles::Inline(styles)
            }
            LineStyles::Spans(spans) => LineStyles::Spans(spans.apply_style(column, length, style)?),
        };
        Ok(Self {
            chars: self.chars.clone(),
            styles,
        })
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Line {
    /// Lines compare by content and per-character style, not storage form.
    fn eq(&self, other: &Self) -> bool {
        self.chars == other.chars && self.styles() == other.styles()
    }
}

impl Eq for Line {}

impl std::fmt::Debug for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let form = if self.is_inline() { "inline" } else { "spans" };
        f.debug_struct("Line")
            .field("text", &self.text())
            .field("styles", &form)
            .finish()
    }
}
