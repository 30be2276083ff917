//! Style Span Tree: run-length styles over a flat offset axis.
//!
//! Each span covers a contiguous run of offsets sharing one [`Style`]. Spans
//! are kept in a persistent AVL tree weighted by span length, so the start of
//! a span is the cumulative length of everything before it. Offset lookups
//! walk the tree by cumulative left-subtree length, exactly like line lookups
//! in the line rope.
//!
//! Within this crate a span tree addresses the columns of a single line.

use super::style::Style;
use super::tree::{Tree, Weighted};
use crate::error::{BufferError, Result};

/// A run of `len` offsets sharing one style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    /// Number of offsets covered. Never zero inside a tree.
    pub len: usize,
    /// Style of every offset in the run.
    pub style: Style,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub const fn new(len: usize, style: Style) -> Self {
        Self { len, style }
    }
}

impl Weighted for Span {
    #[inline]
    fn weight(&self) -> usize {
        self.len
    }
}

/// A persistent tree of style spans partitioning `0..len()`.
///
/// All updates return a new tree; the receiver is left untouched and shares
/// unchanged subtrees with the result.
#[derive(Clone, Default)]
pub struct StyleSpanTree {
    tree: Tree<Span>,
}

impl StyleSpanTree {
    /// Create an empty span tree.
    pub const fn new() -> Self {
        Self { tree: Tree::new() }
    }

    /// Create a tree with a single span of `len` offsets.
    pub fn uniform(len: usize, style: Style) -> Self {
        Self::from_spans([Span::new(len, style)])
    }

    /// Build a balanced tree from spans in order. Empty spans are skipped.
    pub fn from_spans(spans: impl IntoIterator<Item = Span>) -> Self {
        let spans: Vec<Span> = spans.into_iter().filter(|span| span.len > 0).collect();
        Self {
            tree: Tree::from_items(&spans),
        }
    }

    /// Build a tree from one style per offset, merging equal neighbours.
    pub fn from_styles(styles: &[Style]) -> Self {
        let mut spans: Vec<Span> = Vec::new();
        for &style in styles {
            match spans.last_mut() {
                Some(last) if last.style == style => last.len += 1,
                _ => spans.push(Span::new(1, style)),
            }
        }
        Self {
            tree: Tree::from_items(&spans),
        }
    }

    /// Total number of offsets covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.total()
    }

    /// Check if the tree covers no offsets.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Number of spans.
    pub fn span_count(&self) -> usize {
        self.tree.iter().count()
    }

    /// Height of the underlying tree.
    pub fn height(&self) -> u32 {
        self.tree.height()
    }

    /// Verify the AVL invariant and cached lengths.
    pub fn is_balanced(&self) -> bool {
        self.tree.is_balanced()
    }

    /// Iterate over `(start, span)` pairs in offset order.
    pub fn spans(&self) -> impl Iterator<Item = (usize, Span)> + '_ {
        self.tree.iter().scan(0, |start, span| {
            let at = *start;
            *start += span.len;
            Some((at, *span))
        })
    }

    /// Expand into one style per offset.
    pub fn to_styles(&self) -> Vec<Style> {
        let mut styles = Vec::with_capacity(self.len());
        for span in self.tree.iter() {
            styles.extend(std::iter::repeat(span.style).take(span.len));
        }
        styles
    }

    /// Style of the span containing `offset`.
    pub fn style_at(&self, offset: usize) -> Result<Style> {
        self.tree
            .find(offset)
            .map(|(span, _)| span.style)
            .ok_or(BufferError::InvalidRange {
                start: offset,
                end: offset.saturating_add(1),
                len: self.len(),
            })
    }

    /// Insert a span of `length` offsets at `offset`, shifting later offsets.
    ///
    /// The span containing `offset` is split into a left remainder, the new
    /// span and a right remainder.
    pub fn insert(&self, offset: usize, length: usize, style: Style) -> Result<Self> {
        BufferError::check_range(offset, 0, self.len())?;
        if length == 0 {
            return Ok(self.clone());
        }
        let tree = split(&self.tree, offset);
        Ok(Self {
            tree: tree.insert(offset, Span::new(length, style)),
        })
    }

    /// Restyle `offset..offset + length`.
    ///
    /// Boundary spans are split so that the edit lines up exactly with span
    /// boundaries; offsets outside the range keep their previous style.
    pub fn apply_style(&self, offset: usize, length: usize, style: Style) -> Result<Self> {
        BufferError::check_range(offset, length, self.len())?;
        if length == 0 {
            return Ok(self.clone());
        }
        let end = offset + length;
        let tree = split(&split(&self.tree, offset), end);
        Ok(Self {
            tree: tree.map_range(offset, end, |span| Span::new(span.len, style)),
        })
    }

    /// Remove `offset..offset + length`, shifting later offsets down.
    pub fn remove(&self, offset: usize, length: usize) -> Result<Self> {
        BufferError::check_range(offset, length, self.len())?;
        let end = offset + length;
        let mut tree = split(&split(&self.tree, offset), end);
        let mut remaining = length;
        while remaining > 0 {
            let Some((next, span)) = tree.remove(offset) else {
                break;
            };
            remaining = remaining.saturating_sub(span.len);
            tree = next;
        }
        Ok(Self { tree })
    }

    /// Split into `0..offset` and `offset..len()`.
    pub fn split_off(&self, offset: usize) -> Result<(Self, Self)> {
        BufferError::check_range(offset, 0, self.len())?;
        let mut head = Vec::new();
        let mut tail = Vec::new();
        for (start, span) in self.spans() {
            let end = start + span.len;
            if end <= offset {
                head.push(span);
            } else if start >= offset {
                tail.push(span);
            } else {
                head.push(Span::new(offset - start, span.style));
                tail.push(Span::new(end - offset, span.style));
            }
        }
        Ok((Self::from_spans(head), Self::from_spans(tail)))
    }
}

/// Ensure a span boundary exists at `offset`.
fn split(tree: &Tree<Span>, offset: usize) -> Tree<Span> {
    match tree.find(offset) {
        Some((span, start)) if start < offset => {
            let head = Span::new(offset - start, span.style);
            let tail = Span::new(span.len - head.len, span.style);
            tree.replace(offset, |_, _| head).insert(offset, tail)
        }
        _ => tree.clone(),
    }
}

impl PartialEq for StyleSpanTree {
    /// Trees are equal when every offset has the same style, regardless of
    /// how the offsets are divided into spans.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.to_styles() == other.to_styles()
    }
}

impl Eq for StyleSpanTree {}

impl std::fmt::Debug for StyleSpanTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.spans().map(|(start, span)| (start..start + span.len, span.style)))
            .finish()
    }
}
