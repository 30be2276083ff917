//! Change subscriptions: region-filtered, synchronous change callbacks.

use crate::buffer::Style;

/// A rectangular area of the document, in lines and columns.
///
/// Extents saturate, so `usize::MAX` works as "to the end".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Region {
    /// First line.
    pub line: usize,
    /// First column.
    pub column: usize,
    /// Number of lines.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
}

impl Region {
    /// Create a new region.
    #[inline]
    pub const fn new(line: usize, column: usize, height: usize, width: usize) -> Self {
        Self {
            line,
            column,
            height,
            width,
        }
    }

    /// The whole document.
    pub const ALL: Self = Self::new(0, 0, usize::MAX, usize::MAX);

    /// Every column of lines `line..line + height`.
    #[inline]
    pub const fn lines(line: usize, height: usize) -> Self {
        Self::new(line, 0, height, usize::MAX)
    }

    /// Get the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> usize {
        self.line.saturating_add(self.height)
    }

    /// Get the right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> usize {
        self.column.saturating_add(self.width)
    }

    /// Check if this region intersects with another.
    #[inline]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.line < other.bottom()
            && self.bottom() > other.line
            && self.column < other.right()
            && self.right() > other.column
    }
}

/// What a mutation did.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ChangeKind {
    /// A line was inserted; later lines moved down.
    LineInserted,
    /// A line was removed; later lines moved up.
    LineDeleted,
    /// A line was split in two at a column.
    LineSplit,
    /// A character was inserted; later columns moved right.
    CharInserted,
    /// A character was removed; later columns moved left.
    CharDeleted,
    /// A column range was restyled.
    Restyled,
    /// The document was replaced by an earlier or later version.
    HistoryRestored,
}

/// A change delivered to subscribers after a mutation completes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ChangeEvent {
    /// What happened.
    pub kind: ChangeKind,
    /// Line where the change happened.
    pub line: usize,
    /// Column where the change happened.
    pub column: usize,
    /// Number of characters involved (inserted line length, restyled width).
    pub length: usize,
    /// The character inserted or removed, if any.
    pub ch: Option<char>,
    /// The style applied or removed, if any.
    pub style: Option<Style>,
}

impl ChangeEvent {
    pub(crate) const fn new(kind: ChangeKind, line: usize, column: usize) -> Self {
        Self {
            kind,
            line,
            column,
            length: 0,
            ch: None,
            style: None,
        }
    }

    pub(crate) const fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub(crate) const fn with_char(mut self, ch: char) -> Self {
        self.ch = Some(ch);
        self
    }

    pub(crate) const fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// The part of the document this change can have affected.
    ///
    /// Line-structure changes shift every later line; character changes
    /// shift the rest of their line; restyling touches only its range.
    pub const fn extent(&self) -> Region {
        match self.kind {
            ChangeKind::LineInserted | ChangeKind::LineDeleted | ChangeKind::LineSplit => {
                Region::lines(self.line, usize::MAX)
            }
            ChangeKind::CharInserted | ChangeKind::CharDeleted => {
                Region::new(self.line, self.column, 1, usize::MAX)
            }
            ChangeKind::Restyled => Region::new(self.line, self.column, 1, self.length),
            ChangeKind::HistoryRestored => Region::ALL,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(pub u64);

/// A change callback.
pub type ChangeCallback = Box<dyn FnMut(&ChangeEvent) + Send>;

struct Subscription {
    id: SubscriptionId,
    region: Region,
    callback: ChangeCallback,
}

/// Registry of subscriptions, dispatched in registration order.
#[derive(Default)]
pub(crate) struct Subscriptions {
    entries: Vec<Subscription>,
    next_id: u64,
}

impl Subscriptions {
    pub(crate) fn subscribe(&mut self, region: Region, callback: ChangeCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push(Subscription {
            id,
            region,
            callback,
        });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Call every subscriber whose region intersects the event's extent.
    pub(crate) fn dispatch(&mut self, event: &ChangeEvent) {
        let extent = event.extent();
        for entry in &mut self.entries {
            if entry.region.intersects(&extent) {
                (entry.callback)(event);
            }
        }
    }
}

impl std::fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriptions")
            .field("count", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
