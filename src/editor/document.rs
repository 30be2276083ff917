//! Document: the editable buffer behind the [`Editor`] trait.
//!
//! A document owns the current [`LineRope`] root. Each mutation asks the rope
//! for a new root, pushes the old one onto the undo history, swaps roots and
//! then notifies subscribers. Failed mutations change nothing.

use super::history::History;
use super::subscription::{ChangeCallback, ChangeEvent, ChangeKind, Region, SubscriptionId, Subscriptions};
use super::traits::Editor;
use crate::buffer::{Line, LineRope, Style, DEFAULT_INLINE_LIMIT, LINE_SEPARATOR};
use crate::error::Result;
use tracing::{debug, trace};

/// Configuration for a document.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// Style used when `insert_line` is called without one.
    pub default_style: Style,
    /// Lines up to this length store one style per character; longer lines
    /// use a style span tree.
    pub inline_style_limit: usize,
    /// Maximum number of undo steps kept (0 = unlimited).
    pub history_limit: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            default_style: Style::default(),
            inline_style_limit: DEFAULT_INLINE_LIMIT,
            history_limit: 1000,
        }
    }
}

/// A styled text document with undo/redo and change notification.
///
/// Single writer: the document does no locking. Readers on other threads
/// take a [`snapshot`](Self::snapshot) instead of sharing the document.
///
/// # Example
///
/// ```
/// use styled_rope::{Document, Editor};
///
/// let mut doc = Document::new();
/// doc.insert_line(0, "Hello, world!", None)?;
/// doc.insert_char(0, 7, 'X', Default::default())?;
/// assert_eq!(doc.to_text(), "Hello, Xworld!");
///
/// doc.undo();
/// assert_eq!(doc.to_text(), "Hello, world!");
/// # Ok::<(), styled_rope::BufferError>(())
/// ```
#[derive(Debug)]
pub struct Document {
    /// Current version.
    rope: LineRope,
    /// Prior and undone versions.
    history: History<LineRope>,
    /// Change subscribers.
    subscriptions: Subscriptions,
    /// Configuration.
    config: DocumentConfig,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with default configuration.
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    /// Create an empty document with custom configuration.
    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            rope: LineRope::with_inline_limit(config.inline_style_limit),
            history: History::new(config.history_limit),
            subscriptions: Subscriptions::default(),
            config,
        }
    }

    /// Create a document holding `text`, one line per `'\n'`-separated line,
    /// all in the default style. The history starts empty.
    ///
    /// This is the inverse of [`to_text`](Self::to_text): a trailing
    /// separator yields a final empty line and `'\r'` is kept as text. An
    /// empty string loads as a document with no lines.
    pub fn from_text(text: &str, config: DocumentConfig) -> Self {
        let mut doc = Self::with_config(config);
        let (style, limit) = (doc.config.default_style, doc.config.inline_style_limit);
        let lines: Vec<Line> = if text.is_empty() {
            Vec::new()
        } else {
            text.split(LINE_SEPARATOR)
                .map(|line| Line::new(line, style, limit))
                .collect()
        };
        doc.rope = LineRope::from_lines(lines, limit);
        debug!(lines = doc.rope.len(), "loaded document");
        doc
    }

    /// Get the configuration.
    pub const fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// The current version. Cheap to clone, safe to read from other threads
    /// while this document keeps changing.
    pub fn snapshot(&self) -> LineRope {
        self.rope.clone()
    }

    /// Style of one character.
    pub fn style_at(&self, line: usize, column: usize) -> Result<Style> {
        self.rope.style_at(line, column)
    }

    /// The document text, lines joined with `'\n'`.
    pub fn to_text(&self) -> String {
        self.rope.to_text()
    }

    /// Check if there is anything to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if there is anything to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of versions that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Forget every undo and redo version, e.g. after saving.
    pub fn clear_history(&mut self) {
        self.history.clear();
        debug!("history cleared");
    }

    /// Number of active subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Make `next` current, record the old version, then notify.
    fn commit(&mut self, next: LineRope, events: &[ChangeEvent]) {
        let previous = std::mem::replace(&mut self.rope, next);
        self.history.record(previous);
        self.notify(events);
    }

    fn notify(&mut self, events: &[ChangeEvent]) {
        for event in events {
            self.subscriptions.dispatch(event);
        }
    }
}

impl Editor for Document {
    fn insert_line(&mut self, index: usize, text: &str, style: Option<Style>) -> Result<()> {
        let style = style.unwrap_or(self.config.default_style);
        let next = self.rope.insert_line(index, text, style)?;
        trace!(index, len = next.len(), "insert_line");
        let event = ChangeEvent::new(ChangeKind::LineInserted, index, 0)
            .with_length(text.chars().count())
            .with_style(style);
        self.commit(next, &[event]);
        Ok(())
    }

    fn insert_char(&mut self, line: usize, column: usize, ch: char, style: Style) -> Result<()> {
        let next = self.rope.insert_char(line, column, ch, style)?;
        trace!(line, column, ?ch, "insert_char");
        let kind = if ch == LINE_SEPARATOR {
            ChangeKind::LineSplit
        } else {
            ChangeKind::CharInserted
        };
        let event = ChangeEvent::new(kind, line, column)
            .with_length(1)
            .with_char(ch)
            .with_style(style);
        self.commit(next, &[event]);
        Ok(())
    }

    fn delete_line(&mut self, line: usize) -> Result<()> {
        let next = self.rope.delete_line(line)?;
        trace!(line, len = next.len(), "delete_line");
        self.commit(next, &[ChangeEvent::new(ChangeKind::LineDeleted, line, 0)]);
        Ok(())
    }

    fn delete_char(&mut self, line: usize, column: usize) -> Result<()> {
        let removed = self.rope.remove_char(line, column)?;
        trace!(line, column, line_removed = removed.line_removed, "delete_char");
        let deleted = ChangeEvent::new(ChangeKind::CharDeleted, line, column)
            .with_length(1)
            .with_char(removed.ch)
            .with_style(removed.style);
        if removed.line_removed {
            let line_deleted = ChangeEvent::new(ChangeKind::LineDeleted, line, 0);
            self.commit(removed.rope, &[deleted, line_deleted]);
        } else {
            self.commit(removed.rope, &[deleted]);
        }
        Ok(())
    }

    fn insert_text(&mut self, line: usize, text: &str, style: Style) -> Result<()> {
        let (base, deleted) = if line < self.rope.len() {
            (self.rope.delete_line(line)?, true)
        } else {
            (self.rope.clone(), false)
        };
        let next = base.insert_line(line, text, style)?;
        trace!(line, replaced = deleted, "insert_text");
        let inserted = ChangeEvent::new(ChangeKind::LineInserted, line, 0)
            .with_length(text.chars().count())
            .with_style(style);
        if deleted {
            let removed = ChangeEvent::new(ChangeKind::LineDeleted, line, 0);
            self.commit(next, &[removed, inserted]);
        } else {
            self.commit(next, &[inserted]);
        }
        Ok(())
    }

    fn apply_style(&mut self, line: usize, column: usize, length: usize, style: Style) -> Result<()> {
        let next = self.rope.apply_style(line, column, length, style)?;
        if length == 0 {
            return Ok(());
        }
        trace!(line, column, length, "apply_style");
        let event = ChangeEvent::new(ChangeKind::Restyled, line, column)
            .with_length(length)
            .with_style(style);
        self.commit(next, &[event]);
        Ok(())
    }

    fn apply_highlight(&mut self, line: usize, column: usize, length: usize, style: Style) -> Result<()> {
        let next = self.rope.apply_style(line, column, length, style)?;
        if length == 0 {
            return Ok(());
        }
        trace!(line, column, length, "apply_highlight");
        self.rope = next;
        let event = ChangeEvent::new(ChangeKind::Restyled, line, column)
            .with_length(length)
            .with_style(style);
        self.notify(&[event]);
        Ok(())
    }

    fn get_line(&self, line: usize) -> Result<(Vec<char>, Vec<Style>)> {
        self.rope.get_line(line)
    }

    fn len(&self) -> usize {
        self.rope.len()
    }

    fn subscribe(&mut self, region: Region, callback: ChangeCallback) -> SubscriptionId {
        let id = self.subscriptions.subscribe(region, callback);
        debug!(?id, ?region, "subscribed");
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.subscriptions.unsubscribe(id);
        debug!(?id, removed, "unsubscribed");
        removed
    }

    fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.rope) {
            return false;
        }
        debug!(lines = self.rope.len(), "undo");
        self.subscriptions
            .dispatch(&ChangeEvent::new(ChangeKind::HistoryRestored, 0, 0));
        true
    }

    fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.rope) {
            return false;
        }
        debug!(lines = self.rope.len(), "redo");
        self.subscriptions
            .dispatch(&ChangeEvent::new(ChangeKind::HistoryRestored, 0, 0));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Modifiers, Rgb};
    use crate::error::BufferError;
    use std::sync::{Arc, Mutex};

    fn red() -> Style {
        Style::default().with_fg(Rgb::new(255, 0, 0))
    }

    fn keyword() -> Style {
        Style::default().with_modifiers(Modifiers::BOLD)
    }

    fn line_text(doc: &Document, line: usize) -> String {
        doc.get_line(line).unwrap().0.into_iter().collect()
    }

    fn recorder(doc: &mut Document, region: Region) -> Arc<Mutex<Vec<ChangeEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        doc.subscribe(region, Box::new(move |event| sink.lock().unwrap().push(*event)));
        events
    }

    #[test]
    fn test_document_insert_lines_scenario() {
        let mut doc = Document::new();
        doc.insert_line(0, "foo", None).unwrap();
        doc.insert_line(1, "bar", None).unwrap();
        doc.insert_line(0, "baz", None).unwrap();

        assert_eq!(doc.len(), 3);
        assert_eq!(line_text(&doc, 0), "baz");
        assert_eq!(line_text(&doc, 1), "foo");
        assert_eq!(line_text(&doc, 2), "bar");
    }

    #[test]
    fn test_document_default_style() {
        let config = DocumentConfig {
            default_style: red(),
            ..DocumentConfig::default()
        };
        let mut doc = Document::with_config(config);
        doc.insert_line(0, "abc", None).unwrap();
        doc.insert_line(1, "def", Some(keyword())).unwrap();

        assert_eq!(doc.get_line(0).unwrap().1, vec![red(); 3]);
        assert_eq!(doc.get_line(1).unwrap().1, vec![keyword(); 3]);
    }

    #[test]
    fn test_document_length_tracks_net_inserts() {
        let mut doc = Document::new();
        let mut expected = 0usize;
        for i in 0..20 {
            doc.insert_line(i / 2, "x", None).unwrap();
            expected += 1;
        }
        for i in [3, 0, 10, 99, 5] {
            if doc.delete_line(i).is_ok() {
                expected -= 1;
            }
        }
        assert_eq!(doc.len(), expected);
        assert_eq!(expected, 16);
    }

    #[test]
    fn test_document_errors_leave_state_unchanged() {
        let mut doc = Document::new();
        doc.insert_line(0, "abc", None).unwrap();

        assert_eq!(
            doc.insert_line(5, "x", None),
            Err(BufferError::InvalidIndex { index: 5, len: 1 })
        );
        assert!(doc.insert_char(0, 4, 'x', red()).is_err());
        assert!(doc.delete_char(0, 3).is_err());
        assert!(doc.apply_style(0, 1, 5, red()).is_err());
        assert!(doc.get_line(1).is_err());

        assert_eq!(doc.to_text(), "abc");
        assert!(doc.undo());
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_document_split_and_join_by_delete() {
        let mut doc = Document::new();
        doc.insert_line(0, "hello world", None).unwrap();
        doc.insert_char(0, 5, '\n', red()).unwrap();

        assert_eq!(doc.len(), 2);
        assert_eq!(line_text(&doc, 0), "hello");
        assert_eq!(line_text(&doc, 1), " world");
    }

    #[test]
    fn test_document_delete_char_removes_empty_line() {
        let mut doc = Document::new();
        doc.insert_line(0, "a", None).unwrap();
        doc.insert_line(1, "b", None).unwrap();
        doc.delete_char(0, 0).unwrap();

        assert_eq!(doc.len(), 1);
        assert_eq!(line_text(&doc, 0), "b");
    }

    #[test]
    fn test_document_insert_text_replaces_line() {
        let mut doc = Document::new();
        doc.insert_line(0, "old", None).unwrap();
        doc.insert_line(1, "keep", None).unwrap();

        doc.insert_text(0, "new", red()).unwrap();
        assert_eq!(doc.to_text(), "new\nkeep");
        assert_eq!(doc.style_at(0, 0), Ok(red()));

        doc.insert_text(2, "tail", red()).unwrap();
        assert_eq!(doc.to_text(), "new\nkeep\ntail");
        assert!(doc.insert_text(4, "x", red()).is_err());

        // One history entry per call.
        assert!(doc.undo());
        assert!(doc.undo());
        assert_eq!(doc.to_text(), "old\nkeep");
    }

    #[test]
    fn test_document_apply_style() {
        let mut doc = Document::new();
        doc.insert_line(0, "fn main() {}", None).unwrap();
        doc.apply_style(0, 0, 2, keyword()).unwrap();

        assert_eq!(doc.style_at(0, 0), Ok(keyword()));
        assert_eq!(doc.style_at(0, 1), Ok(keyword()));
        assert_eq!(doc.style_at(0, 2), Ok(Style::default()));
    }

    #[test]
    fn test_document_apply_style_zero_length_is_noop() {
        let mut doc = Document::new();
        doc.insert_line(0, "abc", None).unwrap();
        let events = recorder(&mut doc, Region::ALL);
        doc.apply_style(0, 1, 0, red()).unwrap();
        assert!(events.lock().unwrap().is_empty());
        assert!(doc.undo());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_document_undo_redo() {
        let mut doc = Document::new();
        doc.insert_line(0, "abc", None).unwrap();
        doc.insert_char(0, 3, 'd', red()).unwrap();
        doc.delete_char(0, 0).unwrap();
        assert_eq!(doc.to_text(), "bcd");

        assert!(doc.undo());
        assert_eq!(doc.to_text(), "abcd");
        assert!(doc.undo());
        assert_eq!(doc.to_text(), "abc");
        assert!(doc.redo());
        assert_eq!(doc.to_text(), "abcd");

        doc.insert_line(1, "new", None).unwrap();
        assert!(!doc.can_redo());
        assert!(!doc.redo());

        while doc.undo() {}
        assert!(doc.is_empty());
    }

    #[test]
    fn test_document_history_limit() {
        let config = DocumentConfig {
            history_limit: 3,
            ..DocumentConfig::default()
        };
        let mut doc = Document::with_config(config);
        for i in 0..10 {
            doc.insert_line(i, "x", None).unwrap();
        }
        let mut undone = 0;
        while doc.undo() {
            undone += 1;
        }
        assert_eq!(undone, 3);
        assert_eq!(doc.len(), 7);
    }

    #[test]
    fn test_document_text_round_trip_keeps_every_line() {
        let mut doc = Document::new();
        doc.insert_line(0, "a", None).unwrap();
        doc.insert_line(1, "", None).unwrap();
        assert_eq!(doc.to_text(), "a\n");

        let loaded = Document::from_text(&doc.to_text(), DocumentConfig::default());
        assert_eq!(loaded.len(), 2);
        assert_eq!(line_text(&loaded, 1), "");
        assert_eq!(loaded.to_text(), doc.to_text());

        for text in ["x\r\ny", "\n\n", "one", "trailing\n"] {
            let loaded = Document::from_text(text, DocumentConfig::default());
            assert_eq!(loaded.to_text(), text);
        }
        assert!(Document::from_text("", DocumentConfig::default()).is_empty());
    }

    #[test]
    fn test_document_insert_line_with_separator_survives_reload() {
        let mut doc = Document::new();
        doc.insert_line(0, "a\nb", None).unwrap();
        assert_eq!(doc.len(), 2);

        let loaded = Document::from_text(&doc.to_text(), DocumentConfig::default());
        assert_eq!(loaded.len(), doc.len());

        doc.insert_text(0, "x\ny", red()).unwrap();
        assert_eq!(doc.to_text(), "x\ny\nb");
        assert!(doc.undo());
        assert_eq!(doc.to_text(), "a\nb");
    }

    #[test]
    fn test_document_undo_redo_restores_styles() {
        let mut doc = Document::new();
        doc.insert_line(0, "let x = 1;", None).unwrap();
        doc.apply_style(0, 0, 3, keyword()).unwrap();
        doc.apply_style(0, 2, 4, red()).unwrap();
        let styled = doc.get_line(0).unwrap();

        assert!(doc.undo());
        assert_eq!(doc.style_at(0, 2), Ok(keyword()));
        assert_eq!(doc.style_at(0, 4), Ok(Style::default()));

        assert!(doc.undo());
        assert_eq!(doc.get_line(0).unwrap().1, vec![Style::default(); 10]);

        assert!(doc.redo());
        assert!(doc.redo());
        assert_eq!(doc.get_line(0).unwrap(), styled);
        assert_eq!(doc.style_at(0, 5), Ok(red()));
    }

    #[test]
    fn test_document_apply_highlight_skips_history() {
        let mut doc = Document::new();
        doc.insert_line(0, "fn main() {}", None).unwrap();
        doc.insert_char(0, 12, ';', red()).unwrap();
        assert!(doc.undo());
        let events = recorder(&mut doc, Region::ALL);

        doc.apply_highlight(0, 0, 2, keyword()).unwrap();
        assert_eq!(doc.style_at(0, 1), Ok(keyword()));
        assert_eq!(doc.undo_depth(), 1);
        assert!(doc.can_redo());
        assert_eq!(events.lock().unwrap()[0].kind, ChangeKind::Restyled);

        assert!(doc.apply_highlight(0, 10, 5, keyword()).is_err());
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_document_clear_history() {
        let mut doc = Document::new();
        doc.insert_line(0, "a", None).unwrap();
        doc.insert_line(1, "b", None).unwrap();
        doc.undo();
        assert_eq!(doc.undo_depth(), 1);
        assert!(doc.can_redo());

        doc.clear_history();
        assert_eq!(doc.undo_depth(), 0);
        assert!(!doc.undo());
        assert!(!doc.redo());
        assert_eq!(doc.to_text(), "a");
    }

    #[test]
    fn test_document_snapshot_survives_edits() {
        let mut doc = Document::new();
        doc.insert_line(0, "v1", None).unwrap();
        let snapshot = doc.snapshot();

        doc.insert_char(0, 2, '!', red()).unwrap();
        doc.insert_line(1, "more", None).unwrap();

        assert_eq!(snapshot.to_text(), "v1");
        assert_eq!(doc.to_text(), "v1!\nmore");
    }

    #[test]
    fn test_document_from_text() {
        let doc = Document::from_text("one\ntwo\nthree", DocumentConfig::default());
        assert_eq!(doc.len(), 3);
        assert_eq!(line_text(&doc, 2), "three");
        assert_eq!(doc.to_text(), "one\ntwo\nthree");
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_document_subscription_events() {
        let mut doc = Document::new();
        doc.insert_line(0, "abc", None).unwrap();
        let events = recorder(&mut doc, Region::new(0, 0, 1, 80));

        doc.insert_char(0, 1, 'x', red()).unwrap();
        doc.apply_style(0, 0, 2, keyword()).unwrap();
        doc.delete_char(0, 1).unwrap();

        let events = events.lock().unwrap();
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ChangeKind::CharInserted, ChangeKind::Restyled, ChangeKind::CharDeleted]
        );
        assert_eq!(events[0].ch, Some('x'));
        assert_eq!(events[0].style, Some(red()));
        assert_eq!(events[2].ch, Some('x'));
        assert_eq!(events[2].style, Some(keyword()));
    }

    #[test]
    fn test_document_subscription_region_filter() {
        let mut doc = Document::from_text("a\nb\nc\nd", DocumentConfig::default());
        let below = recorder(&mut doc, Region::lines(2, 2));

        doc.insert_char(0, 0, 'x', red()).unwrap();
        assert!(below.lock().unwrap().is_empty());

        // Inserting a line above shifts the watched lines, so it is reported.
        doc.insert_line(1, "new", None).unwrap();
        assert_eq!(below.lock().unwrap().len(), 1);

        doc.apply_style(4, 0, 1, red()).unwrap();
        assert_eq!(below.lock().unwrap().len(), 1);

        doc.apply_style(3, 0, 1, red()).unwrap();
        assert_eq!(below.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_document_subscription_order_and_unsubscribe() {
        let mut doc = Document::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut ids = Vec::new();
        for name in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            ids.push(doc.subscribe(Region::ALL, Box::new(move |_| order.lock().unwrap().push(name))));
        }

        doc.insert_line(0, "x", None).unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);

        assert!(doc.unsubscribe(ids[1]));
        assert_eq!(doc.subscription_count(), 2);
        order.lock().unwrap().clear();
        doc.undo();
        assert_eq!(*order.lock().unwrap(), vec!["first", "third"]);
    }

    #[test]
    fn test_document_failed_mutation_sends_no_event() {
        let mut doc = Document::new();
        let events = recorder(&mut doc, Region::ALL);
        assert!(doc.delete_line(0).is_err());
        assert!(!doc.undo());
        assert!(events.lock().unwrap().is_empty());
    }
}
