//! # Styled Rope
//!
//! A styled text-buffer engine for terminal editors.
//!
//! Documents are persistent, AVL-balanced ropes of lines. Every character is
//! covered by a [`Style`], and styles survive structural edits: splitting a
//! line carries each character's style with it.
//!
//! ## Core Concepts
//!
//! - **Persistent trees**: every edit returns a new root sharing untouched
//!   subtrees, so old versions stay readable (snapshots, undo history)
//! - **Line rope**: O(log n) line lookup and edits by index
//! - **Style spans**: long lines keep run-length styles in an offset-indexed
//!   tree, so broad re-styling from a highlighter stays cheap
//! - **Editor facade**: one operation surface with undo/redo and
//!   region-filtered change notification
//!
//! ## Example
//!
//! ```rust
//! use styled_rope::{Document, Editor, Modifiers, Style};
//!
//! let mut doc = Document::new();
//! doc.insert_line(0, "fn main() {}", None)?;
//!
//! // Paint a highlighting result.
//! let keyword = Style::default().with_modifiers(Modifiers::BOLD);
//! doc.apply_style(0, 0, 2, keyword)?;
//! assert_eq!(doc.style_at(0, 1)?, keyword);
//!
//! // Split the line at column 3.
//! doc.insert_char(0, 3, '\n', Style::default())?;
//! assert_eq!(doc.len(), 2);
//! # Ok::<(), styled_rope::BufferError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod editor;
pub mod error;

// Re-exports for convenience
pub use buffer::{Line, LineRope, Modifiers, Rgb, Span, Style, StyleSpanTree, LINE_SEPARATOR};
pub use editor::{
    highlight_channel, ChangeEvent, ChangeKind, Document, DocumentConfig, DrainReport, Editor, Region,
    StyleEdit, SubscriptionId,
};
pub use error::{BufferError, Result};
