//! Editor module: the buffer capability facade.
//!
//! This module contains:
//! - [`Editor`]: The operation surface collaborators call
//! - [`Document`]: The rope-backed implementation with undo/redo
//! - [`Region`] / [`ChangeEvent`]: Change subscription types
//! - [`highlight_channel`]: Cross-thread delivery of style edits

mod document;
mod highlight;
mod history;
mod subscription;
mod traits;

pub use document::{Document, DocumentConfig};
pub use highlight::{highlight_channel, DrainReport, HighlightReceiver, HighlightSender, StyleEdit};
pub use subscription::{ChangeCallback, ChangeEvent, ChangeKind, Region, SubscriptionId};
pub use traits::Editor;
