//! Buffer module: Core data structures for styled text storage.
//!
//! This module contains:
//! - [`Style`]: Display attributes attached to characters
//! - [`StyleSpanTree`]: Run-length styles over an offset axis
//! - [`Line`]: One line of styled characters
//! - [`LineRope`]: The persistent, balanced tree of lines

mod line;
mod rope;
mod spans;
mod style;
mod tree;

pub use line::{Line, DEFAULT_INLINE_LIMIT};
pub use rope::{LineRope, RemovedChar, LINE_SEPARATOR};
pub use spans::{Span, StyleSpanTree};
pub use style::{Modifiers, Rgb, Style};
