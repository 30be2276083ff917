//! Highlight Demo: Style a document from a background analysis thread.
//!
//! A toy keyword scanner runs on a snapshot and streams style edits back
//! through a bounded channel while the main thread keeps editing. The result
//! is printed with crossterm styling.
//!
//! Set RUST_LOG=styled_rope=debug to see stale edits being skipped.

use std::io::{self, Write};
use std::thread;

use crossterm::style::{PrintStyledContent, StyledContent};
use crossterm::QueueableCommand;
use styled_rope::{
    highlight_channel, Document, DocumentConfig, DrainReport, Editor, LineRope, Modifiers, Rgb, Style, StyleEdit,
};
use tracing_subscriber::EnvFilter;

const SAMPLE_TEXT: &str = "fn main() {
    let mut total = 0;
    for value in 0..10 {
        if value % 2 == 0 {
            total += value;
        }
    }
    return total;
}";

const KEYWORDS: &[&str] = &["fn", "let", "mut", "for", "in", "if", "return"];

fn keyword_style() -> Style {
    Style::DEFAULT
        .with_fg(Rgb::from_u32(0xC6_78_DD))
        .with_modifiers(Modifiers::BOLD)
}

fn number_style() -> Style {
    Style::DEFAULT.with_fg(Rgb::from_u32(0xD1_9A_66))
}

/// Scan a snapshot and emit one edit per keyword or number.
fn analyze(snapshot: &LineRope) -> Vec<StyleEdit> {
    let mut edits = Vec::new();
    for (index, line) in snapshot.iter().enumerate() {
        let chars = line.chars();
        let mut column = 0;
        while column < chars.len() {
            let start = column;
            if chars[column].is_alphabetic() {
                while column < chars.len() && chars[column].is_alphanumeric() {
                    column += 1;
                }
                let word: String = chars[start..column].iter().collect();
                if KEYWORDS.contains(&word.as_str()) {
                    edits.push(StyleEdit::new(index, start, column - start, keyword_style()));
                }
            } else if chars[column].is_ascii_digit() {
                while column < chars.len() && chars[column].is_ascii_digit() {
                    column += 1;
                }
                edits.push(StyleEdit::new(index, start, column - start, number_style()));
            } else {
                column += 1;
            }
        }
    }
    edits
}

fn render(doc: &Document) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for index in 0..doc.len() {
        let Ok((chars, styles)) = doc.get_line(index) else {
            continue;
        };
        for (ch, style) in chars.into_iter().zip(styles) {
            out.queue(PrintStyledContent(StyledContent::new(style.into(), ch)))?;
        }
        out.write_all(b"\r\n")?;
    }
    out.flush()
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let mut doc = Document::from_text(SAMPLE_TEXT, DocumentConfig::default());
    let (tx, rx) = highlight_channel(8);
    let snapshot = doc.snapshot();

    let analysis = thread::spawn(move || {
        for edit in analyze(&snapshot) {
            if tx.send(edit).is_err() {
                break;
            }
        }
    });

    // Keep editing while analysis runs. Dropping the `return` line makes the
    // edits computed for it land on the shorter closing brace and go stale.
    if let Err(err) = doc.delete_line(7) {
        tracing::warn!(%err, "edit failed");
    }

    let mut total = DrainReport::default();
    loop {
        let finished = analysis.is_finished();
        let report = rx.drain_into(&mut doc);
        total.applied += report.applied;
        total.rejected += report.rejected;
        if finished && rx.pending() == 0 {
            break;
        }
        thread::yield_now();
    }
    let _ = analysis.join();

    tracing::info!(applied = total.applied, rejected = total.rejected, "highlighting finished");
    render(&doc)
}
