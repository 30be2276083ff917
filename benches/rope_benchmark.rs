//! LineRope benchmark: Measure persistent line and span edits.
//!
//! Target: lookups and edits stay logarithmic as documents grow

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use styled_rope::{Document, DocumentConfig, Editor, LineRope, Modifiers, Rgb, Style, StyleSpanTree};

fn sample_text(index: usize) -> String {
    format!("line {index:06} let value = compute(alpha, beta, gamma);")
}

fn build_rope(lines: usize) -> LineRope {
    let mut rope = LineRope::new();
    for i in 0..lines {
        if let Ok(next) = rope.insert_line(i, &sample_text(i), Style::DEFAULT) {
            rope = next;
        }
    }
    rope
}

fn keyword() -> Style {
    Style::DEFAULT
        .with_fg(Rgb::new(200, 120, 255))
        .with_modifiers(Modifiers::BOLD)
}

fn rope_insert_line(c: &mut Criterion) {
    let rope = build_rope(10_000);

    c.bench_function("rope_insert_line_middle_10k", |b| {
        b.iter(|| rope.insert_line(black_box(5_000), "inserted", Style::DEFAULT));
    });
}

fn rope_get_line(c: &mut Criterion) {
    let rope = build_rope(50_000);

    c.bench_function("rope_get_line_50k", |b| {
        b.iter(|| rope.line(black_box(25_000)).map(|line| line.len()));
    });
}

fn rope_insert_char(c: &mut Criterion) {
    let rope = build_rope(10_000);

    c.bench_function("rope_insert_char_10k", |b| {
        b.iter(|| rope.insert_char(black_box(5_000), black_box(10), 'x', Style::DEFAULT));
    });

    c.bench_function("rope_split_line_10k", |b| {
        b.iter(|| rope.insert_char(black_box(5_000), black_box(10), '\n', Style::DEFAULT));
    });
}

fn rope_visible_lines(c: &mut Criterion) {
    let rope = build_rope(10_000);

    c.bench_function("rope_visible_50_lines", |b| {
        b.iter(|| {
            let visible: Vec<_> = rope.visible_lines(black_box(4_000), 50).collect();
            black_box(visible.len())
        });
    });
}

fn spans_apply_style(c: &mut Criterion) {
    let mut group = c.benchmark_group("spans_apply_style");

    for len in [256, 4_096, 65_536] {
        let spans = StyleSpanTree::uniform(len, Style::DEFAULT);
        group.bench_with_input(BenchmarkId::new("middle", len), &spans, |b, spans| {
            b.iter(|| spans.apply_style(black_box(len / 2), 16, keyword()));
        });
    }

    group.finish();
}

fn spans_highlight_pass(c: &mut Criterion) {
    c.bench_function("spans_highlight_pass_4k", |b| {
        b.iter(|| {
            let mut spans = StyleSpanTree::uniform(4_096, Style::DEFAULT);
            for offset in (0..4_096).step_by(32) {
                if let Ok(next) = spans.apply_style(offset, 8, keyword()) {
                    spans = next;
                }
            }
            black_box(spans.span_count())
        });
    });
}

fn rope_scale_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("rope_scale");

    for line_count in [1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("append_lines", line_count), &line_count, |b, &count| {
            b.iter(|| black_box(build_rope(count).len()));
        });
    }

    group.finish();
}

fn document_undo_redo(c: &mut Criterion) {
    let text: Vec<String> = (0..1_000).map(sample_text).collect();
    let mut doc = Document::from_text(&text.join("\n"), DocumentConfig::default());
    let _ = doc.insert_char(500, 0, '#', Style::DEFAULT);

    c.bench_function("document_undo_redo", |b| {
        b.iter(|| {
            doc.undo();
            doc.redo()
        });
    });
}

criterion_group!(
    benches,
    rope_insert_line,
    rope_get_line,
    rope_insert_char,
    rope_visible_lines,
    spans_apply_style,
    spans_highlight_pass,
    rope_scale_comparison,
    document_undo_redo,
);
criterion_main!(benches);
